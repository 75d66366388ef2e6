//! Outbound node events.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them (log to serial, count them in a test).

use crate::config::SensorConfig;
use crate::error::ConfigError;
use crate::sensors::SampledValue;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// `Scheduler::start` ran (carries the initial sensor selection).
    Started(SensorConfig),

    /// The transport reported a peer where there was none.
    PeerConnected,

    /// The peer went away.
    PeerLost,

    /// A complete inbound message replaced the sensor selection.
    ConfigApplied(SensorConfig),

    /// An inbound message was dropped at the boundary.
    ConfigRejected(ConfigError),

    /// One telemetry frame went out.
    TelemetrySent(SampledValue),

    /// Draining or sending the telemetry frame failed.
    SendFailed,
}
