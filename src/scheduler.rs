//! Cooperative scheduler: one pass of the node's main loop.
//!
//! ```text
//!   Transport ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Scheduler           │
//! ConfigHandler ◀─│ config · telemetry · blink   │──▶ Negotiator
//!                 └──────────────┬───────────────┘
//!                                ▼
//!                             Watchdog
//! ```
//!
//! Every [`Scheduler::tick`] runs the same fixed sequence:
//!
//! 1. drain inbound bytes (bounded) into the config handler and apply a
//!    complete, valid selection;
//! 2. with a peer connected and the telemetry period elapsed: sample,
//!    wait for the outbound buffer, send one frame, toggle the status LED;
//! 3. with no peer: force the status LED off;
//! 4. blink the liveness LED when its period elapsed;
//! 5. advance the connection-parameter negotiator once;
//! 6. feed the watchdog.
//!
//! Nothing in a tick blocks except the outbound drain wait and the ADC
//! conversion, so a tick always finishes well inside the watchdog window.

use log::{debug, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::{Adc, Clock, ConfigHandler, EventSink, Gpio, Negotiator, WatchdogPort};
use crate::config::{NodeConfig, SensorConfig, SensorMode};
use crate::drivers::indicator::{IndicatorBank, Led};
use crate::drivers::pin::PinId;
use crate::drivers::timeout::Timeout;
use crate::error::{ConfigError, LinkError, Result};
use crate::link::telemetry::{MAX_TELEMETRY_FRAME, TelemetryFrame, encode_telemetry};
use crate::link::transport::Transport;
use crate::sensors::SampledValue;
use crate::sensors::analog::AnalogSampler;
use crate::sensors::digital;

/// Inbound scratch buffer; one read never exceeds it.
pub const RX_BUFFER_SIZE: usize = 64;

/// Reads per tick before the drain yields to the rest of the loop.
pub const MAX_DRAIN_READS: usize = 4;

/// Where the loop is with respect to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    NoPeer,
    PeerIdle,
    PeerSampling,
    PeerSending,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Furthest state reached during the tick.
    pub state: NodeState,
    /// Selection applied in step 1, if any.
    pub applied: Option<SensorConfig>,
    /// Value sent in step 2, if the send succeeded.
    pub sent: Option<SampledValue>,
    /// The blink LED toggled.
    pub blinked: bool,
}

/// Hardware handles the scheduler takes ownership of.
pub struct Peripherals<C, G, A, W> {
    pub clock: C,
    pub gpio: G,
    pub adc: A,
    pub watchdog: W,
    /// `[blink, status]` indicator lines.
    pub indicator_pins: [PinId; 2],
}

pub struct Scheduler<C, G, A, W, H>
where
    C: Clock + Clone,
    G: Gpio + Clone,
    A: Adc,
    W: WatchdogPort,
    H: ConfigHandler,
{
    config: NodeConfig,
    sensor: SensorConfig,
    state: NodeState,
    clock: C,
    gpio: G,
    sampler: AnalogSampler<A>,
    indicators: IndicatorBank<G>,
    telemetry_timer: Timeout<C>,
    blink_timer: Timeout<C>,
    watchdog: W,
    handler: H,
    tick_count: u64,
}

impl<C, G, A, W, H> Scheduler<C, G, A, W, H>
where
    C: Clock + Clone,
    G: Gpio + Clone,
    A: Adc,
    W: WatchdogPort,
    H: ConfigHandler,
{
    /// Validate `config`, build the indicator bank, and arm both timers.
    ///
    /// Structural problems (bad tunables, bad indicator pins) fail here,
    /// before the loop starts.
    pub fn new(
        config: NodeConfig,
        sensor: SensorConfig,
        peripherals: Peripherals<C, G, A, W>,
        handler: H,
    ) -> Result<Self> {
        config.validate()?;
        sensor.validate()?;

        let Peripherals {
            clock,
            gpio,
            adc,
            watchdog,
            indicator_pins,
        } = peripherals;

        if sensor.mode == SensorMode::Digital && indicator_pins.contains(&sensor.pin) {
            return Err(ConfigError::PinReserved(sensor.pin).into());
        }

        let indicators =
            IndicatorBank::new(gpio.clone(), indicator_pins, config.indicator_active_low)?;

        Ok(Self {
            sensor,
            state: NodeState::NoPeer,
            telemetry_timer: Timeout::new(clock.clone(), config.telemetry_period_ms),
            blink_timer: Timeout::new(clock.clone(), config.blink_period_ms),
            sampler: AnalogSampler::new(adc, config.calibration_scale),
            clock,
            gpio,
            indicators,
            watchdog,
            handler,
            config,
            tick_count: 0,
        })
    }

    /// Re-arm the timers from now and announce the initial selection.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.telemetry_timer.reset();
        self.blink_timer.reset();
        sink.emit(&NodeEvent::Started(self.sensor));
    }

    /// Run one pass of the loop.
    pub fn tick<T, N, S>(&mut self, link: &mut T, negotiator: &mut N, sink: &mut S) -> TickOutcome
    where
        T: Transport,
        N: Negotiator,
        S: EventSink,
    {
        self.tick_count += 1;
        let connected = link.is_available();
        self.track_peer(connected, sink);

        let mut outcome = TickOutcome {
            state: self.state,
            applied: None,
            sent: None,
            blinked: false,
        };

        // 1. Inbound configuration
        if link.readable() > 0 {
            outcome.applied = self.drain_config(link, sink);
        }

        // 2./3. Telemetry, or hold the status LED off
        if connected {
            if self.telemetry_timer.is_expired() {
                self.telemetry_timer.reset();
                outcome.sent = self.send_telemetry(link, sink);
                outcome.state = NodeState::PeerSending;
                self.state = NodeState::PeerIdle;
            }
        } else {
            self.indicators.off(Led::Status);
        }

        // 4. Liveness blink
        if self.blink_timer.is_expired() {
            self.blink_timer.reset();
            self.indicators.toggle(Led::Blink);
            outcome.blinked = true;
        }

        // 5. Connection-parameter handshake
        negotiator.advance();

        // 6. Watchdog, always last
        self.watchdog.feed();

        outcome
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn sensor_config(&self) -> SensorConfig {
        self.sensor
    }

    pub fn node_config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn indicators_mut(&mut self) -> &mut IndicatorBank<G> {
        &mut self.indicators
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    // ── Internal ──────────────────────────────────────────────

    fn track_peer(&mut self, connected: bool, sink: &mut impl EventSink) {
        match (self.state, connected) {
            (NodeState::NoPeer, true) => {
                self.state = NodeState::PeerIdle;
                sink.emit(&NodeEvent::PeerConnected);
            }
            (NodeState::NoPeer, false) => {}
            (_, false) => {
                self.state = NodeState::NoPeer;
                self.handler.reset();
                sink.emit(&NodeEvent::PeerLost);
            }
            (_, true) => {}
        }
    }

    /// Step 1.  The selection is replaced only after the drain, with the
    /// last complete and valid message seen.
    fn drain_config<T: Transport>(
        &mut self,
        link: &mut T,
        sink: &mut impl EventSink,
    ) -> Option<SensorConfig> {
        let mut buf = [0u8; RX_BUFFER_SIZE];
        let mut pending = None;

        for _ in 0..MAX_DRAIN_READS {
            if link.readable() == 0 {
                break;
            }
            let n = match link.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("SCHED: inbound read failed: {:?}", e);
                    break;
                }
            };
            match self.handler.handle(&buf[..n]) {
                Ok(Some(cfg)) => pending = Some(cfg),
                Ok(None) => {}
                Err(e) => sink.emit(&NodeEvent::ConfigRejected(e)),
            }
        }

        let cfg = pending?;
        self.sensor = cfg;
        debug!("SCHED: sensor -> pin {} {:?}", cfg.pin, cfg.mode);
        sink.emit(&NodeEvent::ConfigApplied(cfg));
        Some(cfg)
    }

    fn sample(&mut self) -> SampledValue {
        let now = self.clock.now_ms();
        match self.sensor.mode {
            SensorMode::Analog => self.sampler.sample(self.sensor.pin, now),
            SensorMode::Digital => {
                digital::sample_level(self.gpio.clone(), self.sensor.pin, self.config.digital_pull, now)
            }
        }
    }

    /// Step 2.  The status LED toggles after every attempt, sent or not.
    fn send_telemetry<T: Transport>(
        &mut self,
        link: &mut T,
        sink: &mut impl EventSink,
    ) -> Option<SampledValue> {
        self.state = NodeState::PeerSampling;
        let value = self.sample();

        self.state = NodeState::PeerSending;
        let sent = match self.transmit(link, &value) {
            Ok(()) => {
                sink.emit(&NodeEvent::TelemetrySent(value));
                Some(value)
            }
            Err(e) => {
                warn!("SCHED: telemetry not sent: {}", e);
                sink.emit(&NodeEvent::SendFailed);
                None
            }
        };

        self.indicators.toggle(Led::Status);
        sent
    }

    fn transmit<T: Transport>(
        &mut self,
        link: &mut T,
        value: &SampledValue,
    ) -> core::result::Result<(), LinkError> {
        let mut frame = [0u8; MAX_TELEMETRY_FRAME];
        let len = encode_telemetry(&TelemetryFrame::from(value), &mut frame)?;

        link.wait_send_buffer_empty().map_err(|e| {
            debug!("SCHED: outbound drain failed: {:?}", e);
            LinkError::Io
        })?;

        match link.send(&frame[..len]) {
            Ok(n) if n == len => Ok(()),
            Ok(n) => {
                debug!("SCHED: short send ({} of {} bytes)", n, len);
                Err(LinkError::Io)
            }
            Err(e) => {
                debug!("SCHED: send failed: {:?}", e);
                Err(LinkError::Io)
            }
        }
    }
}
