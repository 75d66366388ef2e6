//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! ESP-IDF logger (UART / USB-CDC in production).  Rejections go out at
//! `warn`, everything else at `info`.

use log::{info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Started(cfg) => {
                info!("START | sensor pin={} mode={:?}", cfg.pin, cfg.mode);
            }
            NodeEvent::PeerConnected => info!("LINK  | peer connected"),
            NodeEvent::PeerLost => info!("LINK  | peer lost"),
            NodeEvent::ConfigApplied(cfg) => {
                info!("CONF  | applied pin={} mode={:?}", cfg.pin, cfg.mode);
            }
            NodeEvent::ConfigRejected(e) => warn!("CONF  | rejected: {}", e),
            NodeEvent::TelemetrySent(v) => {
                info!(
                    "TELEM | t={}ms raw={} value={:.1}",
                    v.timestamp_ms, v.raw, v.scaled
                );
            }
            NodeEvent::SendFailed => warn!("TELEM | send failed"),
        }
    }
}
