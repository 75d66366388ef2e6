//! Mock link and collaborators for integration tests.
//!
//! The GPIO/ADC/clock doubles come from `sensor_node::adapters::sim`; this
//! module adds the wireless side: a scripted transport, a counting
//! negotiator, and a sink that records every event.

use std::collections::VecDeque;

use sensor_node::adapters::sim::{SimAdc, SimClock, SimGpio};
use sensor_node::app::events::NodeEvent;
use sensor_node::app::ports::{EventSink, Negotiator};
use sensor_node::config::{NodeConfig, SensorConfig};
use sensor_node::drivers::watchdog::Watchdog;
use sensor_node::link::codec::{Decoded, FrameDecoder, MAX_ENCODED_SIZE, encode_frame};
use sensor_node::link::config_rx::FramedConfigHandler;
use sensor_node::link::negotiation::ConnParamsLink;
use sensor_node::link::telemetry::TelemetryFrame;
use sensor_node::link::transport::Transport;
use sensor_node::pins;
use sensor_node::scheduler::{Peripherals, Scheduler, TickOutcome};

// ── Transport ─────────────────────────────────────────────────

/// Scripted peer.  Inbound bytes are queued as separate "packets" so a
/// single `read` never crosses a packet boundary, like a GATT write.
#[derive(Default)]
pub struct MockLink {
    pub connected: bool,
    pub params_ok: bool,
    pub inbound: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    pub drain_waits: u32,
    pub update_requests: u32,
}

#[allow(dead_code)]
impl MockLink {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn push_packet(&mut self, bytes: &[u8]) {
        self.inbound.push_back(bytes.to_vec());
    }

    /// Every frame sent so far, decoded.
    pub fn telemetry(&self) -> Vec<TelemetryFrame> {
        self.sent.iter().map(|b| decode_telemetry(b)).collect()
    }
}

impl Transport for MockLink {
    type Error = &'static str;

    fn is_available(&self) -> bool {
        self.connected
    }

    fn readable(&self) -> usize {
        self.inbound.front().map_or(0, Vec::len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(mut packet) = self.inbound.pop_front() else {
            return Ok(0);
        };
        let n = packet.len().min(buf.len());
        buf[..n].copy_from_slice(&packet[..n]);
        if n < packet.len() {
            packet.drain(..n);
            self.inbound.push_front(packet);
        }
        Ok(n)
    }

    fn wait_send_buffer_empty(&mut self) -> Result<(), Self::Error> {
        self.drain_waits += 1;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if !self.connected {
            return Err("not connected");
        }
        self.sent.push(data.to_vec());
        Ok(data.len())
    }
}

impl ConnParamsLink for MockLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn params_acceptable(&self) -> bool {
        self.params_ok
    }

    fn request_update(&mut self) -> bool {
        self.update_requests += 1;
        true
    }
}

// ── Negotiator / sink ─────────────────────────────────────────

#[derive(Default)]
pub struct CountingNegotiator {
    pub calls: u32,
}

impl Negotiator for CountingNegotiator {
    fn advance(&mut self) {
        self.calls += 1;
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&NodeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(event.clone());
    }
}

// ── Wire helpers ──────────────────────────────────────────────

pub fn framed_config(cfg: &SensorConfig) -> Vec<u8> {
    let payload = postcard::to_allocvec(cfg).expect("encode config");
    let mut out = [0u8; MAX_ENCODED_SIZE];
    let n = encode_frame(&payload, &mut out).expect("frame config");
    out[..n].to_vec()
}

pub fn decode_telemetry(bytes: &[u8]) -> TelemetryFrame {
    let mut dec = FrameDecoder::new();
    let (used, out) = dec.feed(bytes);
    assert_eq!(used, bytes.len(), "one send must be exactly one frame");
    match out {
        Some(Decoded::Frame(payload)) => postcard::from_bytes(payload).expect("decode telemetry"),
        other => panic!("expected a telemetry frame, got {:?}", other),
    }
}

// ── Assembled node ────────────────────────────────────────────

pub type SimScheduler = Scheduler<SimClock, SimGpio, SimAdc, Watchdog, FramedConfigHandler>;

/// A scheduler wired to simulated hardware, plus the handles tests poke.
pub struct Node {
    pub clock: SimClock,
    pub gpio: SimGpio,
    pub adc: SimAdc,
    pub sched: SimScheduler,
    pub link: MockLink,
    pub negotiator: CountingNegotiator,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Node {
    pub fn new(sensor: SensorConfig) -> Self {
        Self::with_config(NodeConfig::default(), sensor)
    }

    pub fn with_config(config: NodeConfig, sensor: SensorConfig) -> Self {
        let clock = SimClock::new();
        let gpio = SimGpio::new();
        let adc = SimAdc::new(pins::ANALOG_CHANNEL_COUNT);
        let mut sched = Scheduler::new(
            config,
            sensor,
            Peripherals {
                clock: clock.clone(),
                gpio: gpio.clone(),
                adc: adc.clone(),
                watchdog: Watchdog::new(),
                indicator_pins: pins::INDICATOR_GPIOS,
            },
            FramedConfigHandler::new(&pins::INDICATOR_GPIOS),
        )
        .expect("valid scheduler");
        let mut sink = RecordingSink::default();
        sched.start(&mut sink);
        Self {
            clock,
            gpio,
            adc,
            sched,
            link: MockLink::default(),
            negotiator: CountingNegotiator::default(),
            sink,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.sched
            .tick(&mut self.link, &mut self.negotiator, &mut self.sink)
    }

    /// Advance the clock by `ms`, then tick once.
    pub fn tick_after(&mut self, ms: u32) -> TickOutcome {
        self.clock.advance(ms);
        self.tick()
    }

    pub fn status_led(&self) -> bool {
        self.gpio.level_of(pins::LED_STATUS_GPIO) == embedded_hal::digital::PinState::High
    }

    pub fn blink_led(&self) -> bool {
        self.gpio.level_of(pins::LED_BLINK_GPIO) == embedded_hal::digital::PinState::High
    }
}
