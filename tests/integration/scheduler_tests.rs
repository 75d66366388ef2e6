//! End-to-end scheduler behaviour over simulated hardware.

use embedded_hal::digital::PinState;
use sensor_node::app::events::NodeEvent;
use sensor_node::config::{NodeConfig, SensorConfig, SensorMode};
use sensor_node::drivers::pin::Direction;
use sensor_node::error::ConfigError;
use sensor_node::pins;
use sensor_node::scheduler::{MAX_DRAIN_READS, NodeState};

use crate::mock_hw::{MockLink, Node, framed_config};

const DIGITAL_7: SensorConfig = SensorConfig { pin: 7, mode: SensorMode::Digital };

#[test]
fn digital_pin_config_then_periodic_send() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    node.gpio.drive(7, PinState::High);

    // Connect and deliver the config in the same tick.
    node.link.push_packet(&framed_config(&DIGITAL_7));
    let out = node.tick();
    assert_eq!(out.applied, Some(DIGITAL_7));
    assert!(node.link.sent.is_empty(), "telemetry waits for its period");

    // Next tick after one period: read pin 7, send it, toggle status once.
    let out = node.tick_after(1000);
    assert_eq!(out.state, NodeState::PeerSending);
    assert_eq!(node.gpio.direction_of(7), Direction::Input(NodeConfig::default().digital_pull));
    assert_eq!(node.link.sent.len(), 1);
    assert_eq!(node.link.drain_waits, 1);

    let frame = node.link.telemetry()[0];
    assert_eq!(frame.value, 1);
    assert_eq!(frame.timestamp_ms, 1000);
    assert!(node.status_led());

    // And again one period later; status toggles back.
    node.gpio.drive(7, PinState::Low);
    node.tick_after(1000);
    assert_eq!(node.link.telemetry()[1].value, 0);
    assert!(!node.status_led());
}

#[test]
fn status_led_forced_off_whenever_peer_is_gone() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    node.tick_after(1000);
    assert!(node.status_led(), "one send lit the status LED");

    node.link.connected = false;
    let out = node.tick();
    assert_eq!(out.state, NodeState::NoPeer);
    assert!(!node.status_led());

    for _ in 0..5 {
        node.tick_after(1000);
        assert!(!node.status_led());
    }
    assert_eq!(node.link.sent.len(), 1);
}

#[test]
fn analog_payload_matches_calibration() {
    let scale = NodeConfig::default().calibration_scale;
    for (channel, raw) in [(0u8, 0u16), (3, 512), (5, 1023)] {
        let mut node = Node::new(SensorConfig { pin: channel, mode: SensorMode::Analog });
        node.link = MockLink::connected();
        node.adc.set_raw(channel, raw);
        node.tick_after(1000);

        let frame = node.link.telemetry()[0];
        let expected = f32::from(raw) * scale;
        assert!(
            (f32::from(frame.value) - expected).abs() <= 0.5,
            "channel {channel}: sent {} expected {expected}",
            frame.value
        );
        assert_eq!(node.adc.selected(), Some(channel));
    }
}

#[test]
fn negotiator_and_watchdog_run_exactly_once_per_tick() {
    let mut node = Node::new(SensorConfig::default());
    let pattern = [true, true, false, true, false, false, true, true, true, false];
    for (i, &connected) in pattern.iter().enumerate() {
        node.link.connected = connected;
        node.tick_after(333);
        let ticks = i as u32 + 1;
        assert_eq!(node.negotiator.calls, ticks);
        assert_eq!(node.sched.watchdog().feed_count(), u64::from(ticks));
    }
}

#[test]
fn split_config_frame_applies_only_when_complete() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    let bytes = framed_config(&DIGITAL_7);

    node.link.push_packet(&bytes[..3]);
    assert_eq!(node.tick().applied, None);
    assert_eq!(node.sched.sensor_config(), SensorConfig::default());

    node.link.push_packet(&bytes[3..bytes.len() - 1]);
    assert_eq!(node.tick().applied, None);
    assert_eq!(node.sched.sensor_config(), SensorConfig::default());

    node.link.push_packet(&bytes[bytes.len() - 1..]);
    assert_eq!(node.tick().applied, Some(DIGITAL_7));
    assert_eq!(node.sched.sensor_config(), DIGITAL_7);
}

#[test]
fn malformed_and_reserved_configs_never_apply() {
    let start = SensorConfig { pin: 2, mode: SensorMode::Analog };
    let mut node = Node::new(start);
    node.link = MockLink::connected();

    node.link.push_packet(&[2, 0, 0, 0, 0x01, 0x09]);
    node.tick();
    let led = SensorConfig { pin: pins::LED_BLINK_GPIO, mode: SensorMode::Digital };
    node.link.push_packet(&framed_config(&led));
    node.tick();
    let far = SensorConfig { pin: 60, mode: SensorMode::Digital };
    node.link.push_packet(&framed_config(&far));
    node.tick();

    assert_eq!(node.sched.sensor_config(), start);
    let rejected: Vec<_> = node
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            NodeEvent::ConfigRejected(err) => Some(*err),
            _ => None,
        })
        .collect();
    assert_eq!(
        rejected,
        vec![
            ConfigError::Decode,
            ConfigError::PinReserved(pins::LED_BLINK_GPIO),
            ConfigError::PinOutOfRange { pin: 60, max: pins::GPIO_COUNT - 1 },
        ]
    );
}

#[test]
fn drain_is_bounded_per_tick() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    let last = SensorConfig { pin: 4, mode: SensorMode::Analog };
    for _ in 0..MAX_DRAIN_READS {
        node.link.push_packet(&framed_config(&DIGITAL_7));
    }
    node.link.push_packet(&framed_config(&last));

    assert_eq!(node.tick().applied, Some(DIGITAL_7));
    assert_eq!(node.link.inbound.len(), 1, "one packet left for the next tick");
    assert_eq!(node.tick().applied, Some(last));
}

#[test]
fn blink_runs_with_or_without_peer() {
    let mut node = Node::new(SensorConfig::default());
    assert!(!node.blink_led());
    node.tick_after(500);
    assert!(node.blink_led());

    node.link.connected = true;
    node.tick_after(500);
    assert!(!node.blink_led());

    node.link.connected = false;
    node.tick_after(500);
    assert!(node.blink_led());
}

#[test]
fn timing_survives_clock_wraparound() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    node.clock.set(u32::MAX - 400);
    node.sched.start(&mut node.sink);

    node.tick_after(600);
    assert!(node.link.sent.is_empty());
    node.tick_after(400);
    assert_eq!(node.link.sent.len(), 1);
    assert_eq!(node.link.telemetry()[0].timestamp_ms, 599);
}

#[test]
fn reconnect_reports_transitions_and_drops_partial_config() {
    let mut node = Node::new(SensorConfig::default());
    node.link = MockLink::connected();
    let bytes = framed_config(&DIGITAL_7);

    node.link.push_packet(&bytes[..4]);
    node.tick();
    node.link.connected = false;
    node.tick();
    node.link.connected = true;
    node.link.push_packet(&bytes);
    assert_eq!(node.tick().applied, Some(DIGITAL_7));

    let transitions: Vec<_> = node
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, NodeEvent::PeerConnected | NodeEvent::PeerLost))
        .cloned()
        .collect();
    assert_eq!(
        transitions,
        vec![NodeEvent::PeerConnected, NodeEvent::PeerLost, NodeEvent::PeerConnected]
    );
}
