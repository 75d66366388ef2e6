//! Connection-parameter negotiation driven through the scheduler loop.

use sensor_node::config::SensorConfig;
use sensor_node::link::negotiation::{
    ConnParamsNegotiator, FIRST_UPDATE_DELAY_MS, MAX_UPDATE_ATTEMPTS, NEXT_UPDATE_DELAY_MS,
    NegotiationParams, NegotiationState,
};

use sensor_node::adapters::sim::SimClock;

use crate::mock_hw::{MockLink, Node};

type Negotiator = ConnParamsNegotiator<SimClock, MockLink>;

/// Tick every `step` ms for `ms`, mirroring the peer state into the
/// negotiator's view of the stack.
fn run_for(node: &mut Node, neg: &mut Negotiator, ms: u32, step: u32) {
    let mut elapsed = 0;
    while elapsed < ms {
        node.clock.advance(step);
        elapsed += step;
        neg.link_mut().connected = node.link.connected;
        node.sched.tick(&mut node.link, neg, &mut node.sink);
    }
}

fn negotiator(node: &Node) -> Negotiator {
    ConnParamsNegotiator::new(node.clock.clone(), MockLink::default(), NegotiationParams::default())
}

#[test]
fn requests_are_delayed_spaced_and_capped() {
    let mut node = Node::new(SensorConfig::default());
    let mut neg = negotiator(&node);
    node.link = MockLink::connected();

    run_for(&mut node, &mut neg, FIRST_UPDATE_DELAY_MS - 100, 100);
    assert_eq!(neg.state(), NegotiationState::Waiting);
    assert_eq!(neg.link().update_requests, 0);

    run_for(&mut node, &mut neg, 200, 100);
    assert_eq!(neg.link().update_requests, 1);

    run_for(&mut node, &mut neg, NEXT_UPDATE_DELAY_MS * u32::from(MAX_UPDATE_ATTEMPTS), 100);
    assert_eq!(neg.link().update_requests, u32::from(MAX_UPDATE_ATTEMPTS));
    assert_eq!(neg.state(), NegotiationState::Failed);

    // Telemetry kept flowing the whole time.
    assert!(node.link.sent.len() > 30);
}

#[test]
fn acceptance_and_reconnect() {
    let mut node = Node::new(SensorConfig::default());
    let mut neg = negotiator(&node);
    node.link = MockLink::connected();

    // First tick notices the peer; the delay runs from there.
    run_for(&mut node, &mut neg, FIRST_UPDATE_DELAY_MS + 100, 100);
    assert_eq!(neg.link().update_requests, 1);

    neg.link_mut().params_ok = true;
    run_for(&mut node, &mut neg, 100, 100);
    assert_eq!(neg.state(), NegotiationState::Accepted);

    node.link.connected = false;
    run_for(&mut node, &mut neg, 100, 100);
    assert_eq!(neg.state(), NegotiationState::Disconnected);
    assert_eq!(neg.attempts(), 0);

    node.link.connected = true;
    run_for(&mut node, &mut neg, 200, 100);
    assert_eq!(neg.state(), NegotiationState::Accepted);
    assert_eq!(neg.link().update_requests, 1);
}
