//! Connection-parameter update negotiation.
//!
//! After a peer connects, the node waits a short settling delay and then,
//! if the link's current interval/latency/supervision parameters are not
//! the ones it prefers, asks the peer to change them.  Requests are spaced
//! out and capped; once the cap is hit the node gives up until the next
//! connection.
//!
//! ```text
//!  Disconnected ──connect──▶ Waiting ──params ok──▶ Accepted
//!        ▲                      │  ▲                    │
//!        │                 cap hit │ params drift        │
//!        │                      ▼  └────────────────────┘
//!        └──── disconnect ─── Failed
//! ```
//!
//! [`ConnParamsNegotiator::advance`] is one non-blocking step; the
//! scheduler calls it exactly once per tick whatever the link state.

use log::{debug, info, warn};

use crate::app::ports::{Clock, Negotiator};
use crate::drivers::timeout::Timeout;

/// Delay from connection to the first update request.
pub const FIRST_UPDATE_DELAY_MS: u32 = 5_000;
/// Delay between subsequent requests.
pub const NEXT_UPDATE_DELAY_MS: u32 = 30_000;
/// Requests sent before giving up on this connection.
pub const MAX_UPDATE_ATTEMPTS: u8 = 3;

/// What the negotiator needs from the wireless stack.
pub trait ConnParamsLink {
    fn is_connected(&self) -> bool;

    /// The link currently runs with acceptable parameters.
    fn params_acceptable(&self) -> bool;

    /// Ask the peer for the preferred parameters.  Returns `false` if the
    /// stack could not queue the request (it counts as an attempt anyway).
    fn request_update(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationParams {
    pub first_delay_ms: u32,
    pub next_delay_ms: u32,
    pub max_attempts: u8,
}

impl Default for NegotiationParams {
    fn default() -> Self {
        Self {
            first_delay_ms: FIRST_UPDATE_DELAY_MS,
            next_delay_ms: NEXT_UPDATE_DELAY_MS,
            max_attempts: MAX_UPDATE_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Disconnected,
    Waiting,
    Accepted,
    Failed,
}

pub struct ConnParamsNegotiator<C: Clock, L: ConnParamsLink> {
    link: L,
    params: NegotiationParams,
    timer: Timeout<C>,
    state: NegotiationState,
    attempts: u8,
}

impl<C: Clock, L: ConnParamsLink> ConnParamsNegotiator<C, L> {
    pub fn new(clock: C, link: L, params: NegotiationParams) -> Self {
        Self {
            link,
            timer: Timeout::new(clock, params.first_delay_ms),
            params,
            state: NegotiationState::Disconnected,
            attempts: 0,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Requests sent on the current connection.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    fn transition(&mut self, to: NegotiationState) {
        if self.state != to {
            debug!("conn_params: {:?} -> {:?}", self.state, to);
            self.state = to;
        }
    }

    fn step_waiting(&mut self) {
        if self.link.params_acceptable() {
            info!("conn_params: accepted after {} request(s)", self.attempts);
            self.transition(NegotiationState::Accepted);
            return;
        }
        if !self.timer.is_expired() {
            return;
        }
        if self.attempts >= self.params.max_attempts {
            warn!("conn_params: giving up after {} request(s)", self.attempts);
            self.transition(NegotiationState::Failed);
            return;
        }
        self.attempts += 1;
        if !self.link.request_update() {
            warn!("conn_params: request {} not queued", self.attempts);
        }
        self.timer.restart(self.params.next_delay_ms);
    }
}

impl<C: Clock, L: ConnParamsLink> Negotiator for ConnParamsNegotiator<C, L> {
    fn advance(&mut self) {
        if !self.link.is_connected() {
            self.attempts = 0;
            self.transition(NegotiationState::Disconnected);
            return;
        }

        match self.state {
            NegotiationState::Disconnected => {
                self.attempts = 0;
                self.timer.restart(self.params.first_delay_ms);
                self.transition(NegotiationState::Waiting);
            }
            NegotiationState::Waiting => self.step_waiting(),
            NegotiationState::Accepted => {
                if !self.link.params_acceptable() {
                    self.timer.restart(self.params.next_delay_ms);
                    self.transition(NegotiationState::Waiting);
                }
            }
            NegotiationState::Failed => {}
        }
    }
}
