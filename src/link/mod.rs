//! Link layer: everything between the scheduler and the wireless stack.
//!
//! The stack itself is an external collaborator reached through
//! [`transport::Transport`] and [`negotiation::ConnParamsLink`].  What lives
//! here is the byte-level framing ([`codec`]), the default inbound
//! configuration receiver ([`config_rx`]), the outbound telemetry encoding
//! ([`telemetry`]) and the connection-parameter handshake
//! ([`negotiation`]).

pub mod codec;
pub mod config_rx;
pub mod negotiation;
pub mod telemetry;
pub mod transport;
