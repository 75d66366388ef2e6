//! Outbound telemetry frame.
//!
//! One [`SampledValue`] becomes one length-prefixed frame whose payload is a
//! postcard-encoded [`TelemetryFrame`].  The value is the scaled reading
//! rounded to the nearest integer and saturated to `u16`.

use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::link::codec::{HEADER_SIZE, encode_frame};
use crate::sensors::SampledValue;

/// Postcard upper bound: varint u32 (5) + varint u16 (3).
const MAX_PAYLOAD_SIZE: usize = 8;

/// Largest encoded telemetry frame, header included.
pub const MAX_TELEMETRY_FRAME: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub timestamp_ms: u32,
    pub value: u16,
}

impl From<&SampledValue> for TelemetryFrame {
    fn from(v: &SampledValue) -> Self {
        Self {
            timestamp_ms: v.timestamp_ms,
            value: saturate_u16(v.scaled),
        }
    }
}

fn saturate_u16(x: f32) -> u16 {
    if x.is_nan() {
        return 0;
    }
    x.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

/// Encode `frame` into `out`, returning the number of bytes to send.
pub fn encode_telemetry(frame: &TelemetryFrame, out: &mut [u8]) -> Result<usize, LinkError> {
    let mut payload = [0u8; MAX_PAYLOAD_SIZE];
    let used = postcard::to_slice(frame, &mut payload)
        .map_err(|_| LinkError::FrameTooLarge)?
        .len();
    encode_frame(&payload[..used], out).ok_or(LinkError::FrameTooLarge)
}
