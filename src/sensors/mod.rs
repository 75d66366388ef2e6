//! Sensor subsystem: analog sampler and digital level reads.
//!
//! Both paths produce a [`SampledValue`] that the telemetry step sends and
//! drops within the same tick.

pub mod analog;
pub mod digital;

/// One reading, produced and consumed within a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledValue {
    /// Clock reading when the sample was taken.
    pub timestamp_ms: u32,
    /// ADC counts, or 0/1 for a digital level.
    pub raw: u16,
    /// Physical units (analog) or the level itself (digital).
    pub scaled: f32,
}
