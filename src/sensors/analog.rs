//! Analog sampler over the shared, multiplexed ADC.
//!
//! Channel select, then one bounded-latency sample-and-hold.  Conversion to
//! physical units is the pure `raw * calibration_scale`; the scale comes
//! from [`NodeConfig`](crate::config::NodeConfig) and is never derived at
//! runtime.

use crate::app::ports::Adc;
use crate::sensors::SampledValue;

pub struct AnalogSampler<A: Adc> {
    adc: A,
    calibration_scale: f32,
    selected: Option<u8>,
}

impl<A: Adc> AnalogSampler<A> {
    pub fn new(adc: A, calibration_scale: f32) -> Self {
        Self {
            adc,
            calibration_scale,
            selected: None,
        }
    }

    pub fn channel_count(&self) -> u8 {
        self.adc.channel_count()
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    /// Route `channel` to the converter.
    pub fn select_channel(&mut self, channel: u8) {
        assert!(
            channel < self.adc.channel_count(),
            "hardware fault: ADC channel {} does not exist ({} channels)",
            channel,
            self.adc.channel_count()
        );
        self.adc.select_channel(channel);
        self.selected = Some(channel);
    }

    /// Raw counts from the selected channel.
    pub fn read(&mut self) -> u16 {
        assert!(
            self.selected.is_some(),
            "hardware fault: ADC read with no channel selected"
        );
        self.adc.read()
    }

    /// Counts → physical units.
    pub fn scale(&self, raw: u16) -> f32 {
        f32::from(raw) * self.calibration_scale
    }

    /// Select, convert and scale in one step.
    pub fn sample(&mut self, channel: u8, now_ms: u32) -> SampledValue {
        self.select_channel(channel);
        let raw = self.read();
        SampledValue {
            timestamp_ms: now_ms,
            raw,
            scaled: self.scale(raw),
        }
    }
}
