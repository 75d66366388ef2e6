//! System configuration parameters
//!
//! [`NodeConfig`] holds the tunables fixed at boot (periods, calibration,
//! watchdog window).  [`SensorConfig`] is the runtime sensor selection that
//! inbound messages replace while the loop runs.
//!
//! Nothing here is persisted; every reset starts from the defaults.

use serde::{Deserialize, Serialize};

use crate::drivers::pin::{PinId, Pull};
use crate::error::ConfigError;
use crate::pins;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Timing ---
    /// Telemetry send period while a peer is connected (milliseconds)
    pub telemetry_period_ms: u32,
    /// Liveness blink half-period (milliseconds)
    pub blink_period_ms: u32,
    /// Watchdog deadline (milliseconds).  One tick must never take longer.
    pub watchdog_timeout_ms: u32,

    // --- Analog ---
    /// Raw ADC counts → physical units (mV per count)
    pub calibration_scale: f32,

    // --- Digital ---
    /// Pull resistor applied when a digital sensor pin is sampled
    pub digital_pull: Pull,

    // --- Indicators ---
    /// LEDs light when their line is driven LOW
    pub indicator_active_low: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Timing
            telemetry_period_ms: 1000, // 1 Hz
            blink_period_ms: 500,      // 1 Hz blink
            watchdog_timeout_ms: 10_000,

            // Analog: 3.6 V full scale over 10 bits → 3.52 mV/count
            calibration_scale: 3.52,

            // Digital
            digital_pull: Pull::Up,

            // Indicators
            indicator_active_low: false,
        }
    }
}

impl NodeConfig {
    /// Range-check every field.  Called once before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telemetry_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_period_ms must be > 0"));
        }
        if self.blink_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("blink_period_ms must be > 0"));
        }
        if self.watchdog_timeout_ms < 1000 {
            return Err(ConfigError::ValidationFailed("watchdog_timeout_ms must be >= 1000"));
        }
        if !self.calibration_scale.is_finite() || self.calibration_scale <= 0.0 {
            return Err(ConfigError::ValidationFailed("calibration_scale must be finite and > 0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Runtime sensor selection
// ---------------------------------------------------------------------------

/// How the selected pin is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorMode {
    /// Multiplexed ADC channel, scaled by the calibration constant.
    Analog,
    /// Plain digital level, 0 or 1.
    Digital,
}

/// Which input the telemetry step samples.
///
/// One writer (the config-apply step) and one reader (the sampling step)
/// per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// ADC channel index in analog mode, GPIO number in digital mode.
    pub pin: PinId,
    pub mode: SensorMode,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            pin: 0,
            mode: SensorMode::Analog,
        }
    }
}

impl SensorConfig {
    /// Check the selection against the board's limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            SensorMode::Analog => {
                let max = pins::ANALOG_CHANNEL_COUNT - 1;
                if self.pin > max {
                    return Err(ConfigError::ChannelOutOfRange { channel: self.pin, max });
                }
            }
            SensorMode::Digital => {
                let max = pins::GPIO_COUNT - 1;
                if self.pin > max {
                    return Err(ConfigError::PinOutOfRange { pin: self.pin, max });
                }
            }
        }
        Ok(())
    }
}
