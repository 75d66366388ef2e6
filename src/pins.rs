//! GPIO / peripheral pin assignments for the sensor node board.
//!
//! Single source of truth: every driver and adapter references this module
//! rather than hard-coding pin numbers.

use crate::drivers::pin::PinId;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Liveness LED, toggled on the blink period whether or not a peer is present.
pub const LED_BLINK_GPIO: PinId = 18;
/// Status LED, toggled on each telemetry send and held off with no peer.
pub const LED_STATUS_GPIO: PinId = 19;

/// Indicator bus, in bit order (bit 0 = blink, bit 1 = status).
pub const INDICATOR_GPIOS: [PinId; 2] = [LED_BLINK_GPIO, LED_STATUS_GPIO];

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel for each analog input AD0..AD5 (GPIO 1..6 on ESP32-S3).
pub const ANALOG_CHANNELS: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// Number of analog inputs a sensor config may select.
pub const ANALOG_CHANNEL_COUNT: u8 = ANALOG_CHANNELS.len() as u8;

// ---------------------------------------------------------------------------
// Digital inputs
// ---------------------------------------------------------------------------

/// GPIO numbers `0..GPIO_COUNT` exist on the ESP32-S3.
pub const GPIO_COUNT: PinId = 49;
