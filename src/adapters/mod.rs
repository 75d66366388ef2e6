//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                   |
//! |------------|--------------|-------------------------------|
//! | `hardware` | Gpio, Adc    | ESP32 GPIO matrix, ADC1       |
//! | `log_sink` | EventSink    | Serial log output             |
//! | `time`     | Clock        | ESP32 high-resolution timer   |
//! | `sim`      | Gpio, Adc,   | In-memory state (host only)   |
//! |            | Clock        |                               |

pub mod hardware;
pub mod log_sink;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod time;
