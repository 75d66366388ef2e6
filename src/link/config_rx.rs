//! Default inbound configuration receiver.
//!
//! Inbound bytes are length-prefixed frames (see [`codec`](super::codec))
//! whose payload is a postcard-encoded [`SensorConfig`].  A frame is only
//! surfaced once it is complete, decodes, and passes validation; anything
//! else is dropped here and never reaches scheduler state.

use log::{debug, warn};

use crate::app::ports::ConfigHandler;
use crate::config::{SensorConfig, SensorMode};
use crate::drivers::pin::PinId;
use crate::error::ConfigError;
use crate::link::codec::{Decoded, FrameDecoder};

pub struct FramedConfigHandler {
    decoder: FrameDecoder,
    /// Lines a digital selection may not claim (the indicators).
    reserved: heapless::Vec<PinId, 4>,
}

impl FramedConfigHandler {
    /// `reserved` lists GPIOs that digital sampling must never reconfigure.
    /// Only the first four are kept.
    pub fn new(reserved: &[PinId]) -> Self {
        let mut list = heapless::Vec::new();
        for &id in reserved {
            if list.push(id).is_err() {
                warn!("config_rx: reserved pin list truncated at {}", list.len());
                break;
            }
        }
        Self {
            decoder: FrameDecoder::new(),
            reserved: list,
        }
    }

    fn parse(&self, payload: &[u8]) -> Result<SensorConfig, ConfigError> {
        let cfg: SensorConfig = match postcard::take_from_bytes(payload) {
            Ok((cfg, rest)) if rest.is_empty() => cfg,
            _ => return Err(ConfigError::Decode),
        };
        cfg.validate()?;
        if cfg.mode == SensorMode::Digital && self.reserved.contains(&cfg.pin) {
            return Err(ConfigError::PinReserved(cfg.pin));
        }
        Ok(cfg)
    }
}

impl ConfigHandler for FramedConfigHandler {
    fn handle(&mut self, bytes: &[u8]) -> Result<Option<SensorConfig>, ConfigError> {
        let mut latest = None;
        let mut last_err = None;
        let mut offset = 0;

        while offset < bytes.len() {
            let (used, item) = self.decoder.feed(&bytes[offset..]);
            offset += used;

            let result = match item {
                Some(Decoded::Frame(payload)) => {
                    // Copy out so the decoder borrow ends before parsing.
                    let mut buf = [0u8; super::codec::MAX_FRAME_SIZE];
                    let len = payload.len();
                    buf[..len].copy_from_slice(payload);
                    self.parse(&buf[..len])
                }
                Some(Decoded::BadHeader(len)) => {
                    debug!("config_rx: bad frame header (len={})", len);
                    Err(ConfigError::BadFrame)
                }
                None => break,
            };

            match result {
                Ok(cfg) => latest = Some(cfg),
                Err(e) => {
                    warn!("config_rx: dropped message: {}", e);
                    last_err = Some(e);
                }
            }
        }

        match (latest, last_err) {
            (Some(cfg), _) => Ok(Some(cfg)),
            (None, Some(e)) => Err(e),
            (None, None) => Ok(None),
        }
    }

    fn reset(&mut self) {
        self.decoder.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::codec::{MAX_ENCODED_SIZE, encode_frame};
    use crate::pins;

    fn framed(cfg: &SensorConfig) -> Vec<u8> {
        let payload = postcard::to_allocvec(cfg).unwrap();
        let mut out = [0u8; MAX_ENCODED_SIZE];
        let n = encode_frame(&payload, &mut out).unwrap();
        out[..n].to_vec()
    }

    fn handler() -> FramedConfigHandler {
        FramedConfigHandler::new(&pins::INDICATOR_GPIOS)
    }

    #[test]
    fn complete_frame_yields_config() {
        let cfg = SensorConfig { pin: 7, mode: SensorMode::Digital };
        assert_eq!(handler().handle(&framed(&cfg)), Ok(Some(cfg)));
    }

    #[test]
    fn partial_frame_is_held_until_complete() {
        let cfg = SensorConfig { pin: 3, mode: SensorMode::Analog };
        let bytes = framed(&cfg);
        let mut h = handler();
        assert_eq!(h.handle(&bytes[..3]), Ok(None));
        assert_eq!(h.handle(&bytes[3..5]), Ok(None));
        assert_eq!(h.handle(&bytes[5..]), Ok(Some(cfg)));
    }

    #[test]
    fn latest_of_several_frames_wins() {
        let a = SensorConfig { pin: 1, mode: SensorMode::Analog };
        let b = SensorConfig { pin: 9, mode: SensorMode::Digital };
        let mut bytes = framed(&a);
        bytes.extend(framed(&b));
        assert_eq!(handler().handle(&bytes), Ok(Some(b)));
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let mut out = [0u8; MAX_ENCODED_SIZE];
        let n = encode_frame(&[0x07, 0x05, 0xff], &mut out).unwrap();
        assert_eq!(handler().handle(&out[..n]), Err(ConfigError::Decode));
    }

    #[test]
    fn oversized_header_is_a_bad_frame() {
        assert_eq!(handler().handle(&1000u32.to_le_bytes()), Err(ConfigError::BadFrame));
    }

    #[test]
    fn out_of_range_and_reserved_pins_are_rejected() {
        let bad_channel = SensorConfig { pin: pins::ANALOG_CHANNEL_COUNT, mode: SensorMode::Analog };
        assert!(matches!(
            handler().handle(&framed(&bad_channel)),
            Err(ConfigError::ChannelOutOfRange { .. })
        ));

        let led = SensorConfig { pin: pins::LED_STATUS_GPIO, mode: SensorMode::Digital };
        assert_eq!(
            handler().handle(&framed(&led)),
            Err(ConfigError::PinReserved(pins::LED_STATUS_GPIO))
        );
    }

    #[test]
    fn reset_drops_partial_message() {
        let cfg = SensorConfig { pin: 4, mode: SensorMode::Analog };
        let bytes = framed(&cfg);
        let mut h = handler();
        assert_eq!(h.handle(&bytes[..5]), Ok(None));
        h.reset();
        assert_eq!(h.handle(&bytes), Ok(Some(cfg)));
    }

    #[test]
    fn valid_frame_after_bad_one_still_applies() {
        let cfg = SensorConfig { pin: 2, mode: SensorMode::Analog };
        let mut bytes = 0u32.to_le_bytes().to_vec();
        bytes.extend(framed(&cfg));
        assert_eq!(handler().handle(&bytes), Ok(Some(cfg)));
    }
}
