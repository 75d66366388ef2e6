//! Length-prefix frame codec.
//!
//! Wire format:
//! ```text
//! ┌────────────┬──────────────────────────┐
//! │ Length (4B)│ Payload (1..=64 B)       │
//! │ LE u32     │                          │
//! └────────────┴──────────────────────────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete frames.  A
//! single `Transport::read` may return part of the header, part of the
//! payload, or several frames back to back; `feed` reports how much it
//! consumed so the caller can hand it the rest.

/// Maximum frame payload size.
pub const MAX_FRAME_SIZE: usize = 64;

/// Frame header size (4-byte little-endian length).
pub const HEADER_SIZE: usize = 4;

/// Largest encoded frame.
pub const MAX_ENCODED_SIZE: usize = HEADER_SIZE + MAX_FRAME_SIZE;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Waiting for header bytes.
    ReadingHeader { collected: usize },
    /// Header received, reading payload.
    ReadingPayload { expected: usize, collected: usize },
}

/// What a call to [`FrameDecoder::feed`] produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// A complete payload.  Valid until the next `feed`.
    Frame(&'a [u8]),
    /// The header announced a zero or oversized payload.  All four header
    /// bytes are consumed and decoding resumes at the next header position.
    BadHeader(u32),
}

/// Streaming frame decoder.
pub struct FrameDecoder {
    state: DecoderState,
    header_buf: [u8; HEADER_SIZE],
    payload_buf: [u8; MAX_FRAME_SIZE],
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::ReadingHeader { collected: 0 },
            header_buf: [0; HEADER_SIZE],
            payload_buf: [0; MAX_FRAME_SIZE],
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Stops at the first complete frame or bad header and returns the
    /// number of bytes of `data` consumed along with it.  Returns
    /// `(data.len(), None)` when everything was buffered without
    /// completing anything.
    pub fn feed(&mut self, data: &[u8]) -> (usize, Option<Decoded<'_>>) {
        let mut offset = 0;

        while offset < data.len() {
            match &mut self.state {
                DecoderState::ReadingHeader { collected } => {
                    let to_copy = (HEADER_SIZE - *collected).min(data.len() - offset);

                    self.header_buf[*collected..*collected + to_copy]
                        .copy_from_slice(&data[offset..offset + to_copy]);

                    *collected += to_copy;
                    offset += to_copy;

                    if *collected == HEADER_SIZE {
                        let announced = u32::from_le_bytes(self.header_buf);
                        let expected = announced as usize;

                        if expected == 0 || expected > MAX_FRAME_SIZE {
                            self.state = DecoderState::ReadingHeader { collected: 0 };
                            return (offset, Some(Decoded::BadHeader(announced)));
                        }

                        self.state = DecoderState::ReadingPayload {
                            expected,
                            collected: 0,
                        };
                    }
                }

                DecoderState::ReadingPayload { expected, collected } => {
                    let to_copy = (*expected - *collected).min(data.len() - offset);

                    self.payload_buf[*collected..*collected + to_copy]
                        .copy_from_slice(&data[offset..offset + to_copy]);

                    *collected += to_copy;
                    offset += to_copy;

                    if *collected == *expected {
                        let len = *expected;
                        self.state = DecoderState::ReadingHeader { collected: 0 };
                        return (offset, Some(Decoded::Frame(&self.payload_buf[..len])));
                    }
                }
            }
        }

        (offset, None)
    }

    /// A frame is partially buffered.
    pub fn is_mid_frame(&self) -> bool {
        self.state != DecoderState::ReadingHeader { collected: 0 }
    }

    /// Drop any partial frame (e.g. after the peer disconnects).
    pub fn reset(&mut self) {
        self.state = DecoderState::ReadingHeader { collected: 0 };
    }
}

/// Encode a payload into a length-prefixed frame.
///
/// Writes `[LE-u32 length][payload]` into `out_buf` and returns the total
/// number of bytes written, or `None` if the payload is empty, too large,
/// or does not fit.
pub fn encode_frame(payload: &[u8], out_buf: &mut [u8]) -> Option<usize> {
    let total = HEADER_SIZE + payload.len();
    if payload.is_empty() || payload.len() > MAX_FRAME_SIZE || total > out_buf.len() {
        return None;
    }

    let len_bytes = (payload.len() as u32).to_le_bytes();
    out_buf[..HEADER_SIZE].copy_from_slice(&len_bytes);
    out_buf[HEADER_SIZE..total].copy_from_slice(payload);

    Some(total)
}
