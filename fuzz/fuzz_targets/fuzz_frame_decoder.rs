//! Fuzz target: `FrameDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming frame decoder,
//! consuming the input the way the config receiver does, and asserts that
//! it never panics, always makes progress, and never yields an empty or
//! oversized payload.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensor_node::link::codec::{Decoded, FrameDecoder, MAX_FRAME_SIZE};

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();
    let mut offset = 0;

    while offset < data.len() {
        let (used, out) = decoder.feed(&data[offset..]);
        assert!(used > 0, "feed must consume input");
        assert!(offset + used <= data.len());
        if let Some(Decoded::Frame(payload)) = out {
            assert!(!payload.is_empty(), "decoder must not yield empty payload");
            assert!(payload.len() <= MAX_FRAME_SIZE, "payload exceeds MAX_FRAME_SIZE");
        }
        offset += used;
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    let _ = decoder.feed(data);
});
