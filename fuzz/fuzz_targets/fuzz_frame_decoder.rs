//! Fuzz target: `AlertFrame::decode`
//!
//! Drives arbitrary byte sequences into the alert-frame decoder and
//! asserts that it never panics, fails only with the typed truncation
//! error below the 13-byte floor, and re-encodes decoded frames to the
//! exact wire bytes.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;

use cosentry::error::CodecError;
use cosentry::frame::{AlertFrame, FRAME_LEN};

fuzz_target!(|data: &[u8]| {
    match AlertFrame::decode(data) {
        Ok(frame) => {
            assert!(data.len() >= FRAME_LEN, "decode succeeded on a short buffer");
            // Decoding is a pure view of the first 13 bytes — re-encoding
            // must reproduce them bit for bit, trailing bytes ignored.
            assert_eq!(&frame.to_bytes()[..], &data[..FRAME_LEN]);
        }
        Err(CodecError::TruncatedFrame { len }) => {
            assert!(data.len() < FRAME_LEN, "typed error on a full-length buffer");
            assert_eq!(len, data.len());
        }
    }
});
