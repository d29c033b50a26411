//! Fuzz target for Frame::decode
//!
//! Decodes arbitrary byte sequences as a single frame to find:
//! - Parser crashes or panics
//! - Embedded terminators that slip through validation
//! - Oversized text that is accepted instead of rejected
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::{Frame, MAX_TEXT_LEN, TERMINATOR};

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        assert!(frame.as_bytes().len() <= MAX_TEXT_LEN);
        assert!(!frame.as_bytes().contains(&TERMINATOR));
        assert_eq!(frame.encoded_len(), frame.as_bytes().len() + 1);
    }
});
