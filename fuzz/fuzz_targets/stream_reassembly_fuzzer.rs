//! Fuzz target for stream reassembly
//!
//! Feeds an arbitrary byte stream to [`FrameDecoder`] under two different
//! chunkings and compares the results.
//!
//! # Invariants
//!
//! - Decoding MUST NOT depend on how the transport split the stream
//! - Every decoded frame holds at most `MAX_TEXT_LEN` bytes and no terminator
//! - The decoder never buffers more than one read past `MAX_TEXT_LEN` bytes
//! - Errors are structured (never panic)

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_proto::{FrameDecoder, MAX_FRAME_LEN, MAX_TEXT_LEN, TERMINATOR};

#[derive(Debug, Arbitrary)]
struct Stream {
    bytes: Vec<u8>,
    cuts: Vec<u16>,
}

/// Decoded frames, or the position of the first error.
fn decode(bytes: &[u8], cuts: &[u16]) -> (Vec<Vec<u8>>, bool) {
    let mut decoder = FrameDecoder::new();
    let mut frames = Vec::new();
    let mut rest = bytes;
    let mut cuts = cuts.iter();

    while !rest.is_empty() {
        let at = cuts.next().map_or(rest.len(), |&c| (c as usize % MAX_FRAME_LEN).max(1));
        let (chunk, tail) = rest.split_at(at.min(rest.len()));
        rest = tail;
        decoder.push(chunk);

        loop {
            match decoder.next_frame() {
                Ok(Some(frame)) => {
                    assert!(frame.as_bytes().len() <= MAX_TEXT_LEN);
                    assert!(!frame.as_bytes().contains(&TERMINATOR));
                    frames.push(frame.as_bytes().to_vec());
                },
                Ok(None) => break,
                Err(_) => return (frames, true),
            }
        }
        assert!(decoder.buffered() <= MAX_TEXT_LEN);
    }

    (frames, false)
}

fuzz_target!(|stream: Stream| {
    let (whole, whole_failed) = decode(&stream.bytes, &[]);
    let (chunked, chunked_failed) = decode(&stream.bytes, &stream.cuts);

    assert_eq!(whole_failed, chunked_failed);
    if !whole_failed {
        assert_eq!(whole, chunked);
    }
});
