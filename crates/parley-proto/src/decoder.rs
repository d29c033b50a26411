//! Stream reassembly for terminator-delimited frames.
//!
//! A stream transport delivers bytes, not messages: one read may carry half
//! a frame, or three frames and the start of a fourth. [`FrameDecoder`]
//! buffers what the transport delivers and yields complete frames in order.
//!
//! # Invariants
//!
//! - Bounded: the decoder never holds more than [`MAX_TEXT_LEN`] bytes of an
//!   unterminated frame. A longer run is a protocol violation.
//! - Ordered: frames are returned in the order their terminators arrived.

use bytes::{Buf, BytesMut};

use crate::{
    Frame, MAX_FRAME_LEN, MAX_TEXT_LEN, TERMINATOR,
    errors::{ProtocolError, Result},
};

/// Incremental decoder for a stream of frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: BytesMut::with_capacity(MAX_FRAME_LEN) }
    }

    /// Append bytes received from the transport.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete frame, if one is buffered.
    ///
    /// Returns `Ok(None)` when more bytes are needed.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooLong` if more than [`MAX_TEXT_LEN`] bytes
    ///   precede the next terminator (or are buffered without one)
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(end) = self.buffer.iter().position(|&b| b == TERMINATOR) else {
            if self.buffer.len() > MAX_TEXT_LEN {
                return Err(ProtocolError::FrameTooLong {
                    buffered: self.buffer.len(),
                    max: MAX_TEXT_LEN,
                });
            }
            return Ok(None);
        };

        if end > MAX_TEXT_LEN {
            return Err(ProtocolError::FrameTooLong { buffered: end, max: MAX_TEXT_LEN });
        }

        let text = self.buffer.split_to(end).freeze();
        self.buffer.advance(1);

        debug_assert!(!text.contains(&TERMINATOR));
        Frame::from_bytes(text).map(Some)
    }

    /// Bytes buffered but not yet returned as a frame.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Discard everything buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
