//! Text frame and its wire encoding.
//!
//! Layout on the wire: `[text: 0..=MAX_TEXT_LEN bytes] + [TERMINATOR]`.
//!
//! A `Frame` holds the raw text bytes, not a `String`. Peers are not
//! required to send valid UTF-8, and decoding must be exact so that
//! re-encoding a decoded frame reproduces the original bytes. Rendering goes
//! through [`Frame::text`], which replaces invalid sequences.

use std::{borrow::Cow, fmt};

use bytes::{BufMut, Bytes};

use crate::{
    MAX_TEXT_LEN, SHUTDOWN_SENTINEL, TERMINATOR,
    errors::{ProtocolError, Result},
};

/// One complete protocol message.
///
/// # Invariants
///
/// - No Terminator: `text` never contains [`TERMINATOR`]. Enforced by
///   [`Frame::new`] and [`Frame::decode`].
/// - Size Limit: `text.len()` never exceeds [`MAX_TEXT_LEN`], so an encoded
///   frame never exceeds [`crate::MAX_FRAME_LEN`].
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    text: Bytes,
}

impl Frame {
    /// Build a frame from outgoing text.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::TextTooLong` if `text` exceeds [`MAX_TEXT_LEN`]
    /// - `ProtocolError::EmbeddedTerminator` if `text` contains a NUL byte
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::from_bytes(Bytes::from(text.into()))
    }

    /// The shutdown sentinel frame.
    #[must_use]
    pub fn shutdown() -> Self {
        Self { text: Bytes::from_static(SHUTDOWN_SENTINEL.as_bytes()) }
    }

    /// Validate raw text bytes (terminator excluded).
    pub(crate) fn from_bytes(text: Bytes) -> Result<Self> {
        if text.len() > MAX_TEXT_LEN {
            return Err(ProtocolError::TextTooLong { size: text.len(), max: MAX_TEXT_LEN });
        }

        if let Some(offset) = text.iter().position(|&b| b == TERMINATOR) {
            return Err(ProtocolError::EmbeddedTerminator { offset });
        }

        Ok(Self { text })
    }

    /// Wrap text already known to satisfy the frame invariants.
    pub(crate) fn from_validated(text: Bytes) -> Self {
        debug_assert!(text.len() <= MAX_TEXT_LEN);
        debug_assert!(!text.contains(&TERMINATOR));
        Self { text }
    }

    /// Decode one frame from wire bytes.
    ///
    /// The trailing terminator is optional: transports that already split on
    /// it may pass the text alone. Exactly one trailing terminator is
    /// stripped; any other terminator byte is an error.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::EmbeddedTerminator` if a NUL byte precedes the end
    /// - `ProtocolError::TextTooLong` if the text exceeds [`MAX_TEXT_LEN`]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = match bytes.split_last() {
            Some((&TERMINATOR, text)) => text,
            _ => bytes,
        };

        Self::from_bytes(Bytes::copy_from_slice(text))
    }

    /// Encode the frame into `dst` (text followed by the terminator).
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.text);
        dst.put_u8(TERMINATOR);
    }

    /// Encode the frame into a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        Bytes::from(buf)
    }

    /// Size of the frame on the wire, terminator included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.text.len() + 1
    }

    /// Raw text bytes, terminator excluded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// Text for display. Invalid UTF-8 is replaced, never rejected.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// Whether this frame is the shutdown sentinel (exact, case-sensitive).
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.text.as_ref() == SHUTDOWN_SENTINEL.as_bytes()
    }

    /// Whether the frame carries no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frame").field(&self.text()).finish()
    }
}
