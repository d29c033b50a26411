//! Protocol error types.
//!
//! Structural failures only: the codec never inspects what text means beyond
//! the shutdown sentinel.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while building, encoding or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame text exceeds the protocol maximum.
    #[error("frame text too long: {size} bytes (max {max})")]
    TextTooLong {
        /// Length of the rejected text
        size: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Frame text contains the terminator byte.
    #[error("frame text contains a terminator byte at offset {offset}")]
    EmbeddedTerminator {
        /// Offset of the first terminator inside the text
        offset: usize,
    },

    /// Stream carried more bytes than one frame may hold without a
    /// terminator.
    #[error("no frame terminator within {max} bytes ({buffered} buffered)")]
    FrameTooLong {
        /// Bytes buffered without a terminator
        buffered: usize,
        /// Maximum text length
        max: usize,
    },

    /// Display name is empty.
    #[error("display name is empty")]
    EmptyName,

    /// Display name exceeds the protocol maximum.
    #[error("display name too long: {size} bytes (max {max})")]
    NameTooLong {
        /// Length of the rejected name
        size: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Display name contains a control character.
    #[error("display name contains control character {0:?}")]
    InvalidNameCharacter(char),
}
