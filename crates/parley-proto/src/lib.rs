//! Parley wire protocol
//!
//! Every message on the wire is plain UTF-8 text followed by a single
//! terminator byte (`0x00`). There is no header and no length prefix: the
//! terminator is the only frame boundary.
//!
//! # Components
//!
//! - [`Frame`]: One validated text unit and its wire encoding
//! - [`FrameDecoder`]: Reassembles frames from an unbounded byte stream
//! - [`DisplayName`]: The operator name transmitted once after connecting
//! - [`ProtocolError`]: Structural validation failures
//!
//! # Sentinel
//!
//! The exact text [`SHUTDOWN_SENTINEL`] (`"bye"`) requests an orderly
//! shutdown in either direction. There is no escaping mechanism, so a chat
//! message consisting of exactly that text cannot be sent.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod decoder;
pub mod errors;
pub mod frame;
pub mod name;

pub use decoder::FrameDecoder;
pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use name::DisplayName;

/// Byte that terminates every frame on the wire.
pub const TERMINATOR: u8 = 0x00;

/// Maximum size of one frame on the wire, terminator included.
pub const MAX_FRAME_LEN: usize = 1024;

/// Maximum length of frame text in bytes (terminator excluded).
pub const MAX_TEXT_LEN: usize = MAX_FRAME_LEN - 1;

/// Maximum length of a display name in bytes.
pub const MAX_NAME_LEN: usize = 32;

/// Reserved text requesting an orderly shutdown of the session.
pub const SHUTDOWN_SENTINEL: &str = "bye";
