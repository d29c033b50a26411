//! Session input events.
//!
//! Events originate from two distinct sources:
//! - The connection (frames, closure, receive and send failures).
//! - The operator's input stream (lines, overflow, end of input).
//!
//! Plus the readiness wait itself, which can fail when interrupted.

use parley_proto::Frame;

/// Events processed by the [`crate::Session`] state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A complete frame arrived from the peer.
    FrameReceived(Frame),

    /// The peer closed the connection (zero-byte read).
    PeerClosed,

    /// Reading from the connection failed.
    ReceiveFailed {
        /// Error description.
        reason: String,
    },

    /// Writing a frame to the connection failed.
    SendFailed {
        /// Error description.
        reason: String,
    },

    /// The operator entered a non-empty line.
    Line(String),

    /// The operator entered an empty line.
    EmptyLine,

    /// The operator entered a line over the length limit. The remainder of
    /// the line has already been discarded.
    LineTooLong,

    /// The operator's input stream reached end of input.
    EndOfInput,

    /// Reading the operator's input failed.
    InputFailed {
        /// Error description.
        reason: String,
    },

    /// The readiness wait was interrupted or failed.
    WaitFailed {
        /// Error description.
        reason: String,
    },
}

impl SessionEvent {
    /// Whether the event comes from the operator's input stream.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::Line(_)
                | Self::EmptyLine
                | Self::LineTooLong
                | Self::EndOfInput
                | Self::InputFailed { .. }
        )
    }
}
