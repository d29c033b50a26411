//! Operator-facing output.
//!
//! Writing is the console's job; this module fixes the wording, the line
//! layout (via `Display`) and which stream a piece of output belongs on.

use std::fmt;

use parley_proto::{DisplayName, MAX_TEXT_LEN};

/// Something to show the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A message received from the peer, shown on its own line.
    Message(String),
    /// A one-line status or error notice.
    Notice(Notice),
    /// An empty line.
    Blank,
    /// The input prompt, decorated with the operator's name.
    Prompt {
        /// Operator display name.
        name: DisplayName,
    },
}

impl Output {
    /// Whether this output belongs on the error stream.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Notice(notice) if notice.is_error())
    }
}

/// Terminal rendering. Messages and notices that may land on a line holding
/// an unanswered prompt start on a fresh line.
impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(text) => write!(f, "\n{text}\n"),
            Self::Notice(notice) if notice.interrupts_prompt() => write!(f, "\n{}\n", notice.text()),
            Self::Notice(notice) => writeln!(f, "{}", notice.text()),
            Self::Blank => writeln!(f),
            Self::Prompt { name } => write!(f, "[{name}]: "),
        }
    }
}

/// Fixed notices shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The operator ended the session with the sentinel.
    Goodbye,
    /// The peer ended the session with the sentinel.
    PeerShutdown,
    /// The peer went away without the sentinel.
    ConnectionLost,
    /// An input line exceeded the message limit.
    InputTooLong,
    /// An input line contained a NUL byte.
    InvalidInput,
    /// Reading from the connection failed.
    ReceiveFailed,
    /// Sending to the connection failed.
    SendFailed,
    /// Reading the operator's input failed.
    InputFailed,
    /// The session was interrupted while waiting.
    Interrupted,
}

impl Notice {
    /// Text shown to the operator.
    pub fn text(self) -> String {
        match self {
            Self::Goodbye => "Goodbye.".to_string(),
            Self::PeerShutdown => "Server initiated shutdown.".to_string(),
            Self::ConnectionLost => "Connection to server has been lost.".to_string(),
            Self::InputTooLong => format!(
                "Sorry, limit your message to 1 line of at most {MAX_TEXT_LEN} characters."
            ),
            Self::InvalidInput => "Sorry, messages cannot contain NUL characters.".to_string(),
            Self::ReceiveFailed => "Warning: Failed to receive incoming message.".to_string(),
            Self::SendFailed => "Error: Failed to send message to server.".to_string(),
            Self::InputFailed => "Error: Failed to read input.".to_string(),
            Self::Interrupted => "Interrupted.".to_string(),
        }
    }

    /// Whether the notice arrives unprompted, while a prompt may be showing.
    pub fn interrupts_prompt(self) -> bool {
        matches!(self, Self::PeerShutdown | Self::ConnectionLost)
    }

    /// Whether the notice goes to the error stream.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Goodbye | Self::PeerShutdown | Self::ReceiveFailed)
    }
}
