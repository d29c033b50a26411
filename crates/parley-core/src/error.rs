//! Session error taxonomy and termination outcomes.
//!
//! Recoverable kinds are handled inside the session (a notice and the loop
//! continues). Terminal kinds end the session through exactly one
//! [`Termination`].

use thiserror::Error;

/// Errors observed by the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operator entered a line over the length limit
    #[error("input line exceeds the message limit")]
    InputTooLong,

    /// A read was interrupted and will be retried
    #[error("transient interrupt")]
    TransientInterrupt,

    /// Reading the operator's input failed
    #[error("input failed: {0}")]
    InputFailed(String),

    /// Sending to or receiving from the peer failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer closed the connection without the shutdown sentinel
    #[error("peer closed the connection")]
    PeerClosed,

    /// Waiting on the connection and input failed
    #[error("readiness wait failed: {0}")]
    Multiplex(String),
}

impl SessionError {
    /// Returns true if the session continues after this error.
    ///
    /// Recoverable errors produce at most a notice. Every other kind
    /// terminates the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InputTooLong | Self::TransientInterrupt)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The operator sent the shutdown sentinel.
    LocalShutdown,
    /// The peer sent the shutdown sentinel.
    PeerShutdown,
    /// The operator's input reached end of input.
    EndOfInput,
    /// A terminal error.
    Failed(SessionError),
}

impl Termination {
    /// Process exit status for this outcome.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::LocalShutdown | Self::PeerShutdown | Self::EndOfInput => ExitStatus::Success,
            Self::Failed(_) => ExitStatus::Failure,
        }
    }

    /// The error that ended the session, if any.
    pub fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Process exit status derived from a [`Termination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Exit code 0.
    Success,
    /// Non-zero exit code.
    Failure,
}

impl ExitStatus {
    /// Returns true for [`ExitStatus::Success`].
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(SessionError::InputTooLong.is_recoverable());
        assert!(SessionError::TransientInterrupt.is_recoverable());
        assert!(!SessionError::PeerClosed.is_recoverable());
        assert!(!SessionError::InputFailed("broken pipe".into()).is_recoverable());
        assert!(!SessionError::Transport("reset".into()).is_recoverable());
        assert!(!SessionError::Multiplex("interrupted".into()).is_recoverable());
    }

    #[test]
    fn exit_status_follows_termination() {
        assert!(Termination::LocalShutdown.exit_status().is_success());
        assert!(Termination::PeerShutdown.exit_status().is_success());
        assert!(Termination::EndOfInput.exit_status().is_success());
        assert_eq!(
            Termination::Failed(SessionError::PeerClosed).exit_status(),
            ExitStatus::Failure
        );
    }
}
