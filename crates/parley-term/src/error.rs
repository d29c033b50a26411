//! Error types for the terminal front-end.

use std::io;

use parley_client::{ResolveError, TransportError};
use thiserror::Error;

/// Display name prompt errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input ended before a valid name was entered.
    #[error("no username entered before end of input")]
    EndOfInput,

    /// Reading the name failed.
    #[error("failed to read username: {0}")]
    Read(io::Error),

    /// Writing the prompt failed.
    #[error("failed to write prompt: {0}")]
    Write(#[from] io::Error),
}

/// Startup errors of the `parley` binary.
#[derive(Debug, Error)]
pub enum TermError {
    /// Bad command-line address or port.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// No usable display name.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Connecting to the server failed.
    #[error(transparent)]
    Connect(#[from] TransportError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(io::Error),
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    #[test]
    fn connect_failure_is_described_once() {
        let addr: SocketAddr = "127.0.0.1:17365".parse().unwrap();
        let source = io::Error::from(io::ErrorKind::ConnectionRefused);
        let err = TermError::from(TransportError::Connect { addr, source });

        let message = err.to_string();
        assert!(message.starts_with("Failed to connect to server at 127.0.0.1:17365. "));
        assert_eq!(message.matches("Failed to connect").count(), 1, "{message}");
    }
}
