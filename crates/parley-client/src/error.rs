//! Error types for client I/O.

use std::{io, net::SocketAddr, time::Duration};

use parley_proto::ProtocolError;
use thiserror::Error;

/// Errors from the connection to the peer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting to the peer failed.
    #[error("Failed to connect to server at {addr}. {source}")]
    Connect {
        /// Address we tried to reach.
        addr: SocketAddr,
        /// Underlying error.
        source: io::Error,
    },

    /// Connecting to the peer did not finish in time.
    #[error("Failed to connect to server at {addr}. Timed out after {timeout:?}.")]
    ConnectTimeout {
        /// Address we tried to reach.
        addr: SocketAddr,
        /// Configured timeout.
        timeout: Duration,
    },

    /// Reading or writing the stream failed.
    #[error("stream error: {0}")]
    Io(#[from] io::Error),

    /// The peer sent bytes that are not a valid frame.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The connection has already been closed.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    /// Returns true if the failed operation may succeed when retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Io(err) if matches!(err.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock)
        )
    }
}

/// Errors from resolving the server address arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Not an IPv4 address literal.
    #[error("Invalid IP address '{0}'.")]
    InvalidAddress(String),

    /// Not a decimal port number.
    #[error("Invalid port number '{0}'.")]
    InvalidPort(String),

    /// A port number outside the allowed range.
    #[error("Port must be in range [1024, 65535].")]
    PortOutOfRange(i64),
}
