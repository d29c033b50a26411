//! Traits for abstracting I/O operations.
//!
//! [`Transport`] and [`Console`] decouple the [`crate::Runtime`] from the
//! socket and the terminal. The binary implements them over TCP and stdio,
//! the simulation harness over scripted queues, and the runtime cannot tell
//! the difference.
//!
//! Every future returned here may be dropped before completion when another
//! readiness source wins the wait. Implementations must keep partial
//! progress in `self`, never in the future.

use std::future::Future;

use parley_client::{Connection, LineOutcome, ReceiveOutcome, TransportError};
use parley_core::Output;
use parley_proto::Frame;
use tokio::io::{AsyncRead, AsyncWrite};

/// Frame I/O with the peer.
///
/// # Implementations
///
/// - **Production**: [`Connection`] over a TCP stream
/// - **Simulation**: scripted outcomes, or a `Connection` over turmoil
pub trait Transport {
    /// Write one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the write fails.
    fn send(&mut self, frame: &Frame) -> impl Future<Output = Result<(), TransportError>>;

    /// Wait for the next frame or connection event. Cancellation safe.
    fn receive(&mut self) -> impl Future<Output = ReceiveOutcome>;

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if shutting the stream down fails. The connection is
    /// unusable afterwards either way.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>>;
}

/// Line input from and output to the operator.
pub trait Console {
    /// Platform-specific render error.
    type Error: std::error::Error + 'static;

    /// Wait for the next input line. Cancellation safe.
    fn read_line(&mut self) -> impl Future<Output = LineOutcome>;

    /// Show output to the operator.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn render(&mut self, output: &Output) -> Result<(), Self::Error>;
}

impl<S: AsyncRead + AsyncWrite + Unpin> Transport for Connection<S> {
    async fn send(&mut self, frame: &Frame) -> Result<(), TransportError> {
        Connection::send(self, frame).await
    }

    async fn receive(&mut self) -> ReceiveOutcome {
        Connection::receive(self).await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Connection::close(self).await
    }
}
