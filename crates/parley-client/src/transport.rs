//! Framed connection to the peer.
//!
//! Provides [`Connection`], which owns the byte stream, reassembles incoming
//! frames with a [`FrameDecoder`], and classifies what each read means for
//! the session. This is a thin layer: deciding what to do with a frame or a
//! closure stays in the Sans-IO `Session`.

use std::net::SocketAddr;

use parley_proto::{Frame, FrameDecoder, MAX_FRAME_LEN};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};

use crate::{ClientConfig, TransportError};

/// Result of one receive attempt.
#[derive(Debug)]
pub enum ReceiveOutcome {
    /// A complete frame.
    Frame(Frame),
    /// The peer closed its end of the stream.
    PeerClosed,
    /// The read was interrupted; nothing happened.
    Retry,
    /// The read failed or the peer sent an invalid frame.
    Failed(TransportError),
}

/// Frame transport over a byte stream.
///
/// # Invariants
///
/// - Closed at most once. After [`Connection::close`], `send` and `receive`
///   report [`TransportError::Closed`].
/// - `receive` is cancellation safe: bytes read before a cancelled call stay
///   in the decoder.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    /// `None` once closed.
    stream: Option<S>,
    decoder: FrameDecoder,
    scratch: Box<[u8]>,
    peer: SocketAddr,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to `addr`.
    pub async fn connect(addr: SocketAddr, config: &ClientConfig) -> Result<Self, TransportError> {
        tracing::debug!(%addr, timeout = ?config.connect_timeout, "connecting");

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::ConnectTimeout { addr, timeout: config.connect_timeout })?
            .map_err(|source| TransportError::Connect { addr, source })?;
        stream.set_nodelay(config.nodelay).map_err(|source| TransportError::Connect { addr, source })?;

        tracing::info!(%addr, "connected");
        Ok(Self::from_stream(stream, addr))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wrap an already connected stream.
    pub fn from_stream(stream: S, peer: SocketAddr) -> Self {
        Self {
            stream: Some(stream),
            decoder: FrameDecoder::new(),
            scratch: vec![0; MAX_FRAME_LEN].into_boxed_slice(),
            peer,
        }
    }

    /// Address of the peer.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Whether [`Self::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Write one frame and flush it.
    pub async fn send(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;

        stream.write_all(&frame.to_bytes()).await?;
        stream.flush().await?;

        tracing::debug!(peer = %self.peer, len = frame.encoded_len(), "frame sent");
        Ok(())
    }

    /// Wait for the next complete frame.
    pub async fn receive(&mut self) -> ReceiveOutcome {
        loop {
            match self.decoder.next_frame() {
                Ok(Some(frame)) => {
                    tracing::debug!(peer = %self.peer, len = frame.encoded_len(), "frame received");
                    return ReceiveOutcome::Frame(frame);
                },
                Ok(None) => {},
                Err(err) => return ReceiveOutcome::Failed(err.into()),
            }

            let Some(stream) = self.stream.as_mut() else {
                return ReceiveOutcome::Failed(TransportError::Closed);
            };

            match stream.read(&mut self.scratch).await {
                Ok(0) => {
                    if self.decoder.buffered() > 0 {
                        tracing::debug!(
                            buffered = self.decoder.buffered(),
                            "peer closed mid-frame, partial frame dropped"
                        );
                    }
                    return ReceiveOutcome::PeerClosed;
                },
                Ok(n) => self.decoder.push(&self.scratch[..n]),
                Err(err) => {
                    let err = TransportError::from(err);
                    if err.is_transient() {
                        return ReceiveOutcome::Retry;
                    }
                    return ReceiveOutcome::Failed(err);
                },
            }
        }
    }

    /// Shut the stream down. Later calls do nothing.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        self.decoder.clear();

        tracing::debug!(peer = %self.peer, "closing connection");
        stream.shutdown().await?;
        Ok(())
    }
}
