//! Scripted chat peer.
//!
//! Plays the server side of one conversation from a fixed list of steps.
//! The peer works on any byte stream, so it runs over turmoil streams,
//! loopback TCP, or in-memory duplex pipes alike.

use std::io;

use parley_proto::{Frame, FrameDecoder, MAX_FRAME_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One step of a peer script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerStep {
    /// Wait for a frame and require this exact text.
    Expect(String),
    /// Wait for a frame with any text.
    ExpectAny,
    /// Send a frame with this text.
    Send(String),
    /// Write raw bytes, bypassing framing.
    SendRaw(Vec<u8>),
    /// Wait until the client closes the connection.
    ExpectClosed,
    /// Close the connection.
    Close,
}

/// Server side of a scripted conversation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPeer {
    steps: Vec<PeerStep>,
}

impl ScriptedPeer {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: PeerStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append [`PeerStep::Expect`].
    #[must_use]
    pub fn expect(self, text: impl Into<String>) -> Self {
        self.step(PeerStep::Expect(text.into()))
    }

    /// Append [`PeerStep::Send`].
    #[must_use]
    pub fn send(self, text: impl Into<String>) -> Self {
        self.step(PeerStep::Send(text.into()))
    }

    /// Append [`PeerStep::ExpectClosed`].
    #[must_use]
    pub fn expect_closed(self) -> Self {
        self.step(PeerStep::ExpectClosed)
    }

    /// Append [`PeerStep::Close`].
    #[must_use]
    pub fn close(self) -> Self {
        self.step(PeerStep::Close)
    }

    /// Run the script over `stream`. Returns the text of every frame
    /// received.
    ///
    /// # Errors
    ///
    /// Returns an error when the client deviates from the script or the
    /// stream fails.
    pub async fn run<S>(self, stream: S) -> io::Result<Vec<String>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut wire = PeerWire { stream: Some(stream), decoder: FrameDecoder::new() };
        let mut received = Vec::new();

        for step in self.steps {
            tracing::debug!(?step, "peer step");
            match step {
                PeerStep::Expect(expected) => {
                    let text = wire.next_frame().await?.ok_or_else(client_closed)?;
                    if text != expected {
                        return Err(io::Error::other(format!(
                            "expected frame {expected:?}, got {text:?}"
                        )));
                    }
                    received.push(text);
                },
                PeerStep::ExpectAny => {
                    received.push(wire.next_frame().await?.ok_or_else(client_closed)?);
                },
                PeerStep::Send(text) => {
                    let frame = Frame::new(text).map_err(io::Error::other)?;
                    wire.write(&frame.to_bytes()).await?;
                },
                PeerStep::SendRaw(bytes) => wire.write(&bytes).await?,
                PeerStep::ExpectClosed => {
                    if let Some(text) = wire.next_frame().await? {
                        return Err(io::Error::other(format!("expected close, got frame {text:?}")));
                    }
                },
                PeerStep::Close => wire.close().await?,
            }
        }

        Ok(received)
    }
}

/// Peer end of the stream.
struct PeerWire<S> {
    /// `None` once closed.
    stream: Option<S>,
    decoder: FrameDecoder,
}

impl<S: AsyncRead + AsyncWrite + Unpin> PeerWire<S> {
    /// Next frame text, or `None` if the client closed the stream.
    async fn next_frame(&mut self) -> io::Result<Option<String>> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        loop {
            if let Some(frame) = self.decoder.next_frame().map_err(io::Error::other)? {
                return Ok(Some(frame.text().into_owned()));
            }
            let stream = self.stream.as_mut().ok_or_else(peer_closed)?;
            match stream.read(&mut buf).await {
                Ok(0) => return Ok(None),
                Ok(n) => self.decoder.push(&buf[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
                Err(err) => return Err(err),
            }
        }
    }

    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(peer_closed)?;
        stream.write_all(bytes).await?;
        stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        match self.stream.take() {
            Some(mut stream) => stream.shutdown().await,
            None => Ok(()),
        }
    }
}

fn client_closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "client closed the connection")
}

fn peer_closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "peer already closed the connection")
}
