//! Scripted transport implementing the Transport trait.
//!
//! `SimTransport` stands in for the TCP connection. Receives replay a script
//! queued up front; once the script runs dry a receive never completes, like
//! a quiet peer. Sends are recorded and can be made to fail from a chosen
//! point on.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use parley_app::Transport;
use parley_client::{ReceiveOutcome, TransportError};
use parley_proto::Frame;

/// One scripted receive outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Deliver a frame with this text.
    Frame(String),
    /// The peer closed the connection.
    PeerClosed,
    /// An interrupted read.
    Retry,
    /// A read error with this message.
    Fail(String),
}

#[derive(Debug, Default)]
struct SharedState {
    incoming: VecDeque<Scripted>,
    sent: Vec<Frame>,
    /// Sends with this index or later fail.
    fail_sends_from: Option<usize>,
    send_attempts: usize,
    receive_calls: usize,
    close_calls: usize,
}

/// Scripted transport for deterministic runtime tests.
///
/// Clones share state, so keep a clone to inspect the transport after
/// handing the original to a runtime.
#[derive(Debug, Clone, Default)]
pub struct SimTransport {
    state: Arc<Mutex<SharedState>>,
}

impl SimTransport {
    /// Create a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that replays `script`.
    pub fn with_script(script: impl IntoIterator<Item = Scripted>) -> Self {
        let transport = Self::new();
        transport.lock().incoming.extend(script);
        transport
    }

    /// Make the send with index `index` (0 is the display name) and every
    /// later send fail.
    #[must_use]
    pub fn failing_sends_from(self, index: usize) -> Self {
        self.lock().fail_sends_from = Some(index);
        self
    }

    /// Queue another receive outcome.
    pub fn push(&self, outcome: Scripted) {
        self.lock().incoming.push_back(outcome);
    }

    /// Frames written successfully, in order.
    pub fn sent(&self) -> Vec<Frame> {
        self.lock().sent.clone()
    }

    /// Text of the frames written successfully, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.lock().sent.iter().map(|f| f.text().into_owned()).collect()
    }

    /// Number of times `close` was called.
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Number of times `receive` was called.
    pub fn receive_calls(&self) -> usize {
        self.lock().receive_calls
    }

    /// Scripted outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().incoming.len()
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for SimTransport {
    async fn send(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let mut state = self.lock();
        if state.close_calls > 0 {
            return Err(TransportError::Closed);
        }

        let index = state.send_attempts;
        state.send_attempts += 1;
        if state.fail_sends_from.is_some_and(|from| index >= from) {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe).into());
        }

        state.sent.push(frame.clone());
        Ok(())
    }

    async fn receive(&mut self) -> ReceiveOutcome {
        let next = {
            let mut state = self.lock();
            state.receive_calls += 1;
            if state.close_calls > 0 {
                return ReceiveOutcome::Failed(TransportError::Closed);
            }
            state.incoming.pop_front()
        };

        match next {
            Some(Scripted::Frame(text)) => match Frame::new(text) {
                Ok(frame) => ReceiveOutcome::Frame(frame),
                Err(err) => ReceiveOutcome::Failed(err.into()),
            },
            Some(Scripted::PeerClosed) => ReceiveOutcome::PeerClosed,
            Some(Scripted::Retry) => ReceiveOutcome::Retry,
            Some(Scripted::Fail(message)) => ReceiveOutcome::Failed(io::Error::other(message).into()),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.lock().close_calls += 1;
        Ok(())
    }
}
