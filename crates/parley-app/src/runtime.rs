//! Generic runtime for the chat event loop.
//!
//! The Runtime drives one session, coordinating between:
//! - [`Session`]: sequencing rules
//! - [`Transport`]: the peer
//! - [`Console`]: the operator
//!
//! # Readiness order
//!
//! Each iteration waits on all live sources with a biased `select!`: the
//! connection first, then the interrupt signal, then operator input (only
//! while the session accepts input). When several are ready at once the
//! connection always wins, so a peer's shutdown is seen before a queued
//! line is sent.

use std::{collections::VecDeque, future::Future, io};

use parley_client::{LineOutcome, ReceiveOutcome};
use parley_core::{Session, SessionAction, SessionEvent, Termination};

use crate::{Console, Transport};

/// Generic runtime that orchestrates a Session, a Transport and a Console.
///
/// # Type Parameters
///
/// - `T`: Connection to the peer
/// - `C`: Operator terminal
pub struct Runtime<T, C> {
    transport: T,
    console: C,
    session: Session,
    /// Set once the transport has been closed.
    closed: bool,
}

impl<T: Transport, C: Console> Runtime<T, C> {
    /// Create a runtime for `session` over the given I/O.
    pub fn new(transport: T, console: C, session: Session) -> Self {
        Self { transport, console, session, closed: false }
    }

    /// Run the session to completion.
    ///
    /// `interrupt` resolves when the operator asks to stop (for example
    /// `tokio::signal::ctrl_c()`); that ends the session as a failed wait.
    /// The transport is closed exactly once before this returns, whatever
    /// the outcome. The process is never exited from here.
    pub async fn run<I>(mut self, interrupt: I) -> Termination
    where
        I: Future<Output = io::Result<()>>,
    {
        let mut interrupt = std::pin::pin!(interrupt);
        let mut interrupted = false;

        let actions = self.session.start();
        if let Some(termination) = self.execute(actions).await {
            return termination;
        }

        loop {
            let accepts_input = self.session.accepts_input();

            let event = tokio::select! {
                biased;

                outcome = self.transport.receive() => match outcome {
                    ReceiveOutcome::Frame(frame) => SessionEvent::FrameReceived(frame),
                    ReceiveOutcome::PeerClosed => SessionEvent::PeerClosed,
                    ReceiveOutcome::Retry => continue,
                    ReceiveOutcome::Failed(err) => {
                        SessionEvent::ReceiveFailed { reason: err.to_string() }
                    },
                },

                result = &mut interrupt, if !interrupted => {
                    interrupted = true;
                    let reason = match result {
                        Ok(()) => "interrupted by signal".to_string(),
                        Err(err) => err.to_string(),
                    };
                    SessionEvent::WaitFailed { reason }
                },

                outcome = self.console.read_line(), if accepts_input => line_event(outcome),
            };

            let actions = self.session.handle(event);
            if let Some(termination) = self.execute(actions).await {
                return termination;
            }
        }
    }

    /// Execute session actions in order.
    ///
    /// A failed send is fed back to the session and its actions replace the
    /// rest of the batch. Returns the termination once one is reached.
    async fn execute(&mut self, actions: Vec<SessionAction>) -> Option<Termination> {
        let mut pending = VecDeque::from(actions);

        while let Some(action) = pending.pop_front() {
            match action {
                SessionAction::Send(frame) => {
                    if let Err(err) = self.transport.send(&frame).await {
                        tracing::warn!(%err, "send failed");
                        let event = SessionEvent::SendFailed { reason: err.to_string() };
                        pending = self.session.handle(event).into();
                    }
                },
                SessionAction::Render(output) => {
                    if let Err(err) = self.console.render(&output) {
                        tracing::warn!(%err, "failed to render output");
                    }
                },
                SessionAction::Close => self.close().await,
                SessionAction::Terminate(termination) => {
                    self.close().await;
                    tracing::debug!(?termination, "runtime finished");
                    return Some(termination);
                },
            }
        }

        None
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(err) = self.transport.close().await {
            tracing::debug!(%err, "error while closing connection");
        }
    }
}

fn line_event(outcome: LineOutcome) -> SessionEvent {
    match outcome {
        LineOutcome::Empty => SessionEvent::EmptyLine,
        LineOutcome::Line(text) => SessionEvent::Line(text),
        LineOutcome::TooLong => SessionEvent::LineTooLong,
        LineOutcome::EndOfInput => SessionEvent::EndOfInput,
        LineOutcome::Failed(err) => SessionEvent::InputFailed { reason: err.to_string() },
    }
}
