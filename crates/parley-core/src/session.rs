//! Session state machine.
//!
//! This module defines the [`Session`] state machine, which sequences one chat
//! session between the operator and the peer, decoupled from the terminal
//! and the socket.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────────────────────┐  first frame  ┌───────────────┐
//! │ AwaitingFirstServerMessage │ ────────────> │ PromptPending │
//! └────────────────────────────┘               └───────────────┘
//!               │                                      │ blank line
//!               │                                      v
//!               │                              ┌───────────────┐
//!               │                              │  Interactive  │
//!               │                              └───────────────┘
//!               │     bye / EOF / failure              │
//!               └───────────────┬──────────────────────┘
//!                               v
//!                        ┌────────────┐
//!                        │ Terminated │
//!                        └────────────┘
//! ```
//!
//! `PromptPending` is transient: it is entered and left within the handling
//! of the first frame.
//!
//! # Ordering
//!
//! The operator is not given a prompt, and no operator line is sent, until
//! the peer has spoken first. The display name frame emitted by
//! [`Session::start`] is the only frame sent before that.

use std::net::SocketAddr;

use parley_proto::{DisplayName, Frame, ProtocolError, SHUTDOWN_SENTINEL};

use crate::{Notice, Output, SessionAction, SessionError, SessionEvent, Termination};

/// Run state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Name sent, nothing received yet. Input is not read.
    AwaitingFirstServerMessage,
    /// First message shown, prompt being prepared.
    PromptPending,
    /// Both the peer and the operator are watched.
    Interactive,
    /// Session over. Only a send failure is still handled.
    Terminated,
}

/// Chat session state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, so fully testable in simulation.
#[derive(Debug, Clone)]
pub struct Session {
    /// Operator display name, used for the first frame and the prompt.
    name: DisplayName,
    /// Peer address, for logging.
    peer: SocketAddr,
    /// Current run state.
    state: SessionState,
}

impl Session {
    /// Create a session for `name` talking to `peer`.
    pub fn new(name: DisplayName, peer: SocketAddr) -> Self {
        Self { name, peer, state: SessionState::AwaitingFirstServerMessage }
    }

    /// Actions that open the session: announce the display name.
    pub fn start(&mut self) -> Vec<SessionAction> {
        tracing::debug!(peer = %self.peer, name = %self.name, "session started");
        self.state = SessionState::AwaitingFirstServerMessage;
        vec![SessionAction::Send(self.name.to_frame())]
    }

    /// Current run state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Operator display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Peer address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Whether the operator's input should be read.
    pub fn accepts_input(&self) -> bool {
        matches!(self.state, SessionState::Interactive)
    }

    /// Whether the session has ended.
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, SessionState::Terminated)
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        if let SessionEvent::SendFailed { reason } = event {
            return self.terminate_with_error(Notice::SendFailed, SessionError::Transport(reason));
        }

        match self.state {
            SessionState::Terminated => {
                tracing::debug!(?event, "event after termination ignored");
                vec![]
            },
            SessionState::AwaitingFirstServerMessage => {
                if event.is_input() {
                    tracing::debug!(?event, "input before first server message ignored");
                    return vec![];
                }
                self.handle_connection_event(event)
            },
            SessionState::PromptPending | SessionState::Interactive => {
                if event.is_input() {
                    self.handle_input(event)
                } else {
                    self.handle_connection_event(event)
                }
            },
        }
    }

    fn handle_connection_event(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::FrameReceived(frame) if frame.is_shutdown() => {
                tracing::debug!("peer sent shutdown sentinel");
                self.terminate(Output::Notice(Notice::PeerShutdown), Termination::PeerShutdown)
            },
            SessionEvent::FrameReceived(frame) => {
                let mut actions = vec![SessionAction::Render(Output::Message(
                    frame.text().into_owned(),
                ))];
                if self.state == SessionState::AwaitingFirstServerMessage {
                    self.state = SessionState::PromptPending;
                    actions.push(SessionAction::Render(Output::Blank));
                    self.state = SessionState::Interactive;
                    tracing::debug!("first server message received, accepting input");
                }
                actions.push(self.prompt());
                actions
            },
            SessionEvent::PeerClosed => {
                tracing::warn!(peer = %self.peer, "peer closed the connection");
                self.terminate_with_error(Notice::ConnectionLost, SessionError::PeerClosed)
            },
            SessionEvent::ReceiveFailed { reason } => {
                tracing::warn!(%reason, "receive failed");
                self.terminate_with_error(Notice::ReceiveFailed, SessionError::Transport(reason))
            },
            SessionEvent::WaitFailed { reason } => {
                tracing::warn!(%reason, "readiness wait failed");
                self.terminate_with_error(Notice::Interrupted, SessionError::Multiplex(reason))
            },
            other => {
                tracing::debug!(event = ?other, "unexpected connection event");
                vec![]
            },
        }
    }

    fn handle_input(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Line(text) if text == SHUTDOWN_SENTINEL => {
                tracing::debug!("operator sent shutdown sentinel");
                let mut actions = vec![SessionAction::Send(Frame::shutdown())];
                actions.extend(
                    self.terminate(Output::Notice(Notice::Goodbye), Termination::LocalShutdown),
                );
                actions
            },
            SessionEvent::Line(text) if text.is_empty() => vec![self.prompt()],
            SessionEvent::Line(text) => match Frame::new(text) {
                Ok(frame) => vec![SessionAction::Send(frame), self.prompt()],
                Err(ProtocolError::EmbeddedTerminator { offset }) => {
                    tracing::debug!(offset, "input line contains a terminator byte");
                    self.notice_and_prompt(Notice::InvalidInput)
                },
                Err(err) => {
                    tracing::debug!(%err, "input line rejected");
                    self.notice_and_prompt(Notice::InputTooLong)
                },
            },
            SessionEvent::EmptyLine => vec![self.prompt()],
            SessionEvent::LineTooLong => {
                tracing::debug!(error = %SessionError::InputTooLong, "input line discarded");
                self.notice_and_prompt(Notice::InputTooLong)
            },
            SessionEvent::EndOfInput => {
                tracing::debug!("end of input");
                self.terminate(Output::Blank, Termination::EndOfInput)
            },
            SessionEvent::InputFailed { reason } => {
                tracing::warn!(%reason, "reading input failed");
                self.terminate_with_error(Notice::InputFailed, SessionError::InputFailed(reason))
            },
            other => {
                tracing::debug!(event = ?other, "unexpected input event");
                vec![]
            },
        }
    }

    fn prompt(&self) -> SessionAction {
        SessionAction::Render(Output::Prompt { name: self.name.clone() })
    }

    fn notice_and_prompt(&self, notice: Notice) -> Vec<SessionAction> {
        vec![SessionAction::Render(Output::Notice(notice)), self.prompt()]
    }

    fn terminate_with_error(&mut self, notice: Notice, error: SessionError) -> Vec<SessionAction> {
        self.terminate(Output::Notice(notice), Termination::Failed(error))
    }

    fn terminate(&mut self, output: Output, termination: Termination) -> Vec<SessionAction> {
        tracing::debug!(from = ?self.state, ?termination, "session terminated");
        self.state = SessionState::Terminated;
        vec![
            SessionAction::Render(output),
            SessionAction::Close,
            SessionAction::Terminate(termination),
        ]
    }
}
