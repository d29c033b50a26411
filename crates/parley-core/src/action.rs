//! Session side-effects.
//!
//! This module defines [`SessionAction`], the instructions produced by the
//! [`crate::Session`] state machine for the runtime to execute, in order.

use parley_proto::Frame;

use crate::{Output, Termination};

/// Actions produced by the Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Write this frame to the connection.
    ///
    /// If the write fails the runtime reports
    /// [`crate::SessionEvent::SendFailed`] and discards the remaining
    /// actions of the batch.
    Send(Frame),

    /// Show something to the operator.
    Render(Output),

    /// Close the connection. Closing an already closed connection is a
    /// no-op.
    Close,

    /// Stop the event loop with this outcome.
    Terminate(Termination),
}
