//! Core
//!
//! Pure state machine for one chat session. Decides what happens when the
//! peer speaks, when the operator types, and when either side goes away,
//! without performing any I/O itself.
//!
//! # Architecture
//!
//! The [`Session`] receives [`SessionEvent`]s, updates its state, and returns
//! [`SessionAction`]s for the caller to execute in order. Process exit is
//! never performed here: terminal conditions surface as a
//! [`SessionAction::Terminate`] carrying a typed [`Termination`], and only
//! the runtime that owns the connection tears it down.
//!
//! # Components
//!
//! - [`Session`]: Lifecycle and sequencing rules
//! - [`SessionEvent`]: Inputs from the connection and the operator
//! - [`SessionAction`]: Instructions for the runtime
//! - [`Output`] / [`Notice`]: What the operator sees
//! - [`SessionError`] / [`Termination`]: Why a session ended

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod error;
mod event;
mod output;
mod session;

pub use action::SessionAction;
pub use error::{ExitStatus, SessionError, Termination};
pub use event::SessionEvent;
pub use output::{Notice, Output};
pub use session::{Session, SessionState};
