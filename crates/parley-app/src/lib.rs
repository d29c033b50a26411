//! Application layer for Parley
//!
//! Generic event loop that drives a [`parley_core::Session`], enabling
//! deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`Transport`]: Frame I/O with the peer
//! - [`Console`]: Line input from and output to the operator
//! - [`Runtime`]: Readiness wait, event dispatch and teardown

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod runtime;

pub use driver::{Console, Transport};
pub use runtime::Runtime;
