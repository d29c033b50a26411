//! Parley terminal front-end
//!
//! Stdio implementation of the [`parley_app::Console`] trait, the display
//! name prompt, and the error type of the `parley` binary.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod console;
mod error;

pub use console::{PromptMode, StdConsole};
pub use error::{PromptError, TermError};
