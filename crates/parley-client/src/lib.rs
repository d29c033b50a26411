//! Client I/O
//!
//! The I/O halves of the chat client: bounded line reads from the operator,
//! the framed TCP connection to the peer, and resolution of the server
//! address from command-line arguments.
//!
//! Protocol decisions live in `parley-core`. This crate only moves bytes and
//! classifies what happened, so every read here is cancellation safe and
//! can be raced inside `tokio::select!`.
//!
//! # Components
//!
//! - [`LineReader`]: Newline-delimited reads with an overflow limit
//! - [`Connection`]: Frame send/receive over a byte stream
//! - [`ServerAddress`]: IPv4 address and port validation
//! - [`ClientConfig`]: Connection tuning knobs

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod error;
mod line_reader;
mod resolver;
mod transport;

pub use config::ClientConfig;
pub use error::{ResolveError, TransportError};
pub use line_reader::{LineOutcome, LineReader};
pub use resolver::{MIN_PORT, ServerAddress};
pub use transport::{Connection, ReceiveOutcome};
