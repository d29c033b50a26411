//! Deterministic simulation harness for Parley.
//!
//! Scripted implementations of the [`parley_app::Transport`] and
//! [`parley_app::Console`] traits, plus a turmoil-friendly scripted peer, so
//! the production [`parley_app::Runtime`] can be driven through exact
//! interleavings of peer and operator activity.
//!
//! # Scripted I/O
//!
//! [`SimTransport`] replays receive outcomes and records sent frames.
//! [`SimConsole`] feeds raw input bytes through the real line reader and
//! records everything rendered. Both hand out cloneable handles so tests can
//! inspect them after the runtime has consumed the originals.
//!
//! # Network simulation
//!
//! [`ScriptedPeer`] plays the server side of a conversation over any byte
//! stream. [`sim_network`] hosts it, and the real client, on turmoil's
//! simulated TCP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod scripted_peer;
pub mod sim_console;
pub mod sim_network;
pub mod sim_transport;

pub use scripted_peer::{PeerStep, ScriptedPeer};
pub use sim_console::{ConsoleLog, SimConsole};
pub use sim_network::{SIM_PORT, connect_client, serve_once};
pub use sim_transport::{Scripted, SimTransport};
