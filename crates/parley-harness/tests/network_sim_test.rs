//! Network simulation tests using turmoil.
//!
//! Runs the production client stack (`Connection` inside `Runtime`)
//! against a [`ScriptedPeer`] over turmoil's simulated TCP, so stream
//! behaviour such as coalesced and split frames is exercised end to end.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{Arc, Mutex};

use parley_core::{SessionError, Termination};
use parley_harness::{PeerStep, SIM_PORT, ScriptedPeer, SimConsole, connect_client, serve_once};
use parley_proto::DisplayName;

/// Outcome of one simulated conversation.
struct Conversation {
    termination: Termination,
    peer_received: Vec<String>,
    transcript: String,
}

/// Run `console` against `peer` in a fresh simulation.
fn converse(peer: ScriptedPeer, console: SimConsole) -> Conversation {
    let mut sim = turmoil::Builder::new().build();

    let peer_received = Arc::new(Mutex::new(Vec::new()));
    let termination = Arc::new(Mutex::new(None));
    let log = console.log();

    let received = Arc::clone(&peer_received);
    sim.client("server", async move {
        let frames = serve_once(peer, SIM_PORT).await?;
        *received.lock().unwrap() = frames;
        Ok(())
    });

    let slot = Arc::clone(&termination);
    sim.client("client", async move {
        let name = DisplayName::new("alice").unwrap();
        let outcome = connect_client("server", SIM_PORT, name, console).await?;
        *slot.lock().unwrap() = Some(outcome);
        Ok(())
    });

    sim.run().expect("simulation failed");

    let termination = termination.lock().unwrap().take().expect("client finished");
    let peer_received = std::mem::take(&mut *peer_received.lock().unwrap());
    Conversation { termination, peer_received, transcript: log.transcript() }
}

#[test]
fn hello_then_bye() {
    let peer = ScriptedPeer::new()
        .expect("alice")
        .send("Welcome, alice")
        .expect("hello")
        .expect("bye")
        .expect_closed();

    let result = converse(peer, SimConsole::new("hello\nbye\n"));

    assert_eq!(result.termination, Termination::LocalShutdown);
    assert_eq!(result.peer_received, vec!["alice", "hello", "bye"]);
    assert!(result.transcript.contains("\nWelcome, alice\n"));
    assert!(result.transcript.ends_with("Goodbye.\n"));
}

#[test]
fn peer_initiated_shutdown() {
    let peer = ScriptedPeer::new().expect("alice").send("hi").send("bye").expect_closed();

    let result = converse(peer, SimConsole::held_open(""));

    assert_eq!(result.termination, Termination::PeerShutdown);
    assert!(result.transcript.ends_with("\nServer initiated shutdown.\n"));
}

#[test]
fn peer_disconnect_without_bye() {
    let peer = ScriptedPeer::new().expect("alice").send("hi").close();

    let result = converse(peer, SimConsole::held_open(""));

    assert_eq!(result.termination, Termination::Failed(SessionError::PeerClosed));
    assert!(result.transcript.ends_with("\nConnection to server has been lost.\n"));
}

#[test]
fn end_of_input_closes_connection() {
    let peer = ScriptedPeer::new().expect("alice").send("hi").expect("one").expect_closed();

    let result = converse(peer, SimConsole::new("one\n"));

    assert_eq!(result.termination, Termination::EndOfInput);
    assert_eq!(result.peer_received, vec!["alice", "one"]);
}

#[test]
fn split_and_coalesced_frames_are_reassembled() {
    let peer = ScriptedPeer::new()
        .expect("alice")
        .step(PeerStep::SendRaw(b"Wel".to_vec()))
        .step(PeerStep::SendRaw(b"come\0second\0by".to_vec()))
        .step(PeerStep::SendRaw(b"e\0".to_vec()))
        .expect_closed();

    let result = converse(peer, SimConsole::held_open(""));

    assert_eq!(result.termination, Termination::PeerShutdown);
    assert!(result.transcript.starts_with("\nWelcome\n\n[alice]: \nsecond\n[alice]: "));
}

#[test]
fn oversized_peer_frame_is_a_receive_failure() {
    let peer = ScriptedPeer::new()
        .expect("alice")
        .step(PeerStep::SendRaw(vec![b'x'; 4096]));

    let result = converse(peer, SimConsole::held_open(""));

    assert!(matches!(result.termination, Termination::Failed(SessionError::Transport(_))));
}

#[test]
fn scripted_peer_fails_simulation_on_deviation() {
    let mut sim = turmoil::Builder::new().build();

    sim.client("server", async move {
        serve_once(ScriptedPeer::new().expect("bob"), SIM_PORT).await?;
        Ok(())
    });
    sim.client("client", async move {
        let name = DisplayName::new("alice").unwrap();
        connect_client("server", SIM_PORT, name, SimConsole::held_open("")).await?;
        Ok(())
    });

    assert!(sim.run().is_err());
}
