//! Turmoil hosts for network simulation.
//!
//! [`serve_once`] runs a [`ScriptedPeer`] behind a simulated listener and
//! [`connect_client`] runs the production client stack ([`Connection`]
//! inside [`Runtime`]) against it over turmoil's simulated TCP. Both are
//! meant to be the bodies of `Sim::client` hosts.

use std::{
    future::pending,
    io,
    net::{Ipv4Addr, SocketAddr},
};

use parley_app::{Console, Runtime};
use parley_client::Connection;
use parley_core::{Session, Termination};
use parley_proto::DisplayName;
use turmoil::net::{TcpListener, TcpStream};

use crate::ScriptedPeer;

/// Port the simulated peer listens on.
pub const SIM_PORT: u16 = 17365;

/// Accept one connection on `port` and play `peer` over it.
///
/// Returns the text of every frame the peer received.
///
/// # Errors
///
/// Returns an error if binding or accepting fails, or if the client deviates
/// from the script.
pub async fn serve_once(peer: ScriptedPeer, port: u16) -> io::Result<Vec<String>> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))).await?;
    let (stream, addr) = listener.accept().await?;
    tracing::debug!(%addr, "simulated peer accepted client");

    peer.run(stream).await
}

/// Connect to `host` on `port` and run a session for `name` to completion.
///
/// The session is never interrupted; it ends through the peer or `console`.
///
/// # Errors
///
/// Returns an error if the simulated connection cannot be established.
pub async fn connect_client<C: Console>(
    host: &str,
    port: u16,
    name: DisplayName,
    console: C,
) -> io::Result<Termination> {
    let stream = TcpStream::connect((host, port)).await?;
    let peer = stream.peer_addr()?;
    tracing::debug!(%peer, "simulated client connected");

    let session = Session::new(name, peer);
    let conn = Connection::from_stream(stream, peer);
    Ok(Runtime::new(conn, console, session).run(pending()).await)
}
