//! Connection tests over real loopback TCP
//!
//! Exercises [`Connection`] against a plain `TcpListener` acting as the
//! peer, covering connect, the framed exchange in both directions, and the
//! ways a connection can end.

use std::time::Duration;

use parley_client::{ClientConfig, Connection, ReceiveOutcome, TransportError};
use parley_proto::{DisplayName, Frame};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

async fn listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

#[tokio::test]
async fn exchange_frames_with_peer() {
    let listener = listener().await;
    let addr = listener.local_addr().unwrap();

    let peer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut name = [0u8; 6];
        socket.read_exact(&mut name).await.unwrap();
        assert_eq!(&name, b"alice\0");

        socket.write_all(b"Welcome, alice\0how are\0").await.unwrap();
        socket.write_all(b" you?\0").await.unwrap();

        let mut reply = Vec::new();
        socket.read_to_end(&mut reply).await.unwrap();
        reply
    });

    let mut conn = Connection::connect(addr, &ClientConfig::default()).await.unwrap();
    assert_eq!(conn.peer(), addr);
    conn.send(&DisplayName::new("alice").unwrap().to_frame()).await.unwrap();

    let mut texts = Vec::new();
    while texts.len() < 2 {
        match conn.receive().await {
            ReceiveOutcome::Frame(frame) => texts.push(frame.text().into_owned()),
            ReceiveOutcome::Retry => {},
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(texts, vec!["Welcome, alice", "how are you?"]);

    conn.send(&Frame::new("fine").unwrap()).await.unwrap();
    conn.send(&Frame::shutdown()).await.unwrap();
    conn.close().await.unwrap();

    assert_eq!(peer.await.unwrap(), b"fine\0bye\0");
}

#[tokio::test]
async fn peer_disconnect_is_reported_as_closed() {
    let listener = listener().await;
    let addr = listener.local_addr().unwrap();

    let peer = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let mut conn = Connection::connect(addr, &ClientConfig::default()).await.unwrap();
    peer.await.unwrap();

    loop {
        match conn.receive().await {
            ReceiveOutcome::PeerClosed => break,
            ReceiveOutcome::Retry => {},
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let addr = {
        let listener = listener().await;
        listener.local_addr().unwrap()
    };

    let config = ClientConfig { connect_timeout: Duration::from_secs(5), ..ClientConfig::default() };
    let result = Connection::connect(addr, &config).await;

    assert!(matches!(result, Err(TransportError::Connect { addr: a, .. }) if a == addr));
}
