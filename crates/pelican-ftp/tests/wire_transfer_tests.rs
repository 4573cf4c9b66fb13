//! Reliable byte transfer tests
//!
//! Drives `send_all`/`recv_bounded` over in-memory duplex transports whose
//! tiny internal buffers force arbitrary short writes, checking that every
//! byte arrives exactly once and that peer loss is fatal.

use pelican_ftp::wire;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn test_send_all_delivers_every_byte_across_short_writes() {
    // A 16-byte pipe forces the 10 KB payload into many partial writes.
    let (mut tx, mut rx) = duplex(16);
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let expected = payload.clone();

    let reader = tokio::spawn(async move {
        let mut received = Vec::new();
        rx.read_to_end(&mut received).await.unwrap();
        received
    });

    wire::send_all(&mut tx, &payload).await.unwrap();
    drop(tx);

    let received = reader.await.unwrap();
    assert_eq!(received.len(), expected.len());
    assert_eq!(received, expected);
}

#[tokio::test]
async fn test_send_all_handles_empty_payload() {
    let (mut tx, mut rx) = duplex(16);
    wire::send_all(&mut tx, b"").await.unwrap();
    drop(tx);

    let mut received = Vec::new();
    rx.read_to_end(&mut received).await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_send_all_fails_when_peer_is_gone() {
    let (mut tx, rx) = duplex(16);
    drop(rx);

    let payload = vec![0u8; 4096];
    assert!(wire::send_all(&mut tx, &payload).await.is_err());
}

#[tokio::test]
async fn test_recv_bounded_caps_read_size() {
    let (mut tx, mut rx) = duplex(1024);
    tx.write_all(&[7u8; 300]).await.unwrap();
    tx.flush().await.unwrap();

    let received = wire::recv_bounded(&mut rx, 100).await.unwrap();
    assert!(!received.is_empty());
    assert!(received.len() <= 100);
    assert!(received.iter().all(|&b| b == 7));
}

#[tokio::test]
async fn test_recv_bounded_treats_eof_as_fatal() {
    let (tx, mut rx) = duplex(64);
    drop(tx);

    assert!(wire::recv_bounded(&mut rx, 100).await.is_err());
}
