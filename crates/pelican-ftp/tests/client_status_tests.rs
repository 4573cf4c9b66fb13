//! Client status-handling tests
//!
//! The control channel carries unframed status text; these tests check
//! that the client helper reads exact statuses, survives coalesced
//! segments, and folds a server error line into the returned error.

use pelican_ftp::client::expect_status;
use tokio::io::{duplex, AsyncWriteExt};

#[tokio::test]
async fn test_expect_status_accepts_matching_status() {
    let (mut tx, mut rx) = duplex(64);
    tx.write_all(b"CONTINUE").await.unwrap();
    drop(tx);

    expect_status(&mut rx, "CONTINUE").await.unwrap();
}

#[tokio::test]
async fn test_expect_status_handles_coalesced_statuses() {
    // CONTINUE and SENDING are separate sends on the server side but can
    // arrive in one TCP segment.
    let (mut tx, mut rx) = duplex(64);
    tx.write_all(b"CONTINUESENDING").await.unwrap();
    drop(tx);

    expect_status(&mut rx, "CONTINUE").await.unwrap();
    expect_status(&mut rx, "SENDING").await.unwrap();
}

#[tokio::test]
async fn test_expect_status_folds_error_line_into_error() {
    let (mut tx, mut rx) = duplex(64);
    tx.write_all(b"ERROR: missing.txt not found.").await.unwrap();
    drop(tx);

    let err = expect_status(&mut rx, "SENDING").await.unwrap_err();
    assert!(
        err.to_string().contains("ERROR: missing.txt not found."),
        "unexpected error: {}",
        err
    );
}

#[tokio::test]
async fn test_expect_status_fails_on_truncated_stream() {
    let (mut tx, mut rx) = duplex(64);
    tx.write_all(b"CONT").await.unwrap();
    drop(tx);

    assert!(expect_status(&mut rx, "CONTINUE").await.is_err());
}
