//! Guaranteed-complete transfer over a byte-stream socket.
//!
//! A stream socket offers no message framing: a single write may accept
//! fewer bytes than requested, and a single read may return fewer than are
//! in flight. [`send_all`] loop-guards every multi-byte write and drains
//! the stream before returning, so a caller may close the socket
//! immediately afterwards without dropping buffered bytes. [`recv_bounded`]
//! performs exactly one bounded read; this protocol treats every received
//! chunk as one complete logical unit.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{FtpError, Result};

/// Largest slice handed to a single write call.
const MAX_WRITE_CHUNK: usize = 1000;

/// Send every byte of `payload`, looping over short writes.
///
/// A write error or a write of zero bytes means the peer is gone and is
/// fatal to the session. Returns only after the stream has been flushed.
pub async fn send_all<W>(stream: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sent = 0;
    while sent < payload.len() {
        let end = usize::min(sent + MAX_WRITE_CHUNK, payload.len());
        let written = stream.write(&payload[sent..end]).await?;
        if written == 0 {
            return Err(FtpError::Ftp(
                "Connection closed before payload was fully sent".to_string(),
            ));
        }
        sent += written;
    }
    // Hand-off to the transport is not delivery; drain buffered bytes
    // before the caller is allowed to close the socket.
    stream.flush().await?;
    Ok(())
}

/// Receive at most `max` bytes with a single read.
///
/// Zero bytes (peer closed) or a read error is fatal to the session, never
/// a retryable condition.
pub async fn recv_bounded<R>(stream: &mut R, max: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; max];
    let received = stream.read(&mut buffer).await?;
    if received == 0 {
        return Err(FtpError::Ftp(
            "Connection closed before any data arrived".to_string(),
        ));
    }
    buffer.truncate(received);
    Ok(buffer)
}
