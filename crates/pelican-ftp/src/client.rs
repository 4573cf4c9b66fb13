//! Client-side control-channel helpers.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{FtpError, Result};

/// Read the next control-channel status and require it to be `expected`.
///
/// Statuses carry no framing, so exactly `expected.len()` bytes are read;
/// back-to-back statuses (`CONTINUE` then `SENDING`) coalesced into one
/// TCP segment are handled by construction. On mismatch the rest of the
/// stream (the server closes it after an error) is folded into the
/// returned error message.
pub async fn expect_status<R>(control: &mut R, expected: &str) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut status = vec![0u8; expected.len()];
    control.read_exact(&mut status).await?;
    if status == expected.as_bytes() {
        return Ok(());
    }

    let mut rest = Vec::new();
    control.read_to_end(&mut rest).await?;
    status.extend_from_slice(&rest);
    Err(FtpError::Ftp(format!(
        "Message from server: {}",
        String::from_utf8_lossy(&status)
    )))
}
