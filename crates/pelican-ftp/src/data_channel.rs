//! Establishes the outbound data connection back to the requester.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{FtpError, Result};

/// Open the data connection for an established control connection.
///
/// The peer's IP (v4 or v6) comes from the control socket's own metadata;
/// the port is the callback port named in the decoded request. Any failure
/// here is fatal to the current session only.
pub async fn open(
    control: &TcpStream,
    data_port: u16,
    connect_timeout: Option<Duration>,
) -> Result<TcpStream> {
    let peer_ip = control
        .peer_addr()
        .map_err(|e| FtpError::Ftp(format!("Failed to resolve peer address: {}", e)))?
        .ip();
    let target = SocketAddr::new(peer_ip, data_port);
    debug!("Opening data channel to {}", target);

    let stream = match connect_timeout {
        Some(limit) => tokio::time::timeout(limit, TcpStream::connect(target))
            .await
            .map_err(|_| FtpError::Ftp(format!("Timed out connecting to {}", target)))??,
        None => TcpStream::connect(target).await?,
    };

    debug!("Data connection established on port {}", data_port);
    Ok(stream)
}
