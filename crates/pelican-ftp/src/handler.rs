//! Per-request command processing.
//!
//! One call to [`handle_connection`] drives a single control connection
//! from raw request bytes to a terminal state: listing sent, file sent, or
//! an `ERROR:` line on the control connection. Protocol and resource
//! faults are reported to the peer; transport faults bubble up and end the
//! session.

use bytes::{BufMut, Bytes, BytesMut};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::net::TcpStream;
use tracing::{info, warn};

use pelican_core::{Command, Request, CONTINUE, MAX_REQUEST_BYTES, SENDING};

use crate::config::ServerConfig;
use crate::data_channel;
use crate::error::{FtpError, Result};
use crate::wire;

/// Reply for a request that names no recognized command. Wording matches
/// the client's flag syntax.
pub const INVALID_COMMAND_ERROR: &str =
    "ERROR: Invalid command. Try -l (list) or -g <FILENAME> (get)";

/// Serve one control connection end to end.
pub async fn handle_connection(mut control: TcpStream, config: &ServerConfig) -> Result<()> {
    let raw = wire::recv_bounded(&mut control, MAX_REQUEST_BYTES).await?;
    let request = match Request::decode(&raw) {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to decode request: {}", e);
            let reply = format!("ERROR: malformed request: {}", e);
            wire::send_all(&mut control, reply.as_bytes()).await?;
            return Ok(());
        }
    };
    info!(command = %request.command, "Decoded client request");

    match request.command {
        Command::Unknown => {
            info!("Invalid command issued from client; terminating session");
            wire::send_all(&mut control, INVALID_COMMAND_ERROR.as_bytes()).await
        }
        Command::List => {
            let data_port = required_port(&request)?;
            // The peer waits on the control connection for an okay or an
            // error before it will accept the data connection.
            wire::send_all(&mut control, CONTINUE.as_bytes()).await?;
            serve_listing(&mut control, data_port, config).await
        }
        Command::Get => {
            let data_port = required_port(&request)?;
            wire::send_all(&mut control, CONTINUE.as_bytes()).await?;
            serve_file(&mut control, data_port, request.filename.as_deref(), config).await
        }
    }
}

fn required_port(request: &Request) -> Result<u16> {
    // The codec guarantees a port for recognized commands; missing here
    // means a decoder bug, not peer input.
    request
        .data_port
        .ok_or_else(|| FtpError::Ftp("Decoded request carries no data port".to_string()))
}

async fn serve_listing(
    control: &mut TcpStream,
    data_port: u16,
    config: &ServerConfig,
) -> Result<()> {
    let listing = match build_listing(&config.root_dir).await {
        Ok(listing) => listing,
        Err(e) => {
            warn!("Could not read root directory: {}", e);
            let reply = format!("ERROR: could not read directory: {}", e);
            wire::send_all(control, reply.as_bytes()).await?;
            return Ok(());
        }
    };

    let mut data = data_channel::open(control, data_port, config.connect_timeout()).await?;
    wire::send_all(&mut data, &listing).await?;
    info!("Sent directory listing ({} bytes)", listing.len());
    Ok(())
}

async fn serve_file(
    control: &mut TcpStream,
    data_port: u16,
    filename: Option<&str>,
    config: &ServerConfig,
) -> Result<()> {
    let Some(filename) = filename else {
        return Err(FtpError::Ftp("GET request carries no filename".to_string()));
    };
    info!("Client requested file: {}", filename);

    let path = match resolve_path(&config.root_dir, filename) {
        Ok(path) => path,
        Err(e) => {
            warn!("Rejected filename {:?}: {}", filename, e);
            wire::send_all(control, b"ERROR: invalid filename.").await?;
            return Ok(());
        }
    };

    // The peer learns the file's fate on the control connection before any
    // data connection exists; an absent file opens no data channel at all.
    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => {
            let reply = format!("ERROR: {} not found.", filename);
            info!("{}", reply);
            wire::send_all(control, reply.as_bytes()).await?;
            return Ok(());
        }
    }

    wire::send_all(control, SENDING.as_bytes()).await?;
    let contents = fs::read(&path).await?;

    let mut data = data_channel::open(control, data_port, config.connect_timeout()).await?;
    wire::send_all(&mut data, &contents).await?;
    info!("Sent contents of {} ({} bytes)", filename, contents.len());
    Ok(())
}

/// Newline-terminated names of the root's visible entries, in directory
/// iteration order. Names starting with `.` are hidden and excluded.
pub async fn build_listing(root: &Path) -> Result<Bytes> {
    let mut entries = fs::read_dir(root).await?;
    let mut listing = BytesMut::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        listing.put_slice(name.as_bytes());
        listing.put_u8(b'\n');
    }
    Ok(listing.freeze())
}

/// Resolve a requested filename against the serving root, rejecting
/// traversal outside it.
fn resolve_path(root: &Path, filename: &str) -> Result<PathBuf> {
    let filename = filename.replace('\\', "/");
    if filename.contains("..") {
        return Err(FtpError::Ftp("Invalid filename".to_string()));
    }

    let path = root.join(filename.trim_start_matches('/'));

    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    if let Ok(canonical_path) = path.canonicalize() {
        if !canonical_path.starts_with(&canonical_root) {
            return Err(FtpError::Ftp("Access denied".to_string()));
        }
    }

    Ok(path)
}
