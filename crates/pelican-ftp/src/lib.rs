//! # Pelican FTP
//!
//! A minimal two-channel file-access service. A client sends one request
//! over a control connection; the server connects back to the client on a
//! client-chosen data port and streams either a directory listing or a
//! file's contents over that second connection.
//!
//! ## Features
//!
//! - Async/await with Tokio, one isolated worker task per connection
//! - Compact marker-based request format (100-byte requests)
//! - Separate control channel for status/error text (`CONTINUE`,
//!   `SENDING`, `ERROR: ...`)
//! - Explicit serving root and configurable timeouts via TOML config

pub mod client;
pub mod config;
pub mod data_channel;
pub mod error;
pub mod handler;
pub mod server;
pub mod wire;

pub use config::{LogFormat, LoggingConfig, ServerConfig};
pub use error::{FtpError, Result};
pub use pelican_core::{Command, Request, CONTINUE, MAX_REQUEST_BYTES, SENDING};
pub use server::FtpServer;
