use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FtpError, Result};

/// Control port the server listens on when none is configured.
pub const DEFAULT_CONTROL_PORT: u16 = 7070;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory whose contents are served. Listings enumerate it and GET
    /// paths resolve against it; the process working directory is never
    /// consulted.
    pub root_dir: PathBuf,

    /// Bind address for the control listener.
    pub bind_addr: SocketAddr,

    /// Timeout in seconds for the outbound data-channel connect.
    /// `None` blocks until the transport gives up on its own.
    pub connect_timeout_secs: Option<u64>,

    /// Timeout in seconds for one whole request/response session.
    /// `None` lets an unresponsive peer hold its worker indefinitely;
    /// the accept loop is unaffected either way.
    pub io_timeout_secs: Option<u64>,

    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("/var/lib/pelican/files"),
            bind_addr: SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), DEFAULT_CONTROL_PORT),
            connect_timeout_secs: Some(10),
            io_timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(FtpError::Ftp(format!(
                "Root directory {} does not exist or is not a directory",
                self.root_dir.display()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text logging for human readability
    Text,
    /// JSON structured logging for log aggregators
    Json,
}

pub fn load_config(path: &std::path::Path) -> Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&contents)
        .map_err(|e| FtpError::Ftp(format!("Invalid config file {}: {}", path.display(), e)))?;
    Ok(config)
}

pub fn write_default_config(path: &std::path::Path) -> Result<()> {
    write_config(path, &ServerConfig::default())
}

pub fn write_config(path: &std::path::Path, config: &ServerConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| FtpError::Ftp(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
