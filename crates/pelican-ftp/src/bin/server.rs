// Pelican FTP Server Binary

use clap::Parser;
use pelican_ftp::config::{self, LogFormat, ServerConfig};
use pelican_ftp::{FtpServer, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pelican FTP Server
#[derive(Parser, Debug)]
#[command(name = "pelican-ftp-server")]
#[command(about = "Two-channel file-access server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "/etc/pelican/ftp.toml")]
    config: PathBuf,

    /// Write a default TOML configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Validate the configuration and exit (no socket bind)
    #[arg(long)]
    check_config: bool,

    /// Root directory to serve files from
    #[arg(long)]
    root_dir: Option<PathBuf>,

    /// Bind address for the control listener
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Data-channel connect timeout in seconds (0 disables the timeout)
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Per-session I/O timeout in seconds (0 disables the timeout)
    #[arg(long)]
    io_timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        config::write_default_config(&cli.config)?;
        println!("Wrote default configuration to {}", cli.config.display());
        return Ok(());
    }

    let mut cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        ServerConfig::default()
    };

    // CLI flags override file values.
    if let Some(root_dir) = cli.root_dir {
        cfg.root_dir = root_dir;
    }
    if let Some(bind) = cli.bind {
        cfg.bind_addr = bind;
    }
    if let Some(secs) = cli.connect_timeout_secs {
        cfg.connect_timeout_secs = (secs > 0).then_some(secs);
    }
    if let Some(secs) = cli.io_timeout_secs {
        cfg.io_timeout_secs = (secs > 0).then_some(secs);
    }
    if let Some(format) = cli.log_format {
        cfg.logging.format = format;
    }

    init_logging(&cfg);
    cfg.validate()?;

    if cli.check_config {
        info!("Configuration OK");
        return Ok(());
    }

    info!(
        "Serving {} on {}",
        cfg.root_dir.display(),
        cfg.bind_addr
    );
    FtpServer::new(cfg).run().await
}

fn init_logging(cfg: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.logging.level.clone()));

    match cfg.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}
