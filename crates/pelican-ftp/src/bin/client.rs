// Pelican FTP Client Binary

use clap::Parser;
use pelican_ftp::client::expect_status;
use pelican_ftp::{wire, FtpError, Request, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

/// Pelican FTP Client
#[derive(Parser, Debug)]
#[command(name = "pelican-ftp-client")]
#[command(about = "Client for the two-channel file-access server", long_about = None)]
struct Cli {
    /// Server control address (e.g. 192.168.1.100:7070)
    #[arg(short, long)]
    server: String,

    /// Request a directory listing
    #[arg(short, long, conflicts_with = "get")]
    list: bool,

    /// Fetch the named file from the server
    #[arg(short, long)]
    get: Option<String>,

    /// Local TCP port to listen on for the data connection
    #[arg(short, long)]
    data_port: u16,

    /// Destination path for a fetched file (defaults to the remote name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite the destination file if it already exists
    #[arg(short, long)]
    force: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let request = if cli.list {
        Request::list(cli.data_port)
    } else if let Some(name) = &cli.get {
        Request::get(cli.data_port, name.clone())
    } else {
        return Err(FtpError::Ftp(
            "Must specify either --list or --get".to_string(),
        ));
    };

    // Listen on the data port before the server is told about it.
    let data_listener = TcpListener::bind(("0.0.0.0", cli.data_port)).await?;
    info!("Listening on data port {}", cli.data_port);

    let mut control = TcpStream::connect(&cli.server).await?;
    wire::send_all(&mut control, &request.encode()?).await?;
    info!("Connected to server on control port");

    // The server acknowledges a valid command before it connects back.
    expect_status(&mut control, "CONTINUE").await?;

    if cli.list {
        let (mut data, _) = data_listener.accept().await?;
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await?;
        println!("Directory contents:");
        print!("{}", String::from_utf8_lossy(&listing));
        return Ok(());
    }

    // GET: the file's fate arrives on the control connection before any
    // data connection is opened.
    let remote_name = cli.get.as_deref().unwrap_or_default();
    expect_status(&mut control, "SENDING").await?;

    let destination = cli
        .output
        .unwrap_or_else(|| PathBuf::from(remote_name));
    if destination.exists() && !cli.force {
        return Err(FtpError::Ftp(format!(
            "{} already exists; pass --force to overwrite",
            destination.display()
        )));
    }

    let (mut data, _) = data_listener.accept().await?;
    info!("Server connected on data port {}", cli.data_port);

    let mut contents = Vec::new();
    data.read_to_end(&mut contents).await?;
    tokio::fs::write(&destination, &contents).await?;
    info!(
        "Transfer complete: {} bytes written to {}",
        contents.len(),
        destination.display()
    );
    Ok(())
}
