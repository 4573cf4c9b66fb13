//! Connection supervisor: accepts control connections and isolates each
//! one in its own worker task.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::error::{FtpError, Result};
use crate::handler;

pub struct FtpServer {
    config: Arc<ServerConfig>,
}

impl FtpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Bind the configured control address and accept forever.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Accept control connections on an already-bound listener.
    ///
    /// Each accepted connection gets its own spawned worker; a worker that
    /// blocks, fails, or panics never stops the accept loop. There is no
    /// shutdown path: the loop runs until the process is terminated.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!(
            "Server ready for incoming connections on {}",
            listener.local_addr()?
        );

        let mut workers: JoinSet<()> = JoinSet::new();
        loop {
            // Reap finished workers without ever blocking the accept loop.
            while let Some(finished) = workers.try_join_next() {
                if let Err(e) = finished {
                    error!("Worker task failed: {}", e);
                }
            }

            match listener.accept().await {
                Ok((control, peer)) => {
                    info!("New control connection from {}", peer);
                    let config = self.config.clone();
                    workers.spawn(async move {
                        match serve_client(control, &config).await {
                            Ok(()) => {
                                info!("Request from {} fulfilled; end of connection", peer);
                            }
                            Err(e) => {
                                error!("Error serving client {}: {}", peer, e);
                            }
                        }
                    });
                    debug!("{} workers in flight", workers.len());
                }
                Err(e) => {
                    // One failed accept must not take the listener down.
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

async fn serve_client(control: tokio::net::TcpStream, config: &ServerConfig) -> Result<()> {
    match config.io_timeout() {
        Some(limit) => tokio::time::timeout(limit, handler::handle_connection(control, config))
            .await
            .map_err(|_| FtpError::Ftp("Session timed out".to_string()))?,
        None => handler::handle_connection(control, config).await,
    }
}
