use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("FTP error: {0}")]
    Ftp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] pelican_core::PelicanError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FtpError>;
