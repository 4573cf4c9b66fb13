//! Shared types for the Pelican file service.
//!
//! Holds the error type used across the workspace plus the request model
//! and its wire codec, so the server, the client binary, and tests all
//! agree on what travels over the control connection.

pub mod error;
pub mod types;

pub use error::{PelicanError, Result};
pub use types::{Command, Request, CONTINUE, MAX_REQUEST_BYTES, SENDING};
