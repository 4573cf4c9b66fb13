use serde::{Deserialize, Serialize};

use crate::error::{PelicanError, Result};

/// A control-connection request never exceeds this many bytes on the wire.
/// Clients pad shorter requests up to the cap, so a single bounded read
/// always yields one complete request.
pub const MAX_REQUEST_BYTES: usize = 100;

/// Control-connection acknowledgment for any recognized command.
pub const CONTINUE: &str = "CONTINUE";

/// Control-connection acknowledgment that a requested file exists and its
/// bytes will follow on the data connection.
pub const SENDING: &str = "SENDING";

// Wire markers. Fields are located by substring search anywhere in the
// request buffer, so filenames must not themselves contain these tokens.
const PORT_START: &str = "PORTSTART:";
const PORT_END: &str = "PORTEND";
const FILENAME_START: &str = "FILENAME:";
const FILENAME_END: &str = "FILENAMEEND";

// Requests are padded to the cap with '#' plus a trailing NUL.
const PAD_BYTE: u8 = b'#';

/// Command carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    List,
    Get,
    Unknown,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::List => write!(f, "LIST"),
            Command::Get => write!(f, "GET"),
            Command::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One decoded control-connection request.
///
/// Built once from the raw bytes received off the wire and immutable
/// afterwards. `data_port` is the TCP port on which the requester is
/// already listening for the data connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub filename: Option<String>,
    pub data_port: Option<u16>,
}

impl Request {
    pub fn list(data_port: u16) -> Self {
        Self {
            command: Command::List,
            filename: None,
            data_port: Some(data_port),
        }
    }

    pub fn get(data_port: u16, filename: impl Into<String>) -> Self {
        Self {
            command: Command::Get,
            filename: Some(filename.into()),
            data_port: Some(data_port),
        }
    }

    /// Decode a request from a received buffer.
    ///
    /// Fields are found by substring search, which tolerates the client's
    /// `#`/NUL padding and any surrounding content. Command priority:
    /// `LIST` beats `GET`; anything else is `UNKNOWN`. A recognized command
    /// with a missing or non-numeric port is a parse error; an unknown
    /// command decodes successfully regardless of the rest of the buffer.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(raw);

        if text.contains("LIST") {
            Ok(Self {
                command: Command::List,
                filename: None,
                data_port: Some(parse_port(&text)?),
            })
        } else if text.contains("GET") {
            let filename = extract_between(&text, FILENAME_START, FILENAME_END)
                .ok_or_else(|| {
                    PelicanError::Parse("GET request missing filename markers".to_string())
                })?;
            Ok(Self {
                command: Command::Get,
                filename: Some(filename.to_string()),
                data_port: Some(parse_port(&text)?),
            })
        } else {
            // An unknown command is answered on the control connection
            // alone, so a port is not required to decode it.
            Ok(Self {
                command: Command::Unknown,
                filename: None,
                data_port: extract_between(&text, PORT_START, PORT_END)
                    .and_then(|digits| digits.parse().ok()),
            })
        }
    }

    /// Encode this request into the fixed 100-byte wire form:
    /// `PORTSTART:<port>PORTENDCMD:<command>[FILENAME:<name>FILENAMEEND]`
    /// padded with `#` and terminated with a NUL.
    ///
    /// A request whose fields do not fit inside the cap cannot be sent at
    /// all: truncation would corrupt the trailing marker, so it is
    /// rejected here instead.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut text = String::new();
        if let Some(port) = self.data_port {
            text.push_str(PORT_START);
            text.push_str(&port.to_string());
            text.push_str(PORT_END);
        }
        text.push_str("CMD:");
        match self.command {
            Command::List => text.push_str("LIST"),
            Command::Get => {
                text.push_str("GET");
                text.push_str(FILENAME_START);
                if let Some(name) = &self.filename {
                    text.push_str(name);
                }
                text.push_str(FILENAME_END);
            }
            Command::Unknown => text.push_str("UNKNOWN"),
        }

        if text.len() > MAX_REQUEST_BYTES - 1 {
            return Err(PelicanError::Protocol(format!(
                "Encoded request is {} bytes; the wire format caps requests at {}",
                text.len(),
                MAX_REQUEST_BYTES
            )));
        }

        let mut raw = text.into_bytes();
        while raw.len() < MAX_REQUEST_BYTES - 1 {
            raw.push(PAD_BYTE);
        }
        raw.push(0);
        Ok(raw)
    }
}

fn parse_port(text: &str) -> Result<u16> {
    let digits = extract_between(text, PORT_START, PORT_END)
        .ok_or_else(|| PelicanError::Parse("request missing port markers".to_string()))?;
    digits
        .parse::<u16>()
        .map_err(|e| PelicanError::Parse(format!("Invalid data port {:?}: {}", digits, e)))
}

/// Text strictly between `start` and the next occurrence of `end`.
fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let to = text[from..].find(end)? + from;
    Some(&text[from..to])
}
