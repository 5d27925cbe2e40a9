//! Wire protocol between clients and the search server
//!
//! One request per connection:
//! - client sends up to [`FRAME_SIZE`] bytes, no length prefix or terminator
//! - server replies with exactly one line, `STRING EXISTS\n` or
//!   `STRING NOT FOUND\n`, and closes

use std::io::{self, Read};

/// Largest query frame read from a client
pub const FRAME_SIZE: usize = 1024;

/// Characters of the query kept in log lines
pub const LOG_QUERY_CHARS: usize = 50;

const EXISTS_LINE: &str = "STRING EXISTS\n";
const NOT_FOUND_LINE: &str = "STRING NOT FOUND\n";

/// Server reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Exists,
    NotFound,
}

impl Response {
    pub fn from_found(found: bool) -> Self {
        if found {
            Response::Exists
        } else {
            Response::NotFound
        }
    }

    /// The newline-terminated line written to the socket
    pub fn as_line(self) -> &'static str {
        match self {
            Response::Exists => EXISTS_LINE,
            Response::NotFound => NOT_FOUND_LINE,
        }
    }

    /// Short outcome label for logs
    pub fn label(self) -> &'static str {
        match self {
            Response::Exists => "EXISTS",
            Response::NotFound => "NOT_FOUND",
        }
    }

    /// Parse a reply line; surrounding whitespace is ignored
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "STRING EXISTS" => Some(Response::Exists),
            "STRING NOT FOUND" => Some(Response::NotFound),
            _ => None,
        }
    }
}

/// Read one frame of at most [`FRAME_SIZE`] bytes
///
/// Returns `None` when the peer closed without sending anything.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut buf = vec![0u8; FRAME_SIZE];
    let n = loop {
        match reader.read(&mut buf) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    };

    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some(buf))
}

/// Turn a raw frame into the query string
///
/// Trailing NUL padding is stripped, invalid UTF-8 sequences are dropped,
/// and surrounding whitespace is trimmed.
pub fn normalize_query(frame: &[u8]) -> String {
    let end = frame.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);

    let mut decoded = String::with_capacity(end);
    for chunk in frame[..end].utf8_chunks() {
        decoded.push_str(chunk.valid());
    }

    decoded.trim().to_string()
}

/// Query shortened for logging
pub fn truncate_for_log(query: &str) -> &str {
    match query.char_indices().nth(LOG_QUERY_CHARS) {
        Some((idx, _)) => &query[..idx],
        None => query,
    }
}
