//! Client for the search server

use crate::server::protocol::{Response, FRAME_SIZE};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default connect/read/write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Nothing listening at the address
    #[error("could not connect to {0}")]
    NotRunning(String),

    /// Communication error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Query longer than one frame would be cut by the server
    #[error("query is {0} bytes, the limit is {limit}", limit = FRAME_SIZE)]
    QueryTooLong(usize),

    /// Reply was not one of the two protocol lines
    #[error("invalid response from server: {0:?}")]
    InvalidResponse(String),
}

/// One-shot client: each query opens its own connection
pub struct SearchClient {
    addr: SocketAddr,
    timeout: Duration,
}

impl SearchClient {
    /// Resolve `addr`; the connection itself is made per query
    pub fn new(addr: impl ToSocketAddrs, timeout: Duration) -> ClientResult<Self> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| ClientError::NotRunning("unresolvable address".to_string()))?;
        Ok(Self { addr, timeout })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send one query and read the reply line
    pub fn query(&self, query: &str) -> ClientResult<Response> {
        if query.len() > FRAME_SIZE {
            return Err(ClientError::QueryTooLong(query.len()));
        }

        let mut stream = TcpStream::connect_timeout(&self.addr, self.timeout)
            .map_err(|_| ClientError::NotRunning(self.addr.to_string()))?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        // The newline keeps the frame non-empty; the server trims it off
        let mut frame = Vec::with_capacity(query.len() + 1);
        frame.extend_from_slice(query.as_bytes());
        frame.push(b'\n');
        stream.write_all(&frame)?;
        // Half-close so a server waiting on more bytes sees the frame end
        let _ = stream.shutdown(Shutdown::Write);

        let mut reply = String::new();
        stream.read_to_string(&mut reply)?;

        Response::parse(&reply).ok_or(ClientError::InvalidResponse(reply))
    }
}
