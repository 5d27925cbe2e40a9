//! TCP search server
//!
//! One accept loop, one thread per accepted connection. Each connection
//! carries exactly one query: read a frame, classify it against the shared
//! [`SearchIndex`], write one response line, close.
//!
//! There is no connection cap and no worker pool; a slow or silent peer only
//! holds its own thread until the socket timeout fires.

use super::protocol::{normalize_query, read_frame, truncate_for_log, Response};
use super::transport::{Acceptor, Transport};
use crate::config::Settings;
use crate::error::ConnectionError;
use crate::index::SearchIndex;
use anyhow::{Context, Result};
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Counters for the server
#[derive(Debug, Default)]
pub struct ServerStats {
    pub connections_accepted: AtomicU64,
    pub queries_served: AtomicU64,
    pub matches: AtomicU64,
    pub connection_errors: AtomicU64,
}

impl ServerStats {
    fn record_query(&self, response: Response) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
        if response == Response::Exists {
            self.matches.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// State shared by every connection thread; read-only after startup
struct Shared {
    index: Arc<SearchIndex>,
    acceptor: Acceptor,
    io_timeout: Option<Duration>,
    stats: ServerStats,
    shutdown: AtomicBool,
}

/// The search server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    shared: Arc<Shared>,
}

/// Stops a running [`Server`] from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    shared: Arc<Shared>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Ask the accept loop to exit; in-flight connections finish on their own
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        // Wake the blocking accept() with a throwaway connection
        let _ = TcpStream::connect_timeout(&wake_address(self.addr), Duration::from_secs(1));
    }
}

impl Server {
    /// Bind the listener described by `settings`
    ///
    /// Port 0 picks a free port; see [`Server::local_addr`].
    pub fn bind(settings: &Settings, index: Arc<SearchIndex>) -> Result<Self> {
        let acceptor = Acceptor::from_settings(settings)?;
        Self::bind_with(&settings.bind_address(), index, acceptor, settings.io_timeout())
    }

    /// Bind with explicit parts
    pub fn bind_with(
        address: &str,
        index: Arc<SearchIndex>,
        acceptor: Acceptor,
        io_timeout: Option<Duration>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .with_context(|| format!("Failed to bind to {}", address))?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            shared: Arc::new(Shared {
                index,
                acceptor,
                io_timeout,
                stats: ServerStats::default(),
                shutdown: AtomicBool::new(false),
            }),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shared: Arc::clone(&self.shared),
            addr: self.local_addr,
        }
    }

    pub fn stats(&self) -> &ServerStats {
        &self.shared.stats
    }

    /// Run the accept loop until shut down (blocking)
    pub fn run(&self) -> Result<()> {
        let index = &self.shared.index;
        tracing::info!(
            address = %self.local_addr,
            corpus = %index.path().display(),
            policy = %index.policy(),
            tls = self.shared.acceptor.is_tls(),
            lines_loaded = ?index.cached_len(),
            "exactline: listening"
        );

        for stream in self.listener.incoming() {
            if self.shared.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => {
                    self.shared
                        .stats
                        .connections_accepted
                        .fetch_add(1, Ordering::Relaxed);

                    let shared = Arc::clone(&self.shared);
                    let spawned = thread::Builder::new()
                        .name("exactline-conn".to_string())
                        .spawn(move || shared.serve(stream));
                    if let Err(e) = spawned {
                        tracing::error!(error = %e, "failed to spawn connection thread");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept error");
                }
            }
        }

        let stats = &self.shared.stats;
        tracing::info!(
            connections = stats.connections_accepted.load(Ordering::Relaxed),
            queries = stats.queries_served.load(Ordering::Relaxed),
            matches = stats.matches.load(Ordering::Relaxed),
            errors = stats.connection_errors.load(Ordering::Relaxed),
            "exactline: shut down"
        );

        Ok(())
    }
}

impl Shared {
    /// Connection thread entry point; errors end here
    fn serve(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        match self.handle_connection(stream, &peer) {
            Ok(()) => {}
            Err(ConnectionError::EmptyRead) => {
                tracing::debug!(%peer, "connection closed without a query");
            }
            Err(e) => {
                self.stats.connection_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%peer, error = %e, "connection error");
            }
        }
    }

    /// Handle a single client connection
    fn handle_connection(&self, stream: TcpStream, peer: &str) -> Result<(), ConnectionError> {
        let start = Instant::now();

        stream.set_read_timeout(self.io_timeout)?;
        stream.set_write_timeout(self.io_timeout)?;
        let _ = stream.set_nodelay(true);

        let mut transport = self.acceptor.wrap(stream)?;

        let frame = read_frame(&mut transport)?.ok_or(ConnectionError::EmptyRead)?;
        let query = normalize_query(&frame);

        let response = Response::from_found(self.index.exists(query.as_bytes())?);
        self.stats.record_query(response);

        tracing::info!(
            %peer,
            query = truncate_for_log(&query),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            result = response.label(),
            "query"
        );

        transport.write_all(response.as_line().as_bytes())?;
        if let Err(e) = transport.close() {
            tracing::debug!(%peer, error = %e, "close after response failed");
        }

        Ok(())
    }
}

/// Address that reaches a listener bound to `addr`, even a wildcard one
fn wake_address(addr: SocketAddr) -> SocketAddr {
    let mut target = addr;
    if target.ip().is_unspecified() {
        match target {
            SocketAddr::V4(_) => target.set_ip([127, 0, 0, 1].into()),
            SocketAddr::V6(_) => target.set_ip(std::net::Ipv6Addr::LOCALHOST.into()),
        }
    }
    target
}

/// Open the corpus described by `settings` and run the server in the foreground
pub fn run_foreground(settings: &Settings) -> Result<()> {
    settings.validate()?;
    let corpus = settings
        .resolved_corpus_path()
        .context("corpus_path is not set")?;

    let index = SearchIndex::open(&corpus, settings.freshness_policy())?;
    let server = Server::bind(settings, Arc::new(index))?;
    server.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FreshnessPolicy;
    use std::io::{Read, Write as _};

    fn start(content: &[u8], policy: FreshnessPolicy) -> (tempfile::NamedTempFile, Server) {
        let mut corpus = tempfile::NamedTempFile::new().unwrap();
        corpus.write_all(content).unwrap();
        let index = SearchIndex::open(corpus.path(), policy).unwrap();
        let server = Server::bind_with(
            "127.0.0.1:0",
            Arc::new(index),
            Acceptor::plain(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        (corpus, server)
    }

    fn ask(addr: SocketAddr, payload: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(payload).unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();
        reply
    }

    #[test]
    fn test_single_query_roundtrip() {
        let (_corpus, server) = start(b"apple\nbanana\ncherry\n", FreshnessPolicy::Cached);
        let addr = server.local_addr();
        let handle = server.shutdown_handle();
        let runner = thread::spawn(move || server.run());

        assert_eq!(ask(addr, b"apple"), "STRING EXISTS\n");
        assert_eq!(ask(addr, b"app\n"), "STRING NOT FOUND\n");
        assert_eq!(ask(addr, b"  cherry\0\0"), "STRING EXISTS\n");

        handle.shutdown();
        runner.join().unwrap().unwrap();
    }

    #[test]
    fn test_empty_connection_gets_no_reply() {
        let (_corpus, server) = start(b"apple\n", FreshnessPolicy::Cached);
        let addr = server.local_addr();
        let handle = server.shutdown_handle();
        let stats_probe = Arc::clone(&server.shared);
        let runner = thread::spawn(move || server.run());

        let stream = TcpStream::connect(addr).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();
        let mut reply = Vec::new();
        (&stream).read_to_end(&mut reply).unwrap();
        assert!(reply.is_empty());

        // The listener keeps serving after a failed connection
        assert_eq!(ask(addr, b"apple"), "STRING EXISTS\n");

        handle.shutdown();
        runner.join().unwrap().unwrap();
        assert_eq!(stats_probe.stats.queries_served.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_wake_address() {
        let wildcard: SocketAddr = "0.0.0.0:4000".parse().unwrap();
        assert_eq!(wake_address(wildcard), "127.0.0.1:4000".parse().unwrap());

        let bound: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        assert_eq!(wake_address(bound), bound);
    }
}
