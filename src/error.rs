//! Error types for exactline.
//!
//! Startup failures ([`ConfigError`], [`IndexError::NotFound`]) are fatal.
//! [`ConnectionError`] stays inside the connection that raised it, and
//! [`StrategyError`] only reaches whoever invoked that strategy.

use std::io;
use std::path::PathBuf;

/// Failures building or querying a [`SearchIndex`](crate::index::SearchIndex).
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The corpus path does not name a regular file.
    #[error("corpus file not found: {0}")]
    NotFound(PathBuf),

    /// Reading the corpus failed.
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of a single search strategy run.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("corpus file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The capability this strategy delegates to is not available here.
    #[error("strategy not supported on this system: {0}")]
    Unsupported(String),

    /// The external line filter exited in a way that carries no answer.
    #[error("external filter failed: {0}")]
    External(String),
}

/// Invalid or incomplete settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// TLS is enabled but certificate or key material is missing.
    #[error("TLS enabled but {0} not found")]
    MissingTlsMaterial(PathBuf),

    #[error("TLS setup failed: {0}")]
    Tls(String),
}

/// Per-connection failures; logged and the connection dropped.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    #[error("peer closed the connection before sending a query")]
    EmptyRead,

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Result alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Result alias for strategy runs
pub type StrategyResult<T> = Result<T, StrategyError>;
