//! Network search server
//!
//! Architecture:
//! - [`daemon`]: accept loop plus one thread per connection
//! - [`transport`]: plain TCP or TLS-wrapped streams
//! - [`protocol`]: one bounded query frame in, one response line out
//! - [`client`]: one-shot client used by `exactline query`

mod client;
pub mod daemon;
pub mod protocol;
#[cfg(feature = "tls")]
pub mod tls;
pub mod transport;

pub use client::{ClientError, ClientResult, SearchClient, DEFAULT_TIMEOUT};
pub use daemon::{Server, ServerStats, ShutdownHandle};
pub use protocol::Response;
pub use transport::Acceptor;
