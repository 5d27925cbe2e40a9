//! # exactline - exact-line membership search service
//!
//! Answers "does this exact string occur as a whole line in the corpus?"
//! over TCP (optionally TLS), one query per connection.
//!
//! ## Architecture
//!
//! - [`index`] - The production membership index, cached or reread per query
//! - [`strategy`] - Five interchangeable search algorithms for cross-checks and measurement
//! - [`server`] - Accept loop, per-connection handler, wire protocol, client
//! - [`config`] - Server settings
//! - [`bench`] - Strategy measurement harness
//! - [`output`] - Terminal rendering
//! - [`utils`] - Line normalization and friends
//!
//! ## Quick Start
//!
//! ```no_run
//! use exactline::index::{FreshnessPolicy, SearchIndex};
//! use std::path::Path;
//!
//! let index = SearchIndex::open(Path::new("200k.txt"), FreshnessPolicy::Cached).unwrap();
//! if index.exists(b"3;0;1;28;0;7;5;0;").unwrap() {
//!     println!("STRING EXISTS");
//! }
//! ```
//!
//! ## Line semantics
//!
//! A line ends at LF, CRLF or a bare CR; the terminator is never part of the
//! compared value. Everything else, including leading and trailing spaces,
//! is significant.

pub mod bench;
pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod server;
pub mod strategy;
pub mod utils;
