//! Utility functions shared across the crate.
//!
//! ## Modules
//!
//! - [`app_data`] - Config directory lookup and `~` expansion
//! - [`lines`] - LF / CRLF / CR line normalization
//! - [`progress`] - Progress bars (no-op without the `progress` feature)
//!
//! ```no_run
//! use exactline::utils::lines;
//!
//! let found = lines(b"apple\r\nbanana\n").any(|line| line == b"apple");
//! assert!(found);
//! ```

pub mod app_data;
pub mod lines;
pub mod progress;

pub use app_data::*;
pub use lines::*;
