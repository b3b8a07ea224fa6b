//! http_env - HTTP request/response value objects over a CGI-style
//! server environment.
//!
//! This crate wraps a platform's ambient request metadata (method, host,
//! port, query string, auth credentials) into an immutable [`Request`]
//! value, and wraps response production into an ordered header-resolution
//! pipeline plus a small wire emitter.
//!
//! # Architecture
//!
//! Request construction flows one direction:
//!
//! environment snapshot -> URL component extraction -> query
//! normalization -> [`Request`]
//!
//! Response production is independent: a caller-supplied override-header
//! map plus a raw body pass through [`Response::resolve`] exactly once,
//! and the finalized response is written by an [`Emitter`] exactly once.
//!
//! # Example
//!
//! ```rust
//! use http_env::{EnvSnapshot, Request};
//!
//! let env = EnvSnapshot::from_pairs([
//!     ("REQUEST_METHOD", "GET"),
//!     ("HTTP_HOST", "example.com"),
//!     ("REQUEST_URI", "/status"),
//! ]);
//! let request = Request::from_env(&env)?;
//! assert_eq!(request.url(), "http://example.com/status");
//! # Ok::<(), http_env::Error>(())
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use config::Config;
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use request::Request;
pub use response::{Emitter, Response};
