//! Synchronous HTTP GET core with a pluggable transport.
//!
//! # Overview
//! Builds and drives one HTTP GET at a time against a `Transport`
//! implementation supplied by the caller (host-does-IO pattern). The crate
//! itself never touches the network: it configures the exchange, loops the
//! transport's single-step processing primitive until completion while
//! accumulating body chunks, and extracts structured data (headers, cookie
//! values) from the finished response.
//!
//! # Design
//! - `Request` exclusively owns one boxed `Transport`; dropping the request
//!   releases the exchange handle.
//! - Execution is single-threaded and blocking — `execute` returns only when
//!   the transport reports done or error, with no timeout of its own.
//! - The response body is accumulated in arrival order, NUL-terminated for
//!   C-boundary convenience, and reports its exact length without the
//!   terminator.
//! - Header setting and cookie matching each have a permissive historical
//!   mode (default) and a strict opt-in mode.

pub mod cookie;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod transport;

pub use cookie::CookieMatch;
pub use error::HttpError;
pub use headers::{DEFAULT_HEADERS, DEFAULT_USER_AGENT};
pub use request::{Request, ValidationMode};
pub use response::Response;
pub use transport::{Method, Step, Transport, TransportError};
