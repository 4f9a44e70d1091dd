//! Error types for the request core.
//!
//! # Design
//! Lookup misses (`HeaderNotFound`, `CookieNotFound`) get dedicated variants
//! because callers routinely treat "the field is not there" as a normal,
//! recoverable outcome rather than a failure of the exchange. Everything the
//! transport collaborator reports (handle configuration, prepare, or a
//! failed processing step) lands in `Transport` with a message naming the
//! phase. No variant is fatal to the process.

use std::fmt;

/// Errors returned by `Request` operations.
#[derive(Debug)]
pub enum HttpError {
    /// An input was empty or malformed before the transport was touched.
    InvalidArgument(&'static str),

    /// The transport collaborator reported a failure.
    Transport(String),

    /// The response carries no header with the requested name.
    HeaderNotFound,

    /// The `Set-Cookie` header carries no cookie with the requested name.
    CookieNotFound,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            HttpError::Transport(msg) => write!(f, "transport error: {msg}"),
            HttpError::HeaderNotFound => write!(f, "header not found"),
            HttpError::CookieNotFound => write!(f, "cookie not found"),
        }
    }
}

impl std::error::Error for HttpError {}
