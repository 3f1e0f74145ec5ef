//! Error types for the Ulule API client.
//!
//! # Design
//! `HttpStatus` covers every non-200 response, 404 included, and keeps the raw
//! status code and body for debugging. `NotFound` is reserved for lookups the
//! client resolves itself (scanning a project list for a slug), and
//! `InvalidArgument` is raised before any request leaves the process.

use thiserror::Error;

/// A specialized `Result` type for Ulule API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `UluleClient` accessors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body was not the JSON document we expected.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No project matched the requested slug or id.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument was rejected before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for 4xx responses and arguments rejected locally.
    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::HttpStatus { status, .. } => (400..500).contains(status),
            ApiError::InvalidArgument(_) | ApiError::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::HttpStatus { status, .. } if *status >= 500)
    }
}
