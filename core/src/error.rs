//! Error types for the Caddy admin client.
//!
//! # Design
//! Every failure surfaces to the caller unchanged; nothing here is retried.
//! `Status` keeps the raw status code and body so callers can inspect what
//! the admin endpoint rejected. `Decode` is reserved for configuration input
//! that could not be interpreted, never for response bodies on reads (those
//! fall back to raw bytes instead).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors returned by the client, the transport and the payload normalizer.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration input was not a mapping, valid JSON, or a plain string.
    #[error("invalid configuration payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// The admin endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("failed to reach {url}: {message}")]
    Connectivity { url: String, message: String },

    /// The request could not be constructed, e.g. a path segment that is
    /// not valid in a URI. Nothing was sent.
    #[error("invalid request to {url}: {message}")]
    InvalidRequest { url: String, message: String },

    /// A structured payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The client was constructed with unusable settings.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl AdminError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Status code of a `Status` error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}
