//! Error types for Couchbase Lite REST operations.

use serde_json::Value;
use thiserror::Error;

/// Result type for Couchbase Lite REST operations.
pub type Result<T> = std::result::Result<T, CbliteError>;

/// Errors that can occur while talking to the Couchbase Lite listener.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CbliteError {
    /// The host environment reports no installed Couchbase Lite engine.
    #[error("Couchbase Lite is not installed")]
    EngineNotInstalled,

    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx response; `body` is the parsed JSON error body the server sent.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: Value },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CbliteError {
    /// True when the server reported a missing database or document.
    ///
    /// The listener signals this both through the HTTP status and through a
    /// `status` field in the error body, so either is accepted.
    pub fn is_not_found(&self) -> bool {
        match self {
            CbliteError::Server { status, body } => {
                *status == 404
                    || body
                        .get("status")
                        .is_some_and(|v| *v == "404" || *v == 404)
            }
            _ => false,
        }
    }
}
