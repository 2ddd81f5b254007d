//! # Remote Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   Backend said  │  │     Decoding            │ │
//! │  │                 │  │       no        │  │                         │ │
//! │  │  Http           │  │  Status (4xx)   │  │  Decode                 │ │
//! │  │  Status (5xx)   │  │  Rejected       │  │  MissingField           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Configuration  │   For a write, every category above leaves the    │
//! │  │  InvalidConfig  │   outcome uncertain from the register's side.     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for backend calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose envelope reports failure.
    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    /// Body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A required field was absent from an otherwise valid body.
    #[error("Response is missing {0}")]
    MissingField(&'static str),

    /// Backend configuration is unusable.
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::InvalidConfig(err.to_string())
    }
}

impl RemoteError {
    /// True for network-level failures and server-side (5xx) errors.
    pub fn is_transport(&self) -> bool {
        match self {
            RemoteError::Http(_) => true,
            RemoteError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status, when the backend answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
