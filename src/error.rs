//! Error types for the verification harness.
//!
//! The only distinction the harness cares about at runtime is bounded-wait
//! expiry versus everything else: a [`Error::Timeout`] gets a `timeout_error`
//! screenshot, any other failure gets an `error` screenshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A bounded wait (navigation, predicate, visibility) expired.
    #[error("timed out after {ms}ms waiting for {what}")]
    Timeout { what: String, ms: u64 },

    /// An error bubbled up from the CDP connection.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// Misconfiguration detected before or during launch.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Construct a timeout error for a named wait.
    pub fn timeout(what: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            ms,
        }
    }

    /// Whether this error is a bounded-wait expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
