//! Error types for search coordination.
//!
//! Fetch failures never escape the dispatcher: they are folded into a
//! [`SearchOutcome::Failure`](crate::SearchOutcome) carrying an [`ErrorKind`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected before it could become a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Input was empty or whitespace only. Never dispatched, never surfaced.
    #[error("query is empty")]
    Empty,
}

/// Failure reason recorded in a search outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport, HTTP or decoding failure.
    Network,
    /// The fetch exceeded the configured request timeout.
    Timeout,
}

impl ErrorKind {
    /// Short label for logs and status lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Timeout => "timeout",
        }
    }

    /// User-facing message for a failed search of `noun` (e.g. "books").
    #[must_use]
    pub fn user_message(&self, noun: &str) -> String {
        match self {
            Self::Network => format!("Failed to fetch {noun}. Please try again."),
            Self::Timeout => format!("Searching {noun} took too long. Please try again."),
        }
    }
}

/// Errors a [`Fetcher`](crate::Fetcher) may report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The service rejected the request in a well-formed response.
    #[error("service rejected the request: {0}")]
    Api(String),

    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request did not finish in time.
    #[error("request timed out after {after_ms} ms")]
    Timeout {
        /// Limit that was exceeded.
        after_ms: u64,
    },
}

impl FetchError {
    /// Outcome classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Network(_) | Self::Status { .. } | Self::Api(_) | Self::Decode(_) => {
                ErrorKind::Network
            }
        }
    }
}
