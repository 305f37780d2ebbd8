//! Feed error types.

use compare_core::ContractError;
use thiserror::Error;

/// Failure talking to a market data source.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Market data file could not be read
    #[error("Failed to read market data file {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Document or response body could not be decoded
    #[error("Failed to decode market data from {origin}: {message}")]
    Decode {
        /// File path or URL
        origin: String,
        /// Decoder message
        message: String,
    },

    /// HTTP transport failure
    #[error("Request to {url} failed: {message}")]
    Http {
        /// Requested URL
        url: String,
        /// Transport message
        message: String,
    },

    /// Quote service answered with a non-success status
    #[error("Quote service returned {status} for {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Source configuration is unusable
    #[error("Invalid feed configuration: {0}")]
    Config(String),
}

impl FeedError {
    /// Wrap as a core data-unavailable error for `what`.
    pub fn into_unavailable(self, what: impl Into<String>) -> ContractError {
        ContractError::data_unavailable(what, self.to_string())
    }
}
