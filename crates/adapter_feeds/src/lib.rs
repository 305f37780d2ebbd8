//! # adapter_feeds: Market data sources
//!
//! Implementations of [`compare_core::market_data::MarketDataProvider`]:
//! - [`FileProvider`]: JSON market data document on disk
//! - [`HttpProvider`]: HTTP quote service speaking the same quote schema
//!
//! [`FeedSource`] describes which one to use and builds it behind a boxed
//! trait object, so callers only see the provider trait.
//!
//! ## Usage
//!
//! ```no_run
//! use adapter_feeds::FeedSource;
//! use compare_core::prelude::*;
//!
//! let provider = FeedSource::File("market.json".into()).connect().unwrap();
//! let spec = parse("SPY 06-16-2023 400C").unwrap();
//! let snapshot = provider.fetch_option_snapshot(&spec).unwrap();
//! println!("{}", snapshot.premium);
//! ```

#![deny(missing_docs)]

mod error;
mod file;
mod http;

use std::path::PathBuf;
use std::time::Duration;

use compare_core::market_data::MarketDataProvider;
use tracing::info;

pub use error::FeedError;
pub use file::FileProvider;
pub use http::{ChainResponse, HttpProvider, QuoteResponse, DEFAULT_TIMEOUT_SECS};

/// Where market data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    /// JSON market data document
    File(PathBuf),
    /// HTTP quote service
    Http {
        /// Service base URL
        base_url: String,
        /// Per-request timeout in seconds
        timeout_secs: u64,
    },
}

impl FeedSource {
    /// Short source name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedSource::File(_) => "file",
            FeedSource::Http { .. } => "http",
        }
    }

    /// Builds the provider for this source.
    ///
    /// # Errors
    /// - `FeedError::Io` when the document file does not exist
    /// - `FeedError::Config` when the service URL or timeout is unusable
    pub fn connect(&self) -> Result<Box<dyn MarketDataProvider>, FeedError> {
        let provider: Box<dyn MarketDataProvider> = match self {
            FeedSource::File(path) => {
                info!(path = %path.display(), "Using market data file");
                Box::new(FileProvider::open(path)?)
            }
            FeedSource::Http {
                base_url,
                timeout_secs,
            } => {
                if *timeout_secs == 0 {
                    return Err(FeedError::Config(
                        "timeout_secs must be greater than zero".to_string(),
                    ));
                }
                info!(base_url = %base_url, timeout_secs, "Using quote service");
                Box::new(HttpProvider::new(
                    base_url,
                    Duration::from_secs(*timeout_secs),
                )?)
            }
        };
        Ok(provider)
    }
}
