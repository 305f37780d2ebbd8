//! JSON market data document on disk.
//!
//! The file is re-read on every request so an externally refreshed document
//! is always served current. Nothing is held between calls.

use std::path::{Path, PathBuf};

use compare_core::market_data::{
    InMemoryProvider, MarketDataDocument, MarketDataProvider, MarketSnapshot,
};
use compare_core::types::{ContractResult, ContractType, Expiry};
use compare_core::ContractSpec;
use tracing::debug;

use crate::FeedError;

/// Provider reading a [`MarketDataDocument`] from a JSON file.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    /// Creates a provider for `path`.
    ///
    /// # Errors
    /// `FeedError::Io` when the file does not exist, so a bad path fails
    /// before any contract is looked up.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(FeedError::Io {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Ok(Self { path })
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the document.
    pub fn load(&self) -> Result<MarketDataDocument, FeedError> {
        let origin = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: origin.clone(),
            source,
        })?;
        let document: MarketDataDocument =
            serde_json::from_str(&content).map_err(|e| FeedError::Decode {
                origin,
                message: e.to_string(),
            })?;

        debug!(
            path = %self.path.display(),
            underlyings = document.underlyings.len(),
            options = document.options.len(),
            "Loaded market data document"
        );
        Ok(document)
    }

    fn current(&self, what: impl Into<String>) -> ContractResult<InMemoryProvider> {
        self.load()
            .map(InMemoryProvider::new)
            .map_err(|e| e.into_unavailable(what))
    }
}

impl MarketDataProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot> {
        self.current(spec.to_string())?.fetch_option_snapshot(spec)
    }

    fn fetch_available_strikes(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
    ) -> ContractResult<Vec<f64>> {
        self.current(ticker)?
            .fetch_available_strikes(ticker, expiry, contract_type)
    }

    fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64> {
        self.current(ticker)?.fetch_underlying_price(ticker)
    }
}
