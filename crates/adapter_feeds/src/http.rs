//! HTTP quote service client.
//!
//! Endpoints (JSON):
//! - `GET {base_url}/quote/{TICKER}` → `{"price": f64}`
//! - `GET {base_url}/options/{TICKER}?expiry=YYYY-MM-DD&type=C|P` →
//!   `{"underlying_price": f64, "options": [OptionQuote, ...]}`
//!
//! Every call is a fresh blocking request. No retries; a failed request is
//! reported as `DataUnavailable` carrying the URL.

use std::time::Duration;

use compare_core::market_data::{
    InMemoryProvider, MarketDataDocument, MarketDataProvider, MarketSnapshot, OptionQuote,
};
use compare_core::types::{ContractResult, ContractType, Expiry};
use compare_core::ContractSpec;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::FeedError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Spot quote response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuoteResponse {
    /// Current spot price
    pub price: f64,
}

/// Option chain response for one underlying, expiry and type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainResponse {
    /// Spot price at chain time
    pub underlying_price: f64,
    /// Listed options in enumeration order
    #[serde(default)]
    pub options: Vec<OptionQuote>,
}

impl ChainResponse {
    fn into_provider(self, ticker: &str) -> InMemoryProvider {
        let mut document = MarketDataDocument {
            options: self.options,
            ..Default::default()
        };
        document
            .underlyings
            .insert(ticker.to_ascii_uppercase(), self.underlying_price);
        InMemoryProvider::new(document)
    }
}

/// Blocking client for the quote service.
pub struct HttpProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    /// Creates a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    /// `FeedError::Config` when the URL is not http(s) or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FeedError::Config(format!(
                "Invalid quote service URL '{}'. Must start with http:// or https://",
                base_url
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("compare-options/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Service base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the spot quote endpoint.
    pub fn quote_url(&self, ticker: &str) -> String {
        format!("{}/quote/{}", self.base_url, ticker.to_ascii_uppercase())
    }

    /// URL of the option chain endpoint.
    pub fn chain_url(&self, ticker: &str, expiry: Expiry, contract_type: ContractType) -> String {
        format!(
            "{}/options/{}?expiry={}&type={}",
            self.base_url,
            ticker.to_ascii_uppercase(),
            expiry.to_iso(),
            contract_type.code()
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        debug!(url, "Requesting quote service");

        let response = self.client.get(url).send().map_err(|e| FeedError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().map_err(|e| FeedError::Decode {
            origin: url.to_string(),
            message: e.to_string(),
        })
    }

    fn chain(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
        what: impl Into<String>,
    ) -> ContractResult<InMemoryProvider> {
        let url = self.chain_url(ticker, expiry, contract_type);
        self.get_json::<ChainResponse>(&url)
            .map(|chain| chain.into_provider(ticker))
            .map_err(|e| e.into_unavailable(what))
    }
}

impl MarketDataProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot> {
        self.chain(
            spec.ticker(),
            spec.expiry(),
            spec.contract_type(),
            spec.to_string(),
        )?
        .fetch_option_snapshot(spec)
    }

    fn fetch_available_strikes(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
    ) -> ContractResult<Vec<f64>> {
        self.chain(ticker, expiry, contract_type, ticker)?
            .fetch_available_strikes(ticker, expiry, contract_type)
    }

    fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64> {
        let url = self.quote_url(ticker);
        self.get_json::<QuoteResponse>(&url)
            .map(|quote| quote.price)
            .map_err(|e| e.into_unavailable(ticker.to_ascii_uppercase()))
    }
}
