//! Provider backed by an in-memory chain document.

use tracing::trace;

use super::{MarketDataDocument, MarketDataProvider, MarketSnapshot, OptionQuote};
use crate::contract::ContractSpec;
use crate::types::{ContractError, ContractResult, ContractType, Expiry};

/// Strikes closer than this are the same listing.
const STRIKE_TOLERANCE: f64 = 1e-6;

/// Market data provider serving a fixed [`MarketDataDocument`].
///
/// Every fetch reads the document afresh; nothing is memoised between calls.
///
/// # Examples
/// ```
/// use compare_core::market_data::{InMemoryProvider, MarketDataProvider};
///
/// let provider = InMemoryProvider::default().with_underlying("SPY", 410.0);
/// assert_eq!(provider.fetch_underlying_price("spy").unwrap(), 410.0);
/// assert!(provider.fetch_underlying_price("QQQ").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    document: MarketDataDocument,
}

impl InMemoryProvider {
    /// Creates a provider serving `document`.
    pub fn new(document: MarketDataDocument) -> Self {
        Self { document }
    }

    /// Adds or replaces an underlying spot price.
    pub fn with_underlying(mut self, ticker: &str, price: f64) -> Self {
        self.document
            .underlyings
            .insert(ticker.to_ascii_uppercase(), price);
        self
    }

    /// Appends a listed option.
    pub fn with_quote(mut self, quote: OptionQuote) -> Self {
        self.document.options.push(quote);
        self
    }

    /// Borrow the served document.
    pub fn document(&self) -> &MarketDataDocument {
        &self.document
    }

    fn find_quote(&self, spec: &ContractSpec) -> Option<&OptionQuote> {
        self.document.options.iter().find(|q| {
            q.matches(spec.ticker(), spec.expiry(), spec.contract_type())
                && (q.strike - spec.strike()).abs() < STRIKE_TOLERANCE
        })
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot> {
        let quote = self.find_quote(spec).ok_or_else(|| {
            ContractError::data_unavailable(spec.to_string(), "contract not listed")
        })?;
        let underlying_price = self.fetch_underlying_price(spec.ticker())?;

        trace!(contract = %spec, premium = quote.premium, "Resolved option quote");
        Ok(quote.to_snapshot(underlying_price))
    }

    fn fetch_available_strikes(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
    ) -> ContractResult<Vec<f64>> {
        let mut strikes: Vec<f64> = Vec::new();
        for quote in self
            .document
            .options
            .iter()
            .filter(|q| q.matches(ticker, expiry, contract_type))
        {
            if !strikes
                .iter()
                .any(|s| (s - quote.strike).abs() < STRIKE_TOLERANCE)
            {
                strikes.push(quote.strike);
            }
        }
        Ok(strikes)
    }

    fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64> {
        self.document
            .underlyings
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(ticker))
            .map(|(_, price)| *price)
            .ok_or_else(|| {
                ContractError::data_unavailable(ticker.to_ascii_uppercase(), "underlying not listed")
            })
    }
}
