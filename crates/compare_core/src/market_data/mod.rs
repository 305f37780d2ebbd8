//! Market data seam.
//!
//! This module provides:
//! - [`MarketSnapshot`]: live quote and Greeks for one contract
//! - [`MarketDataProvider`]: the collaborator interface the core consumes
//! - [`MarketDataDocument`] / [`OptionQuote`]: serialisable chain document
//! - [`InMemoryProvider`]: provider backed by a loaded document
//!
//! Snapshots are fetched fresh for every request and never cached. Retry and
//! timeout policy, if any, belongs to the provider implementation.

mod in_memory;

pub use in_memory::InMemoryProvider;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::contract::ContractSpec;
use crate::types::{ContractResult, ContractType, Expiry};

/// Live quote and Greeks for a single contract.
///
/// # Examples
/// ```
/// use compare_core::market_data::MarketSnapshot;
///
/// let snapshot = MarketSnapshot {
///     premium: 10.0,
///     bid: 9.8,
///     ask: 10.2,
///     underlying_price: 410.0,
///     delta: 0.55,
///     theta: -0.2,
///     gamma: 0.02,
///     vega: 0.3,
///     implied_volatility: 0.25,
/// };
/// assert!((snapshot.mid() - 10.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Option premium (last traded price)
    pub premium: f64,
    /// Best bid
    pub bid: f64,
    /// Best ask
    pub ask: f64,
    /// Spot price of the underlying
    pub underlying_price: f64,
    /// Delta
    pub delta: f64,
    /// Theta (one-day decay)
    pub theta: f64,
    /// Gamma
    pub gamma: f64,
    /// Vega
    pub vega: f64,
    /// Implied volatility (decimal, e.g. 0.25)
    pub implied_volatility: f64,
}

impl MarketSnapshot {
    /// Midpoint of bid and ask.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.ask + self.bid) / 2.0
    }
}

/// Source of live option and underlying data.
///
/// Implementations perform blocking retrieval. A contract or underlying the
/// provider cannot resolve is reported as `ContractError::DataUnavailable`.
pub trait MarketDataProvider {
    /// Short provider name for logging.
    fn name(&self) -> &str;

    /// Fetches the current snapshot for `spec`.
    fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot>;

    /// Lists tradable strikes for an underlying, expiry and contract type.
    ///
    /// Order is the provider's enumeration order and must be stable for a
    /// given chain.
    fn fetch_available_strikes(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
    ) -> ContractResult<Vec<f64>>;

    /// Fetches the current spot price of an underlying.
    fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot> {
        (**self).fetch_option_snapshot(spec)
    }

    fn fetch_available_strikes(
        &self,
        ticker: &str,
        expiry: Expiry,
        contract_type: ContractType,
    ) -> ContractResult<Vec<f64>> {
        (**self).fetch_available_strikes(ticker, expiry, contract_type)
    }

    fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64> {
        (**self).fetch_underlying_price(ticker)
    }
}

/// One listed option in a market data document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying ticker
    pub ticker: String,
    /// Expiry date (ISO 8601)
    pub expiry: Expiry,
    /// Strike price
    pub strike: f64,
    /// Call or put (`"C"` / `"P"`)
    pub contract_type: ContractType,
    /// Option premium
    pub premium: f64,
    /// Best bid
    pub bid: f64,
    /// Best ask
    pub ask: f64,
    /// Delta
    pub delta: f64,
    /// Theta
    pub theta: f64,
    /// Gamma
    pub gamma: f64,
    /// Vega
    pub vega: f64,
    /// Implied volatility
    pub implied_volatility: f64,
}

impl OptionQuote {
    /// Returns whether this quote lists the given contract.
    pub fn matches(&self, ticker: &str, expiry: Expiry, contract_type: ContractType) -> bool {
        self.ticker.eq_ignore_ascii_case(ticker)
            && self.expiry == expiry
            && self.contract_type == contract_type
    }

    /// Combines the quote with a spot price into a snapshot.
    pub fn to_snapshot(&self, underlying_price: f64) -> MarketSnapshot {
        MarketSnapshot {
            premium: self.premium,
            bid: self.bid,
            ask: self.ask,
            underlying_price,
            delta: self.delta,
            theta: self.theta,
            gamma: self.gamma,
            vega: self.vega,
            implied_volatility: self.implied_volatility,
        }
    }
}

/// Serialisable option chain document.
///
/// # Examples
/// ```
/// use compare_core::market_data::MarketDataDocument;
///
/// let doc: MarketDataDocument = serde_json::from_str(r#"{
///     "underlyings": { "SPY": 410.0 },
///     "options": []
/// }"#).unwrap();
/// assert_eq!(doc.underlyings["SPY"], 410.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDataDocument {
    /// Spot prices keyed by ticker
    #[serde(default)]
    pub underlyings: BTreeMap<String, f64>,
    /// Listed options, in enumeration order
    #[serde(default)]
    pub options: Vec<OptionQuote>,
}
