//! # compare_core: Contract parsing, metrics and baseline matching
//!
//! ## Role
//!
//! compare_core holds all the logic of the options comparison tool; the
//! service and adapter crates around it are I/O glue. It provides:
//! - Contract string parsing into a validated [`ContractSpec`] (`contract`)
//! - The market data seam: snapshot type and provider trait (`market_data`)
//! - Normalised sensitivity ratios (`metrics`)
//! - Baseline contract selection on a reference underlying (`baseline`)
//! - The snapshot-then-metrics composition (`analysis`)
//! - Value and error types (`types`)
//!
//! ## No Pricing Model
//!
//! Premiums and Greeks come from the provider. Nothing here prices options;
//! every output is a ratio of provider-supplied inputs.
//!
//! ## Usage Examples
//!
//! ```rust
//! use compare_core::prelude::*;
//!
//! let spec = parse("SPY 06-16-2023 400C").unwrap();
//! let snapshot = MarketSnapshot {
//!     premium: 10.0, bid: 9.8, ask: 10.2, underlying_price: 410.0,
//!     delta: 0.55, theta: -0.2, gamma: 0.02, vega: 0.3, implied_volatility: 0.25,
//! };
//!
//! let metrics = MetricsEngine::default().compute(&spec, &snapshot).unwrap();
//! assert!((metrics.delta_prem - 0.055).abs() < 1e-12);
//!
//! let moneyness = spec.moneyness(snapshot.underlying_price).unwrap();
//! assert!(moneyness < 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod baseline;
pub mod contract;
pub mod market_data;
pub mod metrics;
pub mod types;

pub use contract::ContractSpec;
pub use types::{ContractError, ContractResult};

/// Commonly used items.
pub mod prelude {
    pub use crate::analysis::{analyse_contract, ContractAnalysis};
    pub use crate::baseline::{
        analyse_baseline, find_baseline, nearest_strike, BaselineMatch, BaselineMatcher,
        BaselineResult, DEFAULT_REFERENCE_TICKER, DEFAULT_SCALING,
    };
    pub use crate::contract::{parse, ContractSpec};
    pub use crate::market_data::{
        InMemoryProvider, MarketDataDocument, MarketDataProvider, MarketSnapshot, OptionQuote,
    };
    pub use crate::metrics::{MetricSet, MetricsEngine, DEFAULT_SAMPLE_MOVE};
    pub use crate::types::{ContractError, ContractField, ContractResult, ContractType, Expiry};
}
