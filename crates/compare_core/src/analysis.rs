//! Contract analysis: snapshot retrieval followed by metric computation.

use serde::Serialize;
use tracing::info;

use crate::contract::ContractSpec;
use crate::market_data::{MarketDataProvider, MarketSnapshot};
use crate::metrics::{MetricSet, MetricsEngine};
use crate::types::ContractResult;

/// A contract together with the snapshot and metrics computed from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractAnalysis {
    /// Analysed contract
    pub spec: ContractSpec,
    /// Snapshot the metrics were computed from
    pub snapshot: MarketSnapshot,
    /// Derived ratios
    pub metrics: MetricSet,
}

/// Fetches `spec`'s snapshot from `provider` and computes its metrics.
///
/// # Examples
/// ```
/// use compare_core::analysis::analyse_contract;
/// use compare_core::contract::parse;
/// use compare_core::market_data::{InMemoryProvider, OptionQuote};
/// use compare_core::metrics::MetricsEngine;
///
/// let spec = parse("SPY 06-16-2023 400C").unwrap();
/// let provider = InMemoryProvider::default()
///     .with_underlying("SPY", 410.0)
///     .with_quote(OptionQuote {
///         ticker: "SPY".into(), expiry: spec.expiry(), strike: 400.0,
///         contract_type: spec.contract_type(), premium: 10.0, bid: 9.8, ask: 10.2,
///         delta: 0.55, theta: -0.2, gamma: 0.02, vega: 0.3, implied_volatility: 0.25,
///     });
///
/// let analysis = analyse_contract(&provider, &MetricsEngine::default(), spec).unwrap();
/// assert!((analysis.metrics.gamma_del - 0.0364).abs() < 1e-4);
/// ```
///
/// # Errors
/// `DataUnavailable` from the provider, or `UndefinedMetric` from the engine.
pub fn analyse_contract<P: MarketDataProvider + ?Sized>(
    provider: &P,
    engine: &MetricsEngine,
    spec: ContractSpec,
) -> ContractResult<ContractAnalysis> {
    let snapshot = provider.fetch_option_snapshot(&spec)?;
    let metrics = engine.compute(&spec, &snapshot)?;

    info!(
        contract = %spec,
        provider = provider.name(),
        premium = snapshot.premium,
        underlying_price = snapshot.underlying_price,
        "Contract analysed"
    );

    Ok(ContractAnalysis {
        spec,
        snapshot,
        metrics,
    })
}
