//! Baseline contract matching on a reference underlying.
//!
//! A contract's moneyness `m = (K - S) / S` is carried over to the reference
//! underlying, dampened by a caller-supplied `scaling`:
//!
//! ```text
//! target_strike = (1 + m * scaling) * reference_price
//! ```
//!
//! The listed reference strike closest to `target_strike` is selected. The
//! dampening is a heuristic: the same percentage moneyness on a broad index
//! ETF is a less likely event than on a single name.
//!
//! This module provides:
//! - [`BaselineMatcher`] / [`find_baseline`]: strike selection against a provider
//! - [`nearest_strike`], [`target_strike`]: the pure selection rule
//! - [`analyse_baseline`]: matching followed by snapshot retrieval and metrics

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::ContractAnalysis;
use crate::contract::{is_ticker, ContractSpec};
use crate::market_data::MarketDataProvider;
use crate::metrics::MetricsEngine;
use crate::types::{ContractError, ContractField, ContractResult, ContractType, Expiry};

/// Reference underlying used for baseline contracts.
pub const DEFAULT_REFERENCE_TICKER: &str = "SPY";

/// Default moneyness dampening factor.
pub const DEFAULT_SCALING: f64 = 0.5;

/// Strike targeted on the reference underlying.
///
/// # Examples
/// ```
/// use compare_core::baseline::target_strike;
///
/// assert_eq!(target_strike(0.10, 0.5, 400.0), 420.0);
/// assert_eq!(target_strike(0.10, 0.0, 400.0), 400.0);
/// ```
#[inline]
pub fn target_strike(moneyness: f64, scaling: f64, reference_price: f64) -> f64 {
    (1.0 + moneyness * scaling) * reference_price
}

/// Strike with minimal absolute distance to `target`.
///
/// Ties resolve to the earliest strike in `strikes`. Strikes that are not
/// finite and positive are ignored. Returns `None` when no usable strike is
/// listed.
///
/// # Examples
/// ```
/// use compare_core::baseline::nearest_strike;
///
/// assert_eq!(nearest_strike(&[395.0, 400.0, 405.0], 401.0), Some(400.0));
/// assert_eq!(nearest_strike(&[399.0, 401.0], 400.0), Some(399.0));
/// assert_eq!(nearest_strike(&[], 400.0), None);
/// assert_eq!(nearest_strike(&[0.0, 10.0], 0.0), Some(10.0));
/// ```
pub fn nearest_strike(strikes: &[f64], target: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &strike in strikes.iter().filter(|s| s.is_finite() && **s > 0.0) {
        let distance = (strike - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((strike, distance)),
        }
    }
    best.map(|(strike, _)| strike)
}

/// Outcome of strike selection on the reference underlying.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineMatch {
    /// Synthesised reference contract
    pub spec: ContractSpec,
    /// Reference underlying spot at match time
    pub reference_price: f64,
    /// Strike the selection aimed for
    pub target_strike: f64,
    /// Moneyness of the original contract
    pub moneyness: f64,
    /// Dampening factor applied to the moneyness
    pub scaling: f64,
}

/// Finds baseline contracts on a fixed reference underlying.
///
/// # Examples
/// ```
/// use compare_core::baseline::BaselineMatcher;
/// use compare_core::market_data::{InMemoryProvider, OptionQuote};
/// use compare_core::types::{ContractType, Expiry};
///
/// let expiry = Expiry::from_mdy(6, 16, 2023).unwrap();
/// let mut provider = InMemoryProvider::default().with_underlying("SPY", 430.0);
/// for strike in [420.0, 425.0, 430.0] {
///     provider = provider.with_quote(OptionQuote {
///         ticker: "SPY".into(), expiry, strike, contract_type: ContractType::Call,
///         premium: 5.0, bid: 4.9, ask: 5.1, delta: 0.5, theta: -0.1,
///         gamma: 0.01, vega: 0.2, implied_volatility: 0.2,
///     });
/// }
///
/// let matcher = BaselineMatcher::default();
/// let found = matcher
///     .find_baseline(&provider, expiry, ContractType::Call, -10.0 / 410.0, 0.5)
///     .unwrap();
/// assert_eq!(found.spec.strike(), 425.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineMatcher {
    reference_ticker: String,
}

impl Default for BaselineMatcher {
    fn default() -> Self {
        Self {
            reference_ticker: DEFAULT_REFERENCE_TICKER.to_string(),
        }
    }
}

impl BaselineMatcher {
    /// Creates a matcher for `reference_ticker`.
    ///
    /// # Errors
    /// `ContractError::Validation` when the ticker is not alphabetic.
    pub fn new(reference_ticker: &str) -> ContractResult<Self> {
        if !is_ticker(reference_ticker) {
            return Err(ContractError::validation(
                ContractField::Ticker,
                reference_ticker,
                reference_ticker,
            ));
        }
        Ok(Self {
            reference_ticker: reference_ticker.to_ascii_uppercase(),
        })
    }

    /// Reference underlying ticker.
    pub fn reference_ticker(&self) -> &str {
        &self.reference_ticker
    }

    /// Selects the reference contract matching `moneyness` dampened by `scaling`.
    ///
    /// The returned spec carries the strike only; the caller fetches its
    /// snapshot and metrics.
    ///
    /// # Errors
    /// - `Validation` when `scaling` is not finite
    /// - `UndefinedMetric` when `moneyness` is not finite
    /// - `NoBaselineData` when the reference price or strike list cannot be retrieved
    /// - `NoStrikesAvailable` when no strikes are listed for the expiry
    pub fn find_baseline<P: MarketDataProvider + ?Sized>(
        &self,
        provider: &P,
        expiry: Expiry,
        contract_type: ContractType,
        moneyness: f64,
        scaling: f64,
    ) -> ContractResult<BaselineMatch> {
        if !scaling.is_finite() {
            let token = scaling.to_string();
            return Err(ContractError::validation(ContractField::Scaling, token.clone(), token));
        }
        if !moneyness.is_finite() {
            return Err(ContractError::UndefinedMetric {
                metric: "moneyness",
                denominator: "underlying_price",
            });
        }

        let ticker = self.reference_ticker.as_str();
        let no_data = |e: ContractError| ContractError::no_baseline_data(ticker, e.to_string());

        let reference_price = provider.fetch_underlying_price(ticker).map_err(no_data)?;
        let strikes = provider
            .fetch_available_strikes(ticker, expiry, contract_type)
            .map_err(no_data)?;

        let target = target_strike(moneyness, scaling, reference_price);
        let strike = nearest_strike(&strikes, target).ok_or_else(|| {
            ContractError::NoStrikesAvailable {
                ticker: ticker.to_string(),
                expiry: expiry.to_string(),
            }
        })?;

        debug!(
            reference = ticker,
            reference_price,
            moneyness,
            scaling,
            target_strike = target,
            strike,
            listed = strikes.len(),
            "Selected baseline strike"
        );

        Ok(BaselineMatch {
            spec: ContractSpec::new(ticker, expiry, strike, contract_type)?,
            reference_price,
            target_strike: target,
            moneyness,
            scaling,
        })
    }
}

/// Selects a baseline contract on `reference_ticker`.
///
/// Convenience over [`BaselineMatcher::find_baseline`]; returns the
/// synthesised spec only.
pub fn find_baseline<P: MarketDataProvider + ?Sized>(
    provider: &P,
    reference_ticker: &str,
    expiry: Expiry,
    contract_type: ContractType,
    moneyness: f64,
    scaling: f64,
) -> ContractResult<ContractSpec> {
    BaselineMatcher::new(reference_ticker)?
        .find_baseline(provider, expiry, contract_type, moneyness, scaling)
        .map(|found| found.spec)
}

/// Baseline contract with its own snapshot and metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineResult {
    /// How the reference strike was chosen
    pub matched: BaselineMatch,
    /// Reference contract analysis
    pub analysis: ContractAnalysis,
}

/// Matches `primary` against the reference underlying and analyses the result.
///
/// The primary contract's moneyness is measured against its own snapshot's
/// underlying price. Failure to fetch the reference contract's snapshot is
/// reported as `NoBaselineData`.
pub fn analyse_baseline<P: MarketDataProvider + ?Sized>(
    provider: &P,
    engine: &MetricsEngine,
    matcher: &BaselineMatcher,
    primary: &ContractAnalysis,
    scaling: f64,
) -> ContractResult<BaselineResult> {
    let moneyness = primary
        .spec
        .moneyness(primary.snapshot.underlying_price)?;
    let matched = matcher.find_baseline(
        provider,
        primary.spec.expiry(),
        primary.spec.contract_type(),
        moneyness,
        scaling,
    )?;

    let snapshot = provider
        .fetch_option_snapshot(&matched.spec)
        .map_err(|e| ContractError::no_baseline_data(matcher.reference_ticker(), e.to_string()))?;
    let metrics = engine.compute(&matched.spec, &snapshot)?;

    info!(
        primary = %primary.spec,
        baseline = %matched.spec,
        "Baseline contract analysed"
    );

    Ok(BaselineResult {
        analysis: ContractAnalysis {
            spec: matched.spec.clone(),
            snapshot,
            metrics,
        },
        matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{InMemoryProvider, MarketSnapshot, OptionQuote};
    use approx::assert_relative_eq;

    fn expiry() -> Expiry {
        Expiry::from_mdy(6, 16, 2023).unwrap()
    }

    fn quote(ticker: &str, strike: f64, contract_type: ContractType) -> OptionQuote {
        OptionQuote {
            ticker: ticker.to_string(),
            expiry: expiry(),
            strike,
            contract_type,
            premium: 6.0,
            bid: 5.9,
            ask: 6.1,
            delta: 0.45,
            theta: -0.15,
            gamma: 0.015,
            vega: 0.25,
            implied_volatility: 0.18,
        }
    }

    /// SPY at 430 with 1-point strikes 415..=435 for calls and puts.
    fn spy_chain() -> InMemoryProvider {
        let mut provider = InMemoryProvider::default().with_underlying("SPY", 430.0);
        for strike in 415..=435 {
            provider = provider
                .with_quote(quote("SPY", strike as f64, ContractType::Call))
                .with_quote(quote("SPY", strike as f64, ContractType::Put));
        }
        provider
    }

    #[test]
    fn test_nearest_strike_picks_minimum_distance() {
        assert_eq!(nearest_strike(&[100.0, 105.0, 110.0], 107.6), Some(110.0));
        assert_eq!(nearest_strike(&[100.0, 105.0, 110.0], 92.0), Some(100.0));
    }

    #[test]
    fn test_nearest_strike_tie_prefers_enumeration_order() {
        assert_eq!(nearest_strike(&[399.0, 401.0], 400.0), Some(399.0));
        assert_eq!(nearest_strike(&[401.0, 399.0], 400.0), Some(401.0));
    }

    #[test]
    fn test_nearest_strike_skips_non_finite() {
        assert_eq!(nearest_strike(&[f64::NAN, 400.0], 1.0), Some(400.0));
        assert_eq!(nearest_strike(&[f64::NAN], 1.0), None);
    }

    #[test]
    fn test_scaled_moneyness_target() {
        let moneyness = (400.0 - 410.0) / 410.0;
        let found = BaselineMatcher::default()
            .find_baseline(&spy_chain(), expiry(), ContractType::Call, moneyness, 0.5)
            .unwrap();

        assert_relative_eq!(found.target_strike, (1.0 - 0.0121951) * 430.0, epsilon = 1e-3);
        assert_eq!(found.spec.strike(), 425.0);
        assert_eq!(found.spec.ticker(), "SPY");
        assert_eq!(found.spec.contract_type(), ContractType::Call);
        assert_eq!(found.spec.expiry(), expiry());

        // Unscaled moneyness would have targeted a different strike.
        let listed: Vec<f64> = (415..=435).map(f64::from).collect();
        let unscaled = nearest_strike(&listed, target_strike(moneyness, 1.0, 430.0));
        assert_eq!(unscaled, Some(420.0));
    }

    #[test]
    fn test_zero_scaling_targets_at_the_money() {
        for moneyness in [-0.3, -0.05, 0.0, 0.07, 0.5] {
            let found = BaselineMatcher::default()
                .find_baseline(&spy_chain(), expiry(), ContractType::Put, moneyness, 0.0)
                .unwrap();
            assert_eq!(found.spec.strike(), 430.0);
            assert_eq!(found.spec.contract_type(), ContractType::Put);
        }
    }

    #[test]
    fn test_nearest_strike_skips_non_positive() {
        assert_eq!(nearest_strike(&[0.0, -5.0, 10.0], 0.0), Some(10.0));
        assert_eq!(nearest_strike(&[-5.0, 0.0], -5.0), None);
    }

    #[test]
    fn test_only_non_positive_strikes_raise_no_strikes_available() {
        let provider = InMemoryProvider::default()
            .with_underlying("SPY", 430.0)
            .with_quote(quote("SPY", 0.0, ContractType::Call))
            .with_quote(quote("SPY", -5.0, ContractType::Call));
        let err = BaselineMatcher::default()
            .find_baseline(&provider, expiry(), ContractType::Call, -0.9, 1.0)
            .unwrap_err();
        assert!(matches!(err, ContractError::NoStrikesAvailable { .. }));
    }

    #[test]
    fn test_empty_strikes_raise_no_strikes_available() {
        let provider = InMemoryProvider::default().with_underlying("SPY", 430.0);
        let err = BaselineMatcher::default()
            .find_baseline(&provider, expiry(), ContractType::Call, 0.0, 0.5)
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::NoStrikesAvailable {
                ticker: "SPY".to_string(),
                expiry: "06-16-2023".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_reference_price_raises_no_baseline_data() {
        let provider = InMemoryProvider::default().with_quote(quote("SPY", 430.0, ContractType::Call));
        let err = BaselineMatcher::default()
            .find_baseline(&provider, expiry(), ContractType::Call, 0.0, 0.5)
            .unwrap_err();
        assert!(matches!(err, ContractError::NoBaselineData { ref ticker, .. } if ticker == "SPY"));
    }

    #[test]
    fn test_non_finite_scaling_rejected() {
        let err = BaselineMatcher::default()
            .find_baseline(&spy_chain(), expiry(), ContractType::Call, 0.0, f64::NAN)
            .unwrap_err();
        assert_eq!(err.field(), Some(ContractField::Scaling));
    }

    #[test]
    fn test_custom_reference_ticker() {
        let provider = InMemoryProvider::default()
            .with_underlying("QQQ", 300.0)
            .with_quote(quote("QQQ", 295.0, ContractType::Call))
            .with_quote(quote("QQQ", 305.0, ContractType::Call));
        let spec = find_baseline(&provider, "qqq", expiry(), ContractType::Call, 0.04, 0.5).unwrap();
        assert_eq!(spec.ticker(), "QQQ");
        assert_eq!(spec.strike(), 305.0);
    }

    #[test]
    fn test_invalid_reference_ticker_rejected() {
        assert!(BaselineMatcher::new("SP5").is_err());
        assert!(BaselineMatcher::new("").is_err());
    }

    #[test]
    fn test_analyse_baseline_end_to_end() {
        let provider = spy_chain()
            .with_underlying("XYZ", 410.0)
            .with_quote(quote("XYZ", 400.0, ContractType::Call));
        let engine = MetricsEngine::default();
        let spec = ContractSpec::new("XYZ", expiry(), 400.0, ContractType::Call).unwrap();
        let primary = crate::analysis::analyse_contract(&provider, &engine, spec).unwrap();

        let result =
            analyse_baseline(&provider, &engine, &BaselineMatcher::default(), &primary, 0.5).unwrap();
        assert_eq!(result.analysis.spec.strike(), 425.0);
        assert_eq!(result.matched.spec, result.analysis.spec);
        assert_relative_eq!(result.matched.moneyness, -10.0 / 410.0, epsilon = 1e-12);
        assert_eq!(result.analysis.snapshot.underlying_price, 430.0);
        assert_relative_eq!(result.analysis.metrics.delta_prem, 0.45 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_analyse_baseline_missing_snapshot_is_no_baseline_data() {
        // Reference strikes are listed but their quotes cannot be fetched.
        struct StrikesWithoutQuotes(InMemoryProvider);

        impl MarketDataProvider for StrikesWithoutQuotes {
            fn name(&self) -> &str {
                "strikes-only"
            }
            fn fetch_option_snapshot(&self, spec: &ContractSpec) -> ContractResult<MarketSnapshot> {
                if spec.ticker() == "SPY" {
                    Err(ContractError::data_unavailable(spec.to_string(), "no quote"))
                } else {
                    self.0.fetch_option_snapshot(spec)
                }
            }
            fn fetch_available_strikes(
                &self,
                ticker: &str,
                expiry: Expiry,
                contract_type: ContractType,
            ) -> ContractResult<Vec<f64>> {
                self.0.fetch_available_strikes(ticker, expiry, contract_type)
            }
            fn fetch_underlying_price(&self, ticker: &str) -> ContractResult<f64> {
                self.0.fetch_underlying_price(ticker)
            }
        }

        let provider = StrikesWithoutQuotes(
            spy_chain()
                .with_underlying("XYZ", 410.0)
                .with_quote(quote("XYZ", 400.0, ContractType::Call)),
        );
        let engine = MetricsEngine::default();
        let spec = ContractSpec::new("XYZ", expiry(), 400.0, ContractType::Call).unwrap();
        let primary = crate::analysis::analyse_contract(&provider, &engine, spec).unwrap();

        let err = analyse_baseline(&provider, &engine, &BaselineMatcher::default(), &primary, 0.5)
            .unwrap_err();
        assert!(matches!(err, ContractError::NoBaselineData { .. }));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_zero_scaling_independent_of_moneyness(moneyness in -0.9f64..0.9) {
                let found = BaselineMatcher::default()
                    .find_baseline(&spy_chain(), expiry(), ContractType::Call, moneyness, 0.0)
                    .unwrap();
                prop_assert_eq!(found.spec.strike(), 430.0);
            }

            #[test]
            fn test_selected_strike_is_closest(
                strikes in prop::collection::vec(1.0f64..1000.0, 1..40),
                target in 0.0f64..1100.0,
            ) {
                let chosen = nearest_strike(&strikes, target).unwrap();
                let best = (chosen - target).abs();
                for s in &strikes {
                    prop_assert!(best <= (s - target).abs());
                }
            }
        }
    }
}
