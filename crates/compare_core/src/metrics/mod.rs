//! Normalised sensitivity ratios.
//!
//! This module provides:
//! - [`MetricSet`]: the fixed set of ratios derived from one snapshot
//! - [`MetricsEngine`]: pure computation of a [`MetricSet`] with a configurable sample move
//!
//! # Formulas
//!
//! With `S` the underlying price, `K` the strike and `P` the premium:
//!
//! | Metric | Definition |
//! |---|---|
//! | `ask_bid_spread` | `ask - bid` |
//! | `ask_bid_perc_diff` | `spread / ((ask + bid) / 2)` |
//! | `extrinsic_value` | `P` if `K >= S`, else `P - (S - K)` |
//! | `sample_perc_change` | assumed underlying move (default 1%) |
//! | `premium_change` | `delta * S * sample_perc_change` |
//! | `premium_perc_change` | `premium_change / P` |
//! | `iv_change` | `vega / P` |
//! | `non_dim_iv` | `iv_change / implied_volatility` |
//! | `theta_change` | `theta / P` |
//! | `break_even` | `theta_change * P * (delta / S)` |
//! | `delta_prem` | `delta / P` |
//! | `gamma_del` | `gamma / delta` |
//! | `ext_theta` | `extrinsic_value / theta` |
//!
//! The extrinsic value uses the call-style intrinsic comparison for both
//! calls and puts.
//!
//! A zero denominator is reported as `ContractError::UndefinedMetric`; no
//! infinities or NaNs are produced from zero Greeks or a zero premium.

use serde::Serialize;

use crate::contract::ContractSpec;
use crate::market_data::MarketSnapshot;
use crate::types::{ContractError, ContractResult};

/// Assumed underlying move used for `premium_change` (1%).
pub const DEFAULT_SAMPLE_MOVE: f64 = 0.01;

/// Derived ratios for one contract at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSet {
    /// Ask minus bid
    pub ask_bid_spread: f64,
    /// Spread as a fraction of the mid quote
    pub ask_bid_perc_diff: f64,
    /// Premium not explained by intrinsic value
    pub extrinsic_value: f64,
    /// Assumed fractional underlying move
    pub sample_perc_change: f64,
    /// Premium change implied by delta for the sample move
    pub premium_change: f64,
    /// `premium_change` as a fraction of premium
    pub premium_perc_change: f64,
    /// Vega as a fraction of premium
    pub iv_change: f64,
    /// `iv_change` normalised by implied volatility
    pub non_dim_iv: f64,
    /// One-day theta as a fraction of premium
    pub theta_change: f64,
    /// Daily underlying move needed to offset one day of decay (approximate)
    pub break_even: f64,
    /// Delta per unit premium
    pub delta_prem: f64,
    /// Gamma per unit delta
    pub gamma_del: f64,
    /// Extrinsic value per unit theta
    pub ext_theta: f64,
}

impl MetricSet {
    /// Field names in display order.
    pub const FIELD_NAMES: [&'static str; 13] = [
        "ask_bid_spread",
        "ask_bid_perc_diff",
        "extrinsic_value",
        "sample_perc_change",
        "premium_change",
        "premium_perc_change",
        "iv_change",
        "non_dim_iv",
        "theta_change",
        "break_even",
        "delta_prem",
        "gamma_del",
        "ext_theta",
    ];

    /// Name/value pairs in display order.
    pub fn fields(&self) -> [(&'static str, f64); 13] {
        let values = [
            self.ask_bid_spread,
            self.ask_bid_perc_diff,
            self.extrinsic_value,
            self.sample_perc_change,
            self.premium_change,
            self.premium_perc_change,
            self.iv_change,
            self.non_dim_iv,
            self.theta_change,
            self.break_even,
            self.delta_prem,
            self.gamma_del,
            self.ext_theta,
        ];
        std::array::from_fn(|i| (Self::FIELD_NAMES[i], values[i]))
    }
}

/// Computes [`MetricSet`]s from snapshots.
///
/// Holds only the assumed sample move; computation is otherwise a pure
/// function of its inputs.
///
/// # Examples
/// ```
/// use compare_core::contract::parse;
/// use compare_core::market_data::MarketSnapshot;
/// use compare_core::metrics::MetricsEngine;
///
/// let spec = parse("SPY 06-16-2023 400C").unwrap();
/// let snapshot = MarketSnapshot {
///     premium: 10.0, bid: 9.8, ask: 10.2, underlying_price: 410.0,
///     delta: 0.55, theta: -0.2, gamma: 0.02, vega: 0.3, implied_volatility: 0.25,
/// };
/// let metrics = MetricsEngine::default().compute(&spec, &snapshot).unwrap();
/// assert!((metrics.delta_prem - 0.055).abs() < 1e-12);
/// assert_eq!(metrics.extrinsic_value, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsEngine {
    sample_move: f64,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_MOVE)
    }
}

impl MetricsEngine {
    /// Creates an engine using `sample_move` as the assumed underlying move.
    pub fn new(sample_move: f64) -> Self {
        Self { sample_move }
    }

    /// Assumed fractional underlying move.
    pub fn sample_move(&self) -> f64 {
        self.sample_move
    }

    /// Computes all ratios for `spec` at `snapshot`.
    ///
    /// # Errors
    /// `ContractError::UndefinedMetric` when the mid quote, premium, implied
    /// volatility, underlying price, delta or theta is exactly zero.
    pub fn compute(&self, spec: &ContractSpec, snapshot: &MarketSnapshot) -> ContractResult<MetricSet> {
        let s = snapshot;

        let ask_bid_spread = s.ask - s.bid;
        let ask_bid_perc_diff = ratio("ask_bid_perc_diff", ask_bid_spread, s.mid(), "mid quote")?;

        let extrinsic_value = if spec.strike() >= s.underlying_price {
            s.premium
        } else {
            s.premium - (s.underlying_price - spec.strike())
        };

        let premium_change = s.delta * s.underlying_price * self.sample_move;
        let premium_perc_change = ratio("premium_perc_change", premium_change, s.premium, "premium")?;

        let iv_change = ratio("iv_change", s.vega, s.premium, "premium")?;
        let non_dim_iv = ratio("non_dim_iv", iv_change, s.implied_volatility, "implied_volatility")?;

        let theta_change = ratio("theta_change", s.theta, s.premium, "premium")?;
        let break_even = theta_change
            * s.premium
            * ratio("break_even", s.delta, s.underlying_price, "underlying_price")?;

        Ok(MetricSet {
            ask_bid_spread,
            ask_bid_perc_diff,
            extrinsic_value,
            sample_perc_change: self.sample_move,
            premium_change,
            premium_perc_change,
            iv_change,
            non_dim_iv,
            theta_change,
            break_even,
            delta_prem: ratio("delta_prem", s.delta, s.premium, "premium")?,
            gamma_del: ratio("gamma_del", s.gamma, s.delta, "delta")?,
            ext_theta: ratio("ext_theta", extrinsic_value, s.theta, "theta")?,
        })
    }
}

/// Computes `spec`'s metrics with the default sample move.
pub fn compute(spec: &ContractSpec, snapshot: &MarketSnapshot) -> ContractResult<MetricSet> {
    MetricsEngine::default().compute(spec, snapshot)
}

#[inline]
fn ratio(
    metric: &'static str,
    numerator: f64,
    denominator: f64,
    denominator_name: &'static str,
) -> ContractResult<f64> {
    if denominator == 0.0 {
        return Err(ContractError::UndefinedMetric {
            metric,
            denominator: denominator_name,
        });
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::parse;
    use approx::assert_relative_eq;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            premium: 10.0,
            bid: 9.8,
            ask: 10.2,
            underlying_price: 410.0,
            delta: 0.55,
            theta: -0.2,
            gamma: 0.02,
            vega: 0.3,
            implied_volatility: 0.25,
        }
    }

    #[test]
    fn test_reference_example() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();

        assert_relative_eq!(m.ask_bid_spread, 0.4, epsilon = 1e-12);
        assert_relative_eq!(m.ask_bid_perc_diff, 0.04, epsilon = 1e-12);
        assert_relative_eq!(m.extrinsic_value, 0.0, epsilon = 1e-12);
        assert_eq!(m.sample_perc_change, 0.01);
        assert_relative_eq!(m.premium_change, 2.255, epsilon = 1e-12);
        assert_relative_eq!(m.premium_perc_change, 0.2255, epsilon = 1e-12);
        assert_relative_eq!(m.iv_change, 0.03, epsilon = 1e-12);
        assert_relative_eq!(m.non_dim_iv, 0.12, epsilon = 1e-12);
        assert_relative_eq!(m.theta_change, -0.02, epsilon = 1e-12);
        assert_relative_eq!(m.break_even, -0.2 * 0.55 / 410.0, epsilon = 1e-12);
        assert_relative_eq!(m.delta_prem, 0.055, epsilon = 1e-12);
        assert_relative_eq!(m.gamma_del, 0.0364, epsilon = 1e-4);
        assert_relative_eq!(m.ext_theta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_is_reproducible() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let a = compute(&spec, &snapshot()).unwrap();
        let b = compute(&spec, &snapshot()).unwrap();
        for ((_, x), (_, y)) in a.fields().into_iter().zip(b.fields()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_changed_snapshot_changes_metrics() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let a = compute(&spec, &snapshot()).unwrap();
        let b = compute(
            &spec,
            &MarketSnapshot {
                premium: 12.0,
                ..snapshot()
            },
        )
        .unwrap();
        assert_ne!(a.delta_prem, b.delta_prem);
        assert_relative_eq!(b.extrinsic_value, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_spread_gives_zero_perc_diff() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let m = compute(
            &spec,
            &MarketSnapshot {
                bid: 10.0,
                ask: 10.0,
                ..snapshot()
            },
        )
        .unwrap();
        assert_eq!(m.ask_bid_spread, 0.0);
        assert_eq!(m.ask_bid_perc_diff, 0.0);
    }

    #[test]
    fn test_extrinsic_at_the_money_equals_premium() {
        let spec = parse("SPY 06-16-2023 410C").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();
        assert_eq!(m.extrinsic_value, 10.0);
    }

    #[test]
    fn test_extrinsic_out_of_the_money_call_equals_premium() {
        let spec = parse("SPY 06-16-2023 420C").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();
        assert_eq!(m.extrinsic_value, 10.0);
    }

    #[test]
    fn test_put_uses_call_style_intrinsic_comparison() {
        // Strike below spot: intrinsic subtracted even though a put is out of the money.
        let spec = parse("SPY 06-16-2023 405P").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();
        assert_relative_eq!(m.extrinsic_value, 5.0, epsilon = 1e-12);

        let spec = parse("SPY 06-16-2023 415P").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();
        assert_eq!(m.extrinsic_value, 10.0);
    }

    #[test]
    fn test_custom_sample_move() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let m = MetricsEngine::new(0.02).compute(&spec, &snapshot()).unwrap();
        assert_eq!(m.sample_perc_change, 0.02);
        assert_relative_eq!(m.premium_change, 4.51, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_denominators_are_undefined() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let cases = [
            (
                MarketSnapshot {
                    premium: 0.0,
                    ..snapshot()
                },
                "premium",
            ),
            (
                MarketSnapshot {
                    delta: 0.0,
                    ..snapshot()
                },
                "delta",
            ),
            (
                MarketSnapshot {
                    theta: 0.0,
                    ..snapshot()
                },
                "theta",
            ),
            (
                MarketSnapshot {
                    implied_volatility: 0.0,
                    ..snapshot()
                },
                "implied_volatility",
            ),
            (
                MarketSnapshot {
                    bid: 0.0,
                    ask: 0.0,
                    ..snapshot()
                },
                "mid quote",
            ),
            (
                MarketSnapshot {
                    underlying_price: 0.0,
                    ..snapshot()
                },
                "underlying_price",
            ),
        ];

        for (snap, expected) in cases {
            match compute(&spec, &snap) {
                Err(ContractError::UndefinedMetric { denominator, .. }) => {
                    assert_eq!(denominator, expected)
                }
                other => panic!("expected UndefinedMetric({}), got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_fields_order_matches_names() {
        let spec = parse("SPY 06-16-2023 400C").unwrap();
        let m = compute(&spec, &snapshot()).unwrap();
        let fields = m.fields();
        assert_eq!(fields[0], ("ask_bid_spread", m.ask_bid_spread));
        assert_eq!(fields[12], ("ext_theta", m.ext_theta));
        for (i, (name, _)) in fields.iter().enumerate() {
            assert_eq!(*name, MetricSet::FIELD_NAMES[i]);
        }
    }
}
