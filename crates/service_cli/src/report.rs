//! Report rendering
//!
//! Every analysed contract is flattened into a [`ReportRecord`]: contract
//! fields, snapshot fields and metrics in one key-value view. The same
//! records back the text report, the JSON report and the CSV log.

use std::fmt;

use chrono::Local;
use clap::ValueEnum;
use compare_core::analysis::ContractAnalysis;
use compare_core::baseline::BaselineResult;
use compare_core::types::{ContractType, Expiry};
use serde::Serialize;

use crate::Result;

/// `ran_on` timestamp format, e.g. `Sat 17 Oct 2026, 09:15AM`.
pub const RAN_ON_FORMAT: &str = "%a %d %b %Y, %I:%M%p";

/// Label printed above the baseline block.
pub const BASELINE_LABEL: &str = "Baseline:";

/// Output format for the report on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// Which side of the comparison a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Contract given on the command line
    Primary,
    /// Synthesised reference contract
    Baseline,
}

/// Current local time in [`RAN_ON_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(RAN_ON_FORMAT).to_string()
}

/// Flat view of one analysed contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    /// Primary or baseline
    pub role: Role,
    /// Run timestamp in [`RAN_ON_FORMAT`]
    pub ran_on: String,
    /// Underlying ticker
    pub ticker: String,
    /// Expiration date
    pub expiry: Expiry,
    /// Strike price
    pub strike: f64,
    /// Call or put
    pub contract_type: ContractType,
    /// OCC option symbol
    pub occ_symbol: String,
    /// Option premium
    pub premium: f64,
    /// Best bid
    pub bid: f64,
    /// Best ask
    pub ask: f64,
    /// Underlying spot price
    pub underlying_price: f64,
    /// Delta
    pub delta: f64,
    /// Theta (daily decay)
    pub theta: f64,
    /// Gamma
    pub gamma: f64,
    /// Vega
    pub vega: f64,
    /// Implied volatility
    pub implied_volatility: f64,
    /// `ask - bid`
    pub ask_bid_spread: f64,
    /// Spread relative to the ask
    pub ask_bid_perc_diff: f64,
    /// Premium above intrinsic value
    pub extrinsic_value: f64,
    /// Underlying move the sample metrics assume
    pub sample_perc_change: f64,
    /// Premium change for the sample move
    pub premium_change: f64,
    /// `premium_change` relative to the premium
    pub premium_perc_change: f64,
    /// Implied volatility change implied by the sample move
    pub iv_change: f64,
    /// `iv_change` relative to implied volatility
    pub non_dim_iv: f64,
    /// Theta relative to the premium
    pub theta_change: f64,
    /// Daily underlying move offsetting one day of decay
    pub break_even: f64,
    /// Delta per unit premium
    pub delta_prem: f64,
    /// Gamma per unit delta
    pub gamma_del: f64,
    /// Extrinsic value per unit theta
    pub ext_theta: f64,
}

impl ReportRecord {
    /// Flattens `analysis`.
    pub fn new(role: Role, ran_on: &str, analysis: &ContractAnalysis) -> Self {
        let spec = &analysis.spec;
        let s = &analysis.snapshot;
        let m = &analysis.metrics;
        Self {
            role,
            ran_on: ran_on.to_string(),
            ticker: spec.ticker().to_string(),
            expiry: spec.expiry(),
            strike: spec.strike(),
            contract_type: spec.contract_type(),
            occ_symbol: spec.occ_symbol(),
            premium: s.premium,
            bid: s.bid,
            ask: s.ask,
            underlying_price: s.underlying_price,
            delta: s.delta,
            theta: s.theta,
            gamma: s.gamma,
            vega: s.vega,
            implied_volatility: s.implied_volatility,
            ask_bid_spread: m.ask_bid_spread,
            ask_bid_perc_diff: m.ask_bid_perc_diff,
            extrinsic_value: m.extrinsic_value,
            sample_perc_change: m.sample_perc_change,
            premium_change: m.premium_change,
            premium_perc_change: m.premium_perc_change,
            iv_change: m.iv_change,
            non_dim_iv: m.non_dim_iv,
            theta_change: m.theta_change,
            break_even: m.break_even,
            delta_prem: m.delta_prem,
            gamma_del: m.gamma_del,
            ext_theta: m.ext_theta,
        }
    }
}

/// Completed comparison, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    ran_on: String,
    primary: ContractAnalysis,
    baseline: Option<BaselineResult>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    primary: ReportRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    baseline: Option<JsonBaseline<'a>>,
}

#[derive(Serialize)]
struct JsonBaseline<'a> {
    reference_ticker: &'a str,
    reference_price: f64,
    target_strike: f64,
    moneyness: f64,
    scaling: f64,
    contract: ReportRecord,
}

impl Report {
    /// Creates a report stamped with `ran_on`.
    pub fn new(ran_on: String, primary: ContractAnalysis, baseline: Option<BaselineResult>) -> Self {
        Self {
            ran_on,
            primary,
            baseline,
        }
    }

    /// Run timestamp.
    pub fn ran_on(&self) -> &str {
        &self.ran_on
    }

    /// Primary contract analysis.
    pub fn primary(&self) -> &ContractAnalysis {
        &self.primary
    }

    /// Baseline result, when requested.
    pub fn baseline(&self) -> Option<&BaselineResult> {
        self.baseline.as_ref()
    }

    /// Primary record followed by the baseline record, if any.
    pub fn records(&self) -> Vec<ReportRecord> {
        let mut records = vec![ReportRecord::new(Role::Primary, &self.ran_on, &self.primary)];
        if let Some(baseline) = &self.baseline {
            records.push(ReportRecord::new(
                Role::Baseline,
                &self.ran_on,
                &baseline.analysis,
            ));
        }
        records
    }

    /// Renders the report in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => self.render_json(),
        }
    }

    fn render_json(&self) -> Result<String> {
        let document = JsonReport {
            primary: ReportRecord::new(Role::Primary, &self.ran_on, &self.primary),
            baseline: self.baseline.as_ref().map(|b| JsonBaseline {
                reference_ticker: b.matched.spec.ticker(),
                reference_price: b.matched.reference_price,
                target_strike: b.matched.target_strike,
                moneyness: b.matched.moneyness,
                scaling: b.matched.scaling,
                contract: ReportRecord::new(Role::Baseline, &self.ran_on, &b.analysis),
            }),
        };
        let mut json = serde_json::to_string_pretty(&document)?;
        json.push('\n');
        Ok(json)
    }
}

/// Four decimals, switching to exponent notation when that would hide the
/// magnitude.
fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-2..1e9).contains(&magnitude) {
        format!("{:.4}", value)
    } else {
        format!("{:.4e}", value)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, analysis: &ContractAnalysis, ran_on: &str) -> fmt::Result {
    let spec = &analysis.spec;
    let s = &analysis.snapshot;

    writeln!(f, "{} ({})", spec, spec.occ_symbol())?;
    writeln!(f, "Ran on {}", ran_on)?;
    writeln!(f)?;
    writeln!(f, "  {:<22}{:>14}", "Underlying price", format_value(s.underlying_price))?;
    writeln!(f, "  {:<22}{:>14}", "Premium", format_value(s.premium))?;
    writeln!(f, "  {:<22}{:>14}", "Bid", format_value(s.bid))?;
    writeln!(f, "  {:<22}{:>14}", "Ask", format_value(s.ask))?;
    writeln!(f, "  {:<22}{:>14}", "Delta", format_value(s.delta))?;
    writeln!(f, "  {:<22}{:>14}", "Theta", format_value(s.theta))?;
    writeln!(f, "  {:<22}{:>14}", "Gamma", format_value(s.gamma))?;
    writeln!(f, "  {:<22}{:>14}", "Vega", format_value(s.vega))?;
    writeln!(f, "  {:<22}{:>14}", "Implied volatility", format_value(s.implied_volatility))?;
    writeln!(f)?;

    for (name, value) in analysis.metrics.fields() {
        writeln!(f, "  {:<22}{:>14}", name, format_value(value))?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, &self.primary, &self.ran_on)?;

        if let Some(baseline) = &self.baseline {
            let matched = &baseline.matched;
            writeln!(f)?;
            writeln!(f, "{}", BASELINE_LABEL)?;
            writeln!(
                f,
                "{} at {:.2}, target strike {:.2} (moneyness {:+.2}%, scaling {})",
                matched.spec.ticker(),
                matched.reference_price,
                matched.target_strike,
                matched.moneyness * 100.0,
                matched.scaling
            )?;
            write_block(f, &baseline.analysis, &self.ran_on)?;
        }
        Ok(())
    }
}
