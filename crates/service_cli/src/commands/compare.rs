//! Compare command implementation
//!
//! Analyses an already parsed contract and, on request, its baseline on the
//! reference underlying. Both analyses complete before anything is written,
//! so a failed baseline leaves stdout empty.

use std::io::Write;

use compare_core::analysis::analyse_contract;
use compare_core::baseline::{analyse_baseline, BaselineMatcher};
use compare_core::market_data::MarketDataProvider;
use compare_core::metrics::MetricsEngine;
use compare_core::ContractSpec;
use tracing::info;

use crate::config::CompareConfig;
use crate::csv_log;
use crate::report::{timestamp_now, OutputFormat, Report};
use crate::Result;

/// Run the compare command against the configured market data source
pub fn run(
    spec: ContractSpec,
    baseline: bool,
    format: OutputFormat,
    config: &CompareConfig,
) -> Result<()> {
    info!("Comparing contract...");
    info!("  Contract: {}", spec);
    info!("  Baseline: {}", baseline);
    info!("  Scaling: {}", config.scaling);

    let provider = config.market_data.feed_source()?.connect()?;

    let report = build_report(&*provider, spec, baseline, config)?;
    let rendered = report.render(format)?;

    if let Some(path) = &config.csv_log {
        csv_log::append(path, &report.records())?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    info!("Comparison complete");
    Ok(())
}

/// Analyses `spec` (and its baseline when `baseline` is set) using `provider`.
pub fn build_report<P: MarketDataProvider + ?Sized>(
    provider: &P,
    spec: ContractSpec,
    baseline: bool,
    config: &CompareConfig,
) -> Result<Report> {
    let engine = MetricsEngine::new(config.sample_move);
    let primary = analyse_contract(provider, &engine, spec)?;

    let baseline = if baseline {
        let matcher = BaselineMatcher::new(&config.reference_ticker)?;
        Some(analyse_baseline(
            provider,
            &engine,
            &matcher,
            &primary,
            config.scaling,
        )?)
    } else {
        None
    };

    Ok(Report::new(timestamp_now(), primary, baseline))
}
