//! compare-options CLI
//!
//! ```text
//! compare-options "SPY 06-16-2023 400C" --market-data market.json
//! compare-options "AAPL 06-16-2023 190P" -b -s 0.25 --format json
//! ```
//!
//! The report goes to stdout and logs go to stderr. Any failure prints a
//! single error line on stderr and exits with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use compare_core::contract::parse;
use service_cli::commands;
use service_cli::config::{build_config, CliArgs, LogLevel};
use service_cli::report::OutputFormat;
use service_cli::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compare an option contract's sensitivities against a SPY baseline
#[derive(Parser)]
#[command(name = "compare-options")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Contract in standard syntax, e.g. 'SPY 06-16-2023 400C' (quote it)
    contract: String,

    /// Also report a baseline contract on the reference underlying (SPY) at
    /// the same expiry and comparable moneyness
    #[arg(short, long)]
    baseline: bool,

    /// Dampening applied to the contract's moneyness before it is carried
    /// over to the reference underlying [default: 0.5]
    #[arg(short, long, allow_negative_numbers = true)]
    scaling: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON market data document (overrides the configured source)
    #[arg(short, long)]
    market_data: Option<PathBuf>,

    /// Append one CSV row per reported contract to this file
    #[arg(long)]
    log_csv: Option<PathBuf>,

    /// Configuration file path [default: compare-options.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // A malformed contract is reported ahead of any configuration problem.
    let spec = parse(&cli.contract)?;

    let args = CliArgs {
        config_file: cli.config,
        scaling: cli.scaling,
        market_data: cli.market_data,
        csv_log: cli.log_csv,
        verbose: cli.verbose,
    };
    let config = build_config(&args)?;

    init_tracing(config.log_level);
    debug!(?config, "Configuration loaded");

    commands::compare::run(spec, cli.baseline, cli.format, &config)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here and must exit cleanly.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compare_core::types::ContractField;
    use service_cli::CliError;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["compare-options", "SPY 06-16-2023 400C"]).unwrap();
        assert_eq!(cli.contract, "SPY 06-16-2023 400C");
        assert!(!cli.baseline);
        assert!(cli.scaling.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "compare-options",
            "AAPL 06-16-2023 190P",
            "-b",
            "-s",
            "0.25",
            "-f",
            "json",
            "-m",
            "market.json",
        ])
        .unwrap();
        assert!(cli.baseline);
        assert_eq!(cli.scaling, Some(0.25));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.market_data, Some(PathBuf::from("market.json")));
    }

    #[test]
    fn test_negative_scaling_is_a_value() {
        let cli =
            Cli::try_parse_from(["compare-options", "SPY 06-16-2023 400C", "-s", "-0.5"]).unwrap();
        assert_eq!(cli.scaling, Some(-0.5));
    }

    #[test]
    fn test_contract_is_required() {
        assert!(Cli::try_parse_from(["compare-options"]).is_err());
    }

    #[test]
    fn test_bad_contract_reported_before_config() {
        // No market data source is configured, which alone would fail validation.
        let cli = Cli::try_parse_from(["compare-options", "SP1 06-16-2023 400C"]).unwrap();
        match run(cli).unwrap_err() {
            CliError::Contract(e) => assert_eq!(e.field(), Some(ContractField::Ticker)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_contract_type_reported_before_config() {
        let cli = Cli::try_parse_from(["compare-options", "SPY 06-16-2023 400X", "-s", "NaN"])
            .unwrap();
        match run(cli).unwrap_err() {
            CliError::Contract(e) => assert_eq!(e.field(), Some(ContractField::ContractType)),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
