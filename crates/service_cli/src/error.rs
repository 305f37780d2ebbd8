//! CLI error types.

use adapter_feeds::FeedError;
use compare_core::ContractError;
use thiserror::Error;

use crate::config::ConfigError;

/// Any failure that aborts a `compare-options` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Parsing, market data, metric or baseline failure
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Market data source could not be set up
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV log could not be written
    #[error("CSV log error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON report could not be rendered
    #[error("JSON rendering error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use compare_core::types::ContractField;

    #[test]
    fn test_contract_error_passes_through() {
        let err: CliError = ContractError::validation(
            ContractField::Ticker,
            "SP1",
            "SP1 06-16-2023 400C",
        )
        .into();
        assert_eq!(
            err.to_string(),
            "Incorrectly specified ticker [SP1] in input string [SP1 06-16-2023 400C]"
        );
    }
}
