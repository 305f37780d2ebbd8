//! Error types for structured error handling.
//!
//! This module provides:
//! - `ContractError`: every failure the parsing, metrics and baseline stages can raise
//! - `ContractField`: the input field a validation failure refers to
//!
//! No error is retried anywhere in the core; each variant carries enough
//! context (offending field, token and original input) to fix the input.

use std::fmt;
use thiserror::Error;

/// Field of a contract string that failed validation.
///
/// # Examples
/// ```
/// use compare_core::types::ContractField;
///
/// assert_eq!(ContractField::Ticker.to_string(), "ticker");
/// assert_eq!(ContractField::ContractType.to_string(), "contract type");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractField {
    /// Whole contract string (token layout)
    Contract,
    /// Underlying ticker token
    Ticker,
    /// Expiry date token
    Expiry,
    /// Strike price (last token without its final character)
    Strike,
    /// Contract-type code (final character)
    ContractType,
    /// Baseline scaling factor
    Scaling,
}

impl fmt::Display for ContractField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractField::Contract => "contract",
            ContractField::Ticker => "ticker",
            ContractField::Expiry => "expiry",
            ContractField::Strike => "strike",
            ContractField::ContractType => "contract type",
            ContractField::Scaling => "scaling",
        };
        f.write_str(name)
    }
}

/// Categorised contract analysis errors.
///
/// # Variants
/// - `Validation`: malformed token in the input contract string
/// - `DataUnavailable`: the market data provider could not resolve a contract or underlying
/// - `UndefinedMetric`: a ratio's denominator is exactly zero
/// - `NoStrikesAvailable`: the reference underlying lists no strikes for the expiry
/// - `NoBaselineData`: the reference underlying's own data could not be retrieved
///
/// # Examples
/// ```
/// use compare_core::types::{ContractError, ContractField};
///
/// let err = ContractError::validation(ContractField::Ticker, "SP1", "SP1 06-16-2023 400C");
/// assert_eq!(
///     err.to_string(),
///     "Incorrectly specified ticker [SP1] in input string [SP1 06-16-2023 400C]"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// Malformed token in the input contract string.
    #[error("Incorrectly specified {field} [{token}] in input string [{input}]")]
    Validation {
        /// Field the token was parsed as
        field: ContractField,
        /// Offending token text
        token: String,
        /// Original input string
        input: String,
    },

    /// Provider could not resolve the requested contract or underlying.
    #[error("Market data unavailable for {what}: {reason}")]
    DataUnavailable {
        /// Description of the requested contract or underlying
        what: String,
        /// Provider-supplied reason
        reason: String,
    },

    /// A ratio's denominator is exactly zero.
    #[error("Metric {metric} is undefined: {denominator} is zero")]
    UndefinedMetric {
        /// Metric being computed
        metric: &'static str,
        /// Input that was zero
        denominator: &'static str,
    },

    /// Reference underlying lists no strikes for the expiry.
    #[error("No strikes available for {ticker} expiring {expiry}")]
    NoStrikesAvailable {
        /// Reference underlying ticker
        ticker: String,
        /// Expiry in MM-DD-YYYY form
        expiry: String,
    },

    /// Reference underlying's own data could not be retrieved.
    #[error("No baseline data for {ticker}: {reason}")]
    NoBaselineData {
        /// Reference underlying ticker
        ticker: String,
        /// Underlying failure
        reason: String,
    },
}

impl ContractError {
    /// Create a validation error for `field`.
    pub fn validation(field: ContractField, token: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Validation {
            field,
            token: token.into(),
            input: input.into(),
        }
    }

    /// Create a data-unavailable error.
    pub fn data_unavailable(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a no-baseline-data error.
    pub fn no_baseline_data(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoBaselineData {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Returns the offending field for validation errors.
    pub fn field(&self) -> Option<ContractField> {
        match self {
            ContractError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result alias used throughout the core.
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_names_token_and_input() {
        let err = ContractError::validation(ContractField::Strike, "40O", "SPY 06-16-2023 40OC");
        let msg = err.to_string();
        assert!(msg.contains("strike"));
        assert!(msg.contains("[40O]"));
        assert!(msg.contains("[SPY 06-16-2023 40OC]"));
    }

    #[test]
    fn test_field_accessor() {
        let err = ContractError::validation(ContractField::Expiry, "13-01-2023", "X 13-01-2023 1C");
        assert_eq!(err.field(), Some(ContractField::Expiry));

        let err = ContractError::UndefinedMetric {
            metric: "delta_prem",
            denominator: "premium",
        };
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_undefined_metric_display() {
        let err = ContractError::UndefinedMetric {
            metric: "gamma_del",
            denominator: "delta",
        };
        assert_eq!(err.to_string(), "Metric gamma_del is undefined: delta is zero");
    }

    #[test]
    fn test_baseline_errors_display() {
        let err = ContractError::NoStrikesAvailable {
            ticker: "SPY".to_string(),
            expiry: "06-16-2023".to_string(),
        };
        assert!(err.to_string().contains("SPY expiring 06-16-2023"));

        let err = ContractError::no_baseline_data("SPY", "quote service down");
        assert!(err.to_string().contains("quote service down"));
    }
}
