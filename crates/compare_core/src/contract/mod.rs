//! Structured contract identifier.
//!
//! This module provides:
//! - [`ContractSpec`]: validated ticker/expiry/strike/type identifier
//! - [`parser`]: conversion of free-text contract strings into a [`ContractSpec`]
//!
//! # Examples
//!
//! ```
//! use compare_core::contract::ContractSpec;
//! use compare_core::types::ContractType;
//!
//! let spec: ContractSpec = "spy 06-16-2023 400c".parse().unwrap();
//! assert_eq!(spec.ticker(), "SPY");
//! assert_eq!(spec.strike(), 400.0);
//! assert_eq!(spec.contract_type(), ContractType::Call);
//! assert_eq!(spec.to_string(), "SPY 06-16-2023 400C");
//! assert_eq!(spec.occ_symbol(), "SPY230616C00400000");
//! ```

pub mod parser;

pub use parser::parse;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::types::{ContractError, ContractField, ContractResult, ContractType, Expiry};

/// Validated option contract identifier.
///
/// Immutable once constructed. The ticker is upper-case ASCII alphabetic and
/// the strike is finite and positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSpec {
    ticker: String,
    expiry: Expiry,
    strike: f64,
    contract_type: ContractType,
}

impl ContractSpec {
    /// Creates a contract identifier from already-typed components.
    ///
    /// The ticker is upper-cased. Used by the baseline matcher to synthesise
    /// reference contracts.
    ///
    /// # Errors
    /// `ContractError::Validation` when the ticker is empty or not alphabetic,
    /// or the strike is not a finite positive number.
    pub fn new(
        ticker: &str,
        expiry: Expiry,
        strike: f64,
        contract_type: ContractType,
    ) -> ContractResult<Self> {
        let describe = || format!("{} {} {}{}", ticker, expiry, strike, contract_type);

        if !is_ticker(ticker) {
            return Err(ContractError::validation(ContractField::Ticker, ticker, describe()));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(ContractError::validation(
                ContractField::Strike,
                strike.to_string(),
                describe(),
            ));
        }

        Ok(Self {
            ticker: ticker.to_ascii_uppercase(),
            expiry,
            strike,
            contract_type,
        })
    }

    /// Underlying ticker (upper-case).
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Expiry date.
    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    /// Strike price.
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Call or put.
    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// Signed distance of the strike from `underlying_price`, as a fraction of it.
    ///
    /// Negative when the strike is below spot.
    ///
    /// # Errors
    /// `ContractError::UndefinedMetric` when `underlying_price` is zero.
    pub fn moneyness(&self, underlying_price: f64) -> ContractResult<f64> {
        if underlying_price == 0.0 {
            return Err(ContractError::UndefinedMetric {
                metric: "moneyness",
                denominator: "underlying_price",
            });
        }
        Ok((self.strike - underlying_price) / underlying_price)
    }

    /// OCC option symbol, e.g. `SPY230616C00400000`.
    ///
    /// Strike is encoded as thousandths, zero-padded to eight digits.
    pub fn occ_symbol(&self) -> String {
        let strike_milli = (self.strike * 1000.0).round() as u64;
        format!(
            "{}{}{}{:08}",
            self.ticker,
            self.expiry.to_occ(),
            self.contract_type.code(),
            strike_milli
        )
    }
}

impl fmt::Display for ContractSpec {
    /// Formats in the contract-string form accepted by [`parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{}",
            self.ticker, self.expiry, self.strike, self.contract_type
        )
    }
}

impl FromStr for ContractSpec {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

pub(crate) fn is_ticker(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}
