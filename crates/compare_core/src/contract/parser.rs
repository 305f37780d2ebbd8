//! Contract string parser.
//!
//! Accepts the strict positional form `"<TICKER> <MM-DD-YYYY> <STRIKE><TYPE>"`
//! with exactly one space between tokens:
//!
//! - first token: ticker (alphabetic)
//! - second token: expiry (`MM-DD-YYYY`, or `MM/DD/YYYY`)
//! - last token without its final character: strike (digits, optional decimal point)
//! - final character: contract-type code (`C` or `P`, any case)
//!
//! Character-class checks run on the raw token text before any numeric
//! conversion. Every failure is a `ContractError::Validation` naming the
//! field, the offending token and the original string.

use tracing::debug;

use super::{is_ticker, ContractSpec};
use crate::types::{ContractError, ContractField, ContractResult, ContractType, Expiry};

/// Number of space-separated tokens in a contract string.
const TOKEN_COUNT: usize = 3;

/// Parses a contract string into a validated [`ContractSpec`].
///
/// # Examples
/// ```
/// use compare_core::contract::parse;
/// use compare_core::types::{ContractField, ContractType};
///
/// let spec = parse("SPY 06-16-2023 400C").unwrap();
/// assert_eq!(spec.ticker(), "SPY");
/// assert_eq!(spec.expiry().month(), 6);
/// assert_eq!(spec.strike(), 400.0);
/// assert_eq!(spec.contract_type(), ContractType::Call);
///
/// let err = parse("SPY1 06-16-2023 400C").unwrap_err();
/// assert_eq!(err.field(), Some(ContractField::Ticker));
/// ```
///
/// # Errors
/// `ContractError::Validation` when the token layout is wrong, the ticker is
/// not alphabetic, the strike is not numeric or not positive, the type code is
/// not alphabetic or not one of `C`/`P`, or the expiry is not a valid date.
pub fn parse(raw: &str) -> ContractResult<ContractSpec> {
    let invalid = |field: ContractField, token: &str| ContractError::validation(field, token, raw);

    let tokens: Vec<&str> = raw.split(' ').collect();
    if tokens.len() != TOKEN_COUNT {
        return Err(invalid(ContractField::Contract, raw));
    }
    let (ticker, expiry, last) = (tokens[0], tokens[1], tokens[TOKEN_COUNT - 1]);

    let mut last_chars = last.chars();
    let code = last_chars
        .next_back()
        .ok_or_else(|| invalid(ContractField::Contract, raw))?;
    let strike = last_chars.as_str();

    if !is_ticker(ticker) {
        return Err(invalid(ContractField::Ticker, ticker));
    }
    if !is_numeric(strike) {
        return Err(invalid(ContractField::Strike, strike));
    }
    if !code.is_alphabetic() {
        return Err(invalid(ContractField::ContractType, &code.to_string()));
    }

    let expiry = Expiry::parse_mdy(expiry).ok_or_else(|| invalid(ContractField::Expiry, expiry))?;
    let contract_type = ContractType::from_code(code)
        .ok_or_else(|| invalid(ContractField::ContractType, &code.to_string()))?;

    let strike_value: f64 = strike
        .parse()
        .map_err(|_| invalid(ContractField::Strike, strike))?;
    if !strike_value.is_finite() || strike_value <= 0.0 {
        return Err(invalid(ContractField::Strike, strike));
    }

    let spec = ContractSpec {
        ticker: ticker.to_ascii_uppercase(),
        expiry,
        strike: strike_value,
        contract_type,
    };
    debug!(contract = %spec, "Parsed contract string");
    Ok(spec)
}

/// ASCII digits with at most one decimal point between digits.
fn is_numeric(s: &str) -> bool {
    let digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, frac)) => digits(whole) && digits(frac),
        None => digits(s),
    }
}
