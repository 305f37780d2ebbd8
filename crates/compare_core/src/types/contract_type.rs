//! Call/put contract type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of option contract.
///
/// Decoded from the single-letter code at the end of a contract string.
/// Only `C` and `P` (case-insensitive) are recognised; anything else is
/// rejected rather than defaulted to one branch.
///
/// # Examples
/// ```
/// use compare_core::types::ContractType;
///
/// assert_eq!(ContractType::from_code('c'), Some(ContractType::Call));
/// assert_eq!(ContractType::from_code('P'), Some(ContractType::Put));
/// assert_eq!(ContractType::from_code('X'), None);
/// assert_eq!(ContractType::Put.code(), 'P');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Call option
    #[serde(rename = "C", alias = "c", alias = "call", alias = "CALL")]
    Call,
    /// Put option
    #[serde(rename = "P", alias = "p", alias = "put", alias = "PUT")]
    Put,
}

impl ContractType {
    /// Decodes a contract-type code, folding case.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(ContractType::Call),
            'P' => Some(ContractType::Put),
            _ => None,
        }
    }

    /// Returns the single-letter code.
    #[inline]
    pub fn code(&self) -> char {
        match self {
            ContractType::Call => 'C',
            ContractType::Put => 'P',
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                ContractType::from_code(c).ok_or_else(|| format!("Unknown contract type: {}", s))
            }
            _ => match s.to_ascii_lowercase().as_str() {
                "call" => Ok(ContractType::Call),
                "put" => Ok(ContractType::Put),
                _ => Err(format!("Unknown contract type: {}", s)),
            },
        }
    }
}
