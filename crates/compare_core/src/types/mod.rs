//! Core value types.
//!
//! This module provides:
//! - `contract_type`: Call/put enumeration decoded from contract strings
//! - `expiry`: Expiry date wrapper around chrono::NaiveDate
//! - `error`: Structured error type for parsing, metrics and baseline matching
//!
//! # Re-exports
//!
//! - [`ContractType`] from `contract_type`
//! - [`Expiry`] from `expiry`
//! - [`ContractError`], [`ContractField`], [`ContractResult`] from `error`

pub mod contract_type;
pub mod error;
pub mod expiry;

pub use contract_type::ContractType;
pub use error::{ContractError, ContractField, ContractResult};
pub use expiry::Expiry;
