//! compare-options: option contract comparison from the command line
//!
//! Analyses one option contract from a market data source and, optionally,
//! a baseline contract on a reference underlying at comparable moneyness.
//!
//! - `config`: TOML, environment and CLI configuration layering
//! - `commands`: command implementations
//! - `report`: text and JSON rendering of the merged contract view
//! - `csv_log`: append-only CSV run log

pub mod commands;
pub mod config;
pub mod csv_log;
pub mod error;
pub mod report;

pub use error::{CliError, Result};
