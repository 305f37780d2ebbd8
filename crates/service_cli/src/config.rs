//! Configuration management
//!
//! Handles loading configuration from a TOML file, environment variables and
//! command-line flags.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file
//! 4. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use adapter_feeds::{FeedSource, DEFAULT_TIMEOUT_SECS};
use compare_core::baseline::{DEFAULT_REFERENCE_TICKER, DEFAULT_SCALING};
use compare_core::metrics::DEFAULT_SAMPLE_MOVE;
use serde::Deserialize;
use thiserror::Error;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "compare-options.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid market data source: {0}. Must be one of: file, http")]
    InvalidSource(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Kind of market data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// JSON market data document
    #[default]
    File,
    /// HTTP quote service
    Http,
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "http" => Ok(SourceKind::Http),
            _ => Err(ConfigError::InvalidSource(s.to_string())),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Http => write!(f, "http"),
        }
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_source<'de, D>(deserializer: D) -> Result<SourceKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    SourceKind::from_str(&s).map_err(serde::de::Error::custom)
}

/// `[market_data]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Which provider to use
    #[serde(deserialize_with = "deserialize_source")]
    pub source: SourceKind,
    /// Market data document (file source)
    pub path: Option<PathBuf>,
    /// Quote service base URL (http source)
    pub base_url: Option<String>,
    /// Per-request timeout in seconds (http source)
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::File,
            path: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MarketDataConfig {
    /// Feed description for the configured source.
    pub fn feed_source(&self) -> Result<FeedSource, ConfigError> {
        match self.source {
            SourceKind::File => self
                .path
                .clone()
                .map(FeedSource::File)
                .ok_or_else(missing_path_error),
            SourceKind::Http => self
                .base_url
                .clone()
                .map(|base_url| FeedSource::Http {
                    base_url,
                    timeout_secs: self.timeout_secs,
                })
                .ok_or_else(missing_url_error),
        }
    }

    fn problems(&self, errors: &mut Vec<String>) {
        match self.source {
            SourceKind::File => match &self.path {
                None => errors.push(missing_path_message()),
                Some(path) if path.as_os_str().is_empty() => {
                    errors.push("market_data.path cannot be empty".to_string())
                }
                Some(_) => {}
            },
            SourceKind::Http => {
                match &self.base_url {
                    None => errors.push(missing_url_message()),
                    Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                        errors.push(format!(
                            "Invalid market_data.base_url '{}'. Must start with http:// or https://",
                            url
                        ))
                    }
                    Some(_) => {}
                }
                if self.timeout_secs == 0 {
                    errors.push("market_data.timeout_secs must be greater than 0".to_string());
                }
            }
        }
    }
}

fn missing_path_message() -> String {
    "market_data.path is required when source = \"file\" (set it in the config, \
     COMPARE_MARKET_DATA or --market-data)"
        .to_string()
}

fn missing_url_message() -> String {
    "market_data.base_url is required when source = \"http\" (set it in the config \
     or COMPARE_QUOTE_URL)"
        .to_string()
}

fn missing_path_error() -> ConfigError {
    ConfigError::Validation(vec![missing_path_message()])
}

fn missing_url_error() -> ConfigError {
    ConfigError::Validation(vec![missing_url_message()])
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Underlying used for baseline contracts
    pub reference_ticker: String,
    /// Underlying move used for the sample metrics
    pub sample_move: f64,
    /// Moneyness dampening for the baseline match
    pub scaling: f64,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Market data source
    pub market_data: MarketDataConfig,
    /// CSV file receiving one row per rendered contract
    pub csv_log: Option<PathBuf>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            reference_ticker: DEFAULT_REFERENCE_TICKER.to_string(),
            sample_move: DEFAULT_SAMPLE_MOVE,
            scaling: DEFAULT_SCALING,
            log_level: LogLevel::Info,
            market_data: MarketDataConfig::default(),
            csv_log: None,
        }
    }
}

impl CompareConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `COMPARE_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ticker) = lookup("COMPARE_REFERENCE_TICKER") {
            self.reference_ticker = ticker;
        }

        if let Some(value) = lookup("COMPARE_SAMPLE_MOVE") {
            self.sample_move = parse_env_f64("COMPARE_SAMPLE_MOVE", &value)?;
        }

        if let Some(value) = lookup("COMPARE_SCALING") {
            self.scaling = parse_env_f64("COMPARE_SCALING", &value)?;
        }

        if let Some(level) = lookup("COMPARE_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }

        match (lookup("COMPARE_MARKET_DATA"), lookup("COMPARE_QUOTE_URL")) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::EnvError(
                    "COMPARE_MARKET_DATA and COMPARE_QUOTE_URL are both set; \
                     choose one market data source"
                        .to_string(),
                ))
            }
            (Some(path), None) => {
                self.market_data.source = SourceKind::File;
                self.market_data.path = Some(PathBuf::from(path));
            }
            (None, Some(url)) => {
                self.market_data.source = SourceKind::Http;
                self.market_data.base_url = Some(url);
            }
            (None, None) => {}
        }

        if let Some(path) = lookup("COMPARE_CSV_LOG") {
            self.csv_log = Some(PathBuf::from(path));
        }

        Ok(self)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(scaling) = cli.scaling {
            self.scaling = scaling;
        }
        if let Some(path) = &cli.market_data {
            self.market_data.source = SourceKind::File;
            self.market_data.path = Some(path.clone());
        }
        if let Some(path) = &cli.csv_log {
            self.csv_log = Some(path.clone());
        }
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
    }

    /// Validate the configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.reference_ticker.is_empty()
            || !self.reference_ticker.chars().all(|c| c.is_ascii_alphabetic())
        {
            errors.push(format!(
                "Invalid reference_ticker '{}'. Must be alphabetic",
                self.reference_ticker
            ));
        }

        if !self.sample_move.is_finite() {
            errors.push(format!(
                "sample_move must be finite, got {}",
                self.sample_move
            ));
        }

        if !self.scaling.is_finite() {
            errors.push(format!("scaling must be finite, got {}", self.scaling));
        }

        self.market_data.problems(&mut errors);

        if let Some(path) = &self.csv_log {
            if path.as_os_str().is_empty() {
                errors.push("csv_log cannot be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn parse_env_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{} must be a number, got '{}'", key, value)))
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path
    pub config_file: Option<PathBuf>,
    /// Scaling override
    pub scaling: Option<f64>,
    /// Market data document override
    pub market_data: Option<PathBuf>,
    /// CSV log override
    pub csv_log: Option<PathBuf>,
    /// Force debug logging
    pub verbose: bool,
}

/// Build configuration from all sources
///
/// An explicit `--config` file must exist. The default file is optional and
/// its absence means defaults.
pub fn build_config(cli: &CliArgs) -> Result<CompareConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an injectable environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<CompareConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match &cli.config_file {
        Some(path) => CompareConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                CompareConfig::from_file(default_path)?
            } else {
                CompareConfig::default()
            }
        }
    };

    let mut config = config.with_overrides_from(lookup)?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}
