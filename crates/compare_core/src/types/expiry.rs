//! Contract expiry date.
//!
//! This module provides:
//! - `Expiry`: Type-safe expiry wrapper around chrono::NaiveDate
//! - Parsing of the `MM-DD-YYYY` form used in contract strings
//!
//! # Examples
//!
//! ```
//! use compare_core::types::Expiry;
//!
//! let expiry = Expiry::parse_mdy("06-16-2023").unwrap();
//! assert_eq!(expiry.month(), 6);
//! assert_eq!(expiry.day(), 16);
//! assert_eq!(expiry.year(), 2023);
//! assert_eq!(expiry.to_string(), "06-16-2023");
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Separators accepted between month, day and year.
const SEPARATORS: [char; 2] = ['-', '/'];

/// Expiry date of an option contract.
///
/// Serialises transparently as an ISO 8601 date (`YYYY-MM-DD`), which is the
/// form used by market data documents. Displays in the `MM-DD-YYYY` form used
/// by contract strings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Expiry(NaiveDate);

impl Expiry {
    /// Creates an expiry from month, day and year components.
    ///
    /// Returns `None` when the components do not form a calendar date.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare_core::types::Expiry;
    ///
    /// assert!(Expiry::from_mdy(2, 29, 2024).is_some());
    /// assert!(Expiry::from_mdy(2, 30, 2024).is_none());
    /// ```
    pub fn from_mdy(month: u32, day: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Expiry)
    }

    /// Parses `MM-DD-YYYY` (or `MM/DD/YYYY`).
    ///
    /// All three parts must be ASCII digits and the year must have exactly
    /// four digits. Single-digit months and days are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare_core::types::Expiry;
    ///
    /// assert!(Expiry::parse_mdy("06/16/2023").is_some());
    /// assert!(Expiry::parse_mdy("6-16-2023").is_some());
    /// assert!(Expiry::parse_mdy("2023-06-16").is_none());
    /// assert!(Expiry::parse_mdy("06-16-23").is_none());
    /// ```
    pub fn parse_mdy(s: &str) -> Option<Self> {
        let sep = SEPARATORS.into_iter().find(|c| s.contains(*c))?;
        let parts: Vec<&str> = s.split(sep).collect();
        let [month, day, year] = parts[..] else {
            return None;
        };

        let all_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
        if !all_digits(month) || !all_digits(day) || !all_digits(year) {
            return None;
        }
        if month.len() > 2 || day.len() > 2 || year.len() != 4 {
            return None;
        }

        Self::from_mdy(month.parse().ok()?, day.parse().ok()?, year.parse().ok()?)
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Formats as ISO 8601 (`YYYY-MM-DD`).
    pub fn to_iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Formats as `YYMMDD`, the date field of an OCC option symbol.
    pub fn to_occ(&self) -> String {
        self.0.format("%y%m%d").to_string()
    }
}

impl From<NaiveDate> for Expiry {
    fn from(date: NaiveDate) -> Self {
        Expiry(date)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.month(), self.day(), self.year())
    }
}
