//! Locale formatting for dates and money.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The date pattern of the `id-ID` locale, e.g. `1/11/2025`.
pub const DEFAULT_DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Patterns tried, in order, after the configured one when reading dates from a file.
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Formats and parses calendar dates with a `chrono` strftime pattern.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFormat(String);

impl Default for DateFormat {
    fn default() -> Self {
        Self(DEFAULT_DATE_FORMAT.to_string())
    }
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Renders the calendar date of `date`. Time of day is dropped unless the pattern asks for it.
    pub fn format(&self, date: NaiveDateTime) -> String {
        date.format(&self.0).to_string()
    }

    /// Parses `s` as a date, trying the configured pattern first and then a list of common date
    /// and date-time layouts. Dates without a time are placed at midnight.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let date_only = std::iter::once(self.pattern())
            .chain(FALLBACK_DATE_FORMATS.iter().copied())
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        if date_only.is_some() {
            return date_only;
        }
        std::iter::once(self.pattern())
            .chain(FALLBACK_DATETIME_FORMATS.iter().copied())
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }

    /// Converts a spreadsheet serial date (days since 1899-12-30) into a date-time.
    pub fn from_serial(serial: Decimal) -> Option<NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let millis = (serial * Decimal::from(86_400_000)).round().to_i64()?;
        epoch.checked_add_signed(Duration::try_milliseconds(millis)?)
    }
}

/// Formats whole-unit amounts of money with a currency symbol and thousands separators and no
/// decimal places, e.g. `Rp 8.000.000`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    symbol: String,
    thousands_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("Rp", ".")
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, thousands_separator: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            thousands_separator: thousands_separator.into(),
        }
    }

    pub fn format(&self, value: i128) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let grouped = format_num::format_num!(",.0", value.unsigned_abs() as f64);
        let grouped = if self.thousands_separator == "," {
            grouped
        } else {
            grouped.replace(',', &self.thousands_separator)
        };
        if self.symbol.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{} {grouped}", self.symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_default_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 1)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(DateFormat::default().format(date), "1/11/2025");
    }

    #[test]
    fn test_parse_default_pattern_is_day_first() {
        assert_eq!(DateFormat::default().parse("2/11/2025"), Some(ymd(2025, 11, 2)));
    }

    #[test]
    fn test_parse_fallbacks() {
        let fmt = DateFormat::default();
        assert_eq!(fmt.parse("2025-11-05"), Some(ymd(2025, 11, 5)));
        assert_eq!(fmt.parse("11/25/2025"), Some(ymd(2025, 11, 25)));
        assert_eq!(
            fmt.parse("2025-11-05 08:15:00"),
            NaiveDate::from_ymd_opt(2025, 11, 5)
                .unwrap()
                .and_hms_opt(8, 15, 0)
        );
        assert_eq!(
            fmt.parse("2025-11-05T08:15:00+07:00"),
            NaiveDate::from_ymd_opt(2025, 11, 5)
                .unwrap()
                .and_hms_opt(8, 15, 0)
        );
    }

    #[test]
    fn test_parse_custom_pattern() {
        let fmt = DateFormat::new("%m/%d/%Y");
        assert_eq!(fmt.parse("03/04/2025"), Some(ymd(2025, 3, 4)));
        assert_eq!(fmt.format(ymd(2025, 3, 4)), "03/04/2025");
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(DateFormat::default().parse("kemarin"), None);
        assert_eq!(DateFormat::default().parse("  "), None);
    }

    #[test]
    fn test_from_serial() {
        let serial = Decimal::from_str("45962").unwrap();
        assert_eq!(DateFormat::from_serial(serial), Some(ymd(2025, 11, 1)));
    }

    #[test]
    fn test_currency_format() {
        let rupiah = CurrencyFormat::default();
        assert_eq!(rupiah.format(8_000_000), "Rp 8.000.000");
        assert_eq!(rupiah.format(0), "Rp 0");
        assert_eq!(rupiah.format(-150_000), "-Rp 150.000");
    }

    #[test]
    fn test_currency_format_custom() {
        let plain = CurrencyFormat::new("", ",");
        assert_eq!(plain.format(1_234_567), "1,234,567");
    }
}
