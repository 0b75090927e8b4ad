//! Amount type for handling whole-unit monetary values.
//!
//! Amounts are stored as unsigned integers of whole currency units (e.g. Rupiah) so that totals are
//! exact. Parsing accepts an optional `Rp` or `IDR` currency prefix and a fractional part, which is
//! rounded to the nearest whole unit.

use crate::error::{ErrorType, IntoResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a non-negative amount of money in whole currency units.
///
/// # Examples
///
/// ```
/// # use keuangan::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("Rp 5000000").unwrap();
/// assert_eq!(amount.value(), 5_000_000);
/// ```
///
/// Fractions are rounded half away from zero:
/// ```
/// # use keuangan::model::Amount;
/// # use std::str::FromStr;
/// assert_eq!(Amount::from_str("1500.5").unwrap().value(), 1501);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the number of whole currency units.
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parses user input for an add operation. Empty, zero, negative and non-numeric input are
    /// all rejected with `ErrorType::InvalidAmount`, as is a fraction that rounds to zero.
    pub fn parse_positive(s: &str) -> crate::Result<Self> {
        let trimmed = s.trim();
        let value = parse_decimal(trimmed)
            .map_err(|e| anyhow::anyhow!("Enter a valid amount greater than zero: {e}"))
            .pub_result(ErrorType::InvalidAmount)?;
        if value <= Decimal::ZERO {
            return Err(crate::Error::msg(
                ErrorType::InvalidAmount,
                "Enter a valid amount greater than zero",
            ));
        }
        let amount = Amount::from_decimal(value)
            .map_err(|e| anyhow::anyhow!("Enter a valid amount greater than zero: {e}"))
            .pub_result(ErrorType::InvalidAmount)?;
        if amount.is_zero() {
            return Err(crate::Error::msg(
                ErrorType::InvalidAmount,
                format!("'{trimmed}' rounds to zero, amounts are whole currency units"),
            ));
        }
        Ok(amount)
    }

    /// Converts a decimal into an amount, rounding to whole units. Negative values are an error.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .to_u64()
            .map(Amount)
            .ok_or_else(|| AmountError::OutOfRange(value.to_string()))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Invalid(String, rust_decimal::Error),
    Negative(String),
    OutOfRange(String),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Invalid(s, e) => write!(f, "'{s}' is not a number: {e}"),
            AmountError::Negative(s) => write!(f, "'{s}' is negative"),
            AmountError::OutOfRange(s) => write!(f, "'{s}' is too large"),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Invalid(_, e) => Some(e),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }
        Amount::from_decimal(parse_decimal(trimmed)?)
    }
}

/// Currency prefixes accepted in front of a number, matched ignoring case.
const CURRENCY_PREFIXES: [&str; 2] = ["Rp", "IDR"];

/// Parses a trimmed number with an optional currency prefix, e.g. `Rp 1500` or `Rp.1500`.
fn parse_decimal(s: &str) -> Result<Decimal, AmountError> {
    let number = CURRENCY_PREFIXES
        .iter()
        .find_map(|prefix| {
            s.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| s[prefix.len()..].trim_start_matches('.').trim_start())
        })
        .unwrap_or(s);
    Decimal::from_str(number).map_err(|e| AmountError::Invalid(s.to_string(), e))
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Amount)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
