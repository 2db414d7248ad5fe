//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always non-negative and carry exactly two decimal places, so
//! they map one-to-one onto an integer number of cents for storage.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number, got {0:?}")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount does not fit in the storage representation.
    #[error("price is out of range")]
    OutOfRange,
}

/// A non-negative monetary amount with two-decimal precision.
///
/// ## Examples
///
/// ```
/// use oliv_core::Price;
///
/// let price = Price::parse("499.0").unwrap();
/// assert_eq!(price.to_string(), "499.00");
/// assert_eq!(price.cents(), 49_900);
/// assert_eq!(price.times(2).to_string(), "998.00");
///
/// assert!(Price::parse("free").is_err());
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in the currency's standard unit, always at scale 2.
    amount: Decimal,
}

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self {
        amount: Decimal::ZERO,
    };

    /// Create a price from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self {
            amount: Decimal::new(cents, 2),
        })
    }

    /// Parse a price from user input such as `"499"`, `"499.0"` or `"12.345"`.
    ///
    /// Surrounding whitespace is ignored. Values with more than two decimal
    /// places are rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the input is not a decimal number,
    /// `PriceError::Negative` if it is below zero, and
    /// `PriceError::OutOfRange` if it cannot be stored as cents.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::from_decimal(amount)
    }

    /// Create a price from a decimal amount, normalizing it to two places.
    ///
    /// # Errors
    ///
    /// Same as [`Price::parse`], minus the number check.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative);
        }
        let mut amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.set_sign_positive(true);
        amount.rescale(2);
        i64::try_from(amount.mantissa()).map_err(|_| PriceError::OutOfRange)?;
        Ok(Self { amount })
    }

    /// The amount as an integer number of cents.
    #[must_use]
    pub fn cents(&self) -> i64 {
        let mut amount = self.amount;
        amount.rescale(2);
        i64::try_from(amount.mantissa()).unwrap_or(i64::MAX)
    }

    /// This price multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.amount)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self {
            amount: iter.map(|p| p.amount).sum(),
        }
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
