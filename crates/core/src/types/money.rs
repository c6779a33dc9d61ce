//! Decimal money helpers.
//!
//! Amounts are plain [`Decimal`] values in the store currency; Shopdesk
//! never converts between currencies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors produced when constructing a [`Percentage`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PercentageError {
    /// The value lies outside `0..=100`.
    #[error("percentage must be between 0 and 100, got {0}")]
    OutOfRange(Decimal),
}

/// A discount percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Create a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`PercentageError::OutOfRange`] outside `0..=100`.
    pub fn new(value: Decimal) -> Result<Self, PercentageError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PercentageError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// The raw percentage value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Price after applying this discount, rounded to cents.
    #[must_use]
    pub fn apply(self, amount: Decimal) -> Decimal {
        let factor = (Decimal::ONE_HUNDRED - self.0) / Decimal::ONE_HUNDRED;
        amount.saturating_mul(factor).round_dp(2)
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = PercentageError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
