//! Rate normalization between time bases.
//!
//! All arithmetic is done on [`Decimal`] so that ratios such as 1/60 and
//! 1/3600 behave identically on every platform and survive save/load.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::units::UnitRate;

/// Errors produced by rate conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateError {
    /// Unit outside the supported set (unknown name or numeric code).
    #[error("invalid unit rate: {0}")]
    InvalidUnit(String),
    /// Result does not fit the decimal range.
    #[error("rate conversion overflowed")]
    Overflow,
}

/// Number of seconds in one unit of `rate`.
pub fn seconds_per_unit(rate: UnitRate) -> Decimal {
    match rate {
        UnitRate::PerSecond => Decimal::ONE,
        UnitRate::PerMinute => Decimal::new(60, 0),
        UnitRate::PerHour => Decimal::new(3600, 0),
    }
}

/// Normalize a quantity expressed in `from` to units per second.
///
/// Example:
/// let q = to_per_second(Decimal::new(60, 0), UnitRate::PerMinute).unwrap();
/// assert_eq!(q, Decimal::ONE);
pub fn to_per_second(quantity: Decimal, from: UnitRate) -> Result<Decimal, RateError> {
    quantity
        .checked_div(seconds_per_unit(from))
        .ok_or(RateError::Overflow)
}

/// Express a per-second quantity in the `to` time base.
pub fn from_per_second(per_second: Decimal, to: UnitRate) -> Result<Decimal, RateError> {
    per_second
        .checked_mul(seconds_per_unit(to))
        .ok_or(RateError::Overflow)
}

/// Convert a quantity between time bases.
///
/// Same-unit conversion returns `quantity` untouched (value and scale), so
/// `convert(x, u, u) == x` holds even where a pass through per-second would
/// round.
pub fn convert(quantity: Decimal, from: UnitRate, to: UnitRate) -> Result<Decimal, RateError> {
    if from == to {
        return Ok(quantity);
    }
    let per_second = to_per_second(quantity, from)?;
    from_per_second(per_second, to)
}

/// Convert using numeric unit codes as received from an untyped boundary.
///
/// Codes outside the supported set fail with [`RateError::InvalidUnit`].
pub fn convert_raw(quantity: Decimal, from: i64, to: i64) -> Result<Decimal, RateError> {
    let from = UnitRate::try_from(from)?;
    let to = UnitRate::try_from(to)?;
    convert(quantity, from, to)
}

/// A quantity tagged with its time base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Amount per `unit`.
    pub quantity: Decimal,
    /// Time base of `quantity`.
    pub unit: UnitRate,
}

impl Rate {
    /// Build a rate from a quantity and its unit.
    pub fn new(quantity: Decimal, unit: UnitRate) -> Self {
        Self { quantity, unit }
    }

    /// Same flow expressed in another time base.
    pub fn to(self, unit: UnitRate) -> Result<Rate, RateError> {
        Ok(Rate::new(convert(self.quantity, self.unit, unit)?, unit))
    }

    /// Quantity normalized to units per second.
    pub fn per_second(self) -> Result<Decimal, RateError> {
        to_per_second(self.quantity, self.unit)
    }

    /// Order two rates by their per-second flow, regardless of unit.
    pub fn cmp_normalized(&self, other: &Rate) -> Result<Ordering, RateError> {
        if self.unit == other.unit {
            return Ok(self.quantity.cmp(&other.quantity));
        }
        Ok(self.per_second()?.cmp(&other.per_second()?))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantity.normalize(), self.unit.label())
    }
}
