//! Time-base units and built-in ingredient kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rate::RateError;

/// Time base for every quantity and speed field of a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRate {
    /// Units per second.
    PerSecond,
    /// Units per minute.
    #[default]
    PerMinute,
    /// Units per hour.
    PerHour,
}

impl UnitRate {
    /// Every unit, ordered from the shortest time base to the longest.
    pub const ALL: [UnitRate; 3] = [UnitRate::PerSecond, UnitRate::PerMinute, UnitRate::PerHour];

    /// Symbolic name as written to profile files.
    pub fn as_str(self) -> &'static str {
        match self {
            UnitRate::PerSecond => "PerSecond",
            UnitRate::PerMinute => "PerMinute",
            UnitRate::PerHour => "PerHour",
        }
    }

    /// Short suffix for display, e.g. `"/min"`.
    pub fn label(self) -> &'static str {
        match self {
            UnitRate::PerSecond => "/s",
            UnitRate::PerMinute => "/min",
            UnitRate::PerHour => "/h",
        }
    }
}

impl fmt::Display for UnitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitRate {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persecond" | "s" | "sec" | "second" => Ok(UnitRate::PerSecond),
            "perminute" | "min" | "minute" => Ok(UnitRate::PerMinute),
            "perhour" | "h" | "hr" | "hour" => Ok(UnitRate::PerHour),
            _ => Err(RateError::InvalidUnit(s.to_string())),
        }
    }
}

impl TryFrom<i64> for UnitRate {
    type Error = RateError;

    /// Numeric codes follow declaration order: 0, 1, 2.
    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(UnitRate::PerSecond),
            1 => Ok(UnitRate::PerMinute),
            2 => Ok(UnitRate::PerHour),
            other => Err(RateError::InvalidUnit(other.to_string())),
        }
    }
}

/// Built-in physical forms of an item.
///
/// Profiles store kinds as open strings (see [`crate::GameProfile::ingredient_types`]);
/// these variants only seed the default vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IngredientType {
    /// Bulk or discrete solid goods.
    Solid,
    /// Pumped liquids.
    Liquid,
    /// Gases.
    Gas,
}

impl IngredientType {
    /// Every built-in kind in declaration order.
    pub const ALL: [IngredientType; 3] = [
        IngredientType::Solid,
        IngredientType::Liquid,
        IngredientType::Gas,
    ];

    /// Symbolic name used in the open kind vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            IngredientType::Solid => "Solid",
            IngredientType::Liquid => "Liquid",
            IngredientType::Gas => "Gas",
        }
    }

    /// Default vocabulary for a fresh profile.
    pub fn default_vocabulary() -> Vec<String> {
        Self::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IngredientType> for String {
    fn from(kind: IngredientType) -> Self {
        kind.as_str().to_string()
    }
}
