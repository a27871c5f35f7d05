#![deny(warnings)]

//! Core domain model for factory game profiles.
//!
//! This crate defines the serializable profile entities, the rate units they
//! are expressed in, exact decimal conversion between those units, injectable
//! identity generation, and a validation pass for cross-entity invariants.

pub mod ids;
pub mod model;
pub mod rate;
pub mod units;
pub mod validate;

pub use ids::{IdGenerator, RandomIds, SeededIds, SequentialIds};
pub use model::{
    DesiredAmount, GameProfile, Item, Machine, Recipe, RecipeIngredient, Transport,
    DEFAULT_GAME_NAME, PROFILE_VERSION,
};
pub use rate::{convert, convert_raw, from_per_second, seconds_per_unit, to_per_second, Rate, RateError};
pub use units::{IngredientType, UnitRate};
pub use validate::{validate_profile, validation_report, ValidationError};

pub use rust_decimal::Decimal;
