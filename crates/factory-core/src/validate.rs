//! Well-formedness checks for a [`GameProfile`].
//!
//! Nothing in the model or the store calls these implicitly; callers decide
//! when a profile must be well-formed.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{GameProfile, RecipeIngredient};

/// A single invariant violation found in a profile.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Game name is blank.
    #[error("game name must not be empty")]
    EmptyGameName,
    /// Version tag is blank.
    #[error("version must not be empty")]
    EmptyVersion,
    /// An entity carries an empty id.
    #[error("{entity} at position {index} has an empty id")]
    EmptyId { entity: &'static str, index: usize },
    /// Two entities of the same sequence share an id.
    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: String },
    /// The kind vocabulary lists the same name twice.
    #[error("duplicate ingredient type: {0}")]
    DuplicateIngredientType(String),
    /// An item or transport uses a kind outside the vocabulary.
    #[error("{entity} {id} uses unknown ingredient type {kind}")]
    UnknownIngredientType {
        entity: &'static str,
        id: String,
        kind: String,
    },
    /// A quantity or speed is below zero.
    #[error("{entity} {id} has a negative quantity")]
    NegativeQuantity { entity: &'static str, id: String },
    /// An item cost is below zero.
    #[error("item {0} has a negative cost")]
    NegativeCost(String),
    /// An ingredient or desired output references a missing item.
    #[error("{entity} {id} references unknown item {item_id}")]
    DanglingItem {
        entity: &'static str,
        id: String,
        item_id: String,
    },
    /// A recipe references a missing machine.
    #[error("recipe {recipe_id} references unknown machine {machine_id}")]
    DanglingMachine {
        recipe_id: String,
        machine_id: String,
    },
}

/// Validate a profile, returning the first violation found.
pub fn validate_profile(profile: &GameProfile) -> Result<(), ValidationError> {
    match validation_report(profile).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every violation in the profile, in a stable order.
pub fn validation_report(profile: &GameProfile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if profile.game_name.trim().is_empty() {
        errors.push(ValidationError::EmptyGameName);
    }
    if profile.version.trim().is_empty() {
        errors.push(ValidationError::EmptyVersion);
    }

    let mut kinds: BTreeSet<&str> = BTreeSet::new();
    for kind in &profile.ingredient_types {
        if !kinds.insert(kind.as_str()) {
            errors.push(ValidationError::DuplicateIngredientType(kind.clone()));
        }
    }

    check_ids("item", profile.items.iter().map(|i| i.id.as_str()), &mut errors);
    check_ids("machine", profile.machines.iter().map(|m| m.id.as_str()), &mut errors);
    check_ids("recipe", profile.recipes.iter().map(|r| r.id.as_str()), &mut errors);
    check_ids("transport", profile.transports.iter().map(|t| t.id.as_str()), &mut errors);

    let item_ids: BTreeSet<&str> = profile.items.iter().map(|i| i.id.as_str()).collect();
    let machine_ids: BTreeSet<&str> = profile.machines.iter().map(|m| m.id.as_str()).collect();

    for item in &profile.items {
        if !kinds.contains(item.kind.as_str()) {
            errors.push(ValidationError::UnknownIngredientType {
                entity: "item",
                id: item.id.clone(),
                kind: item.kind.clone(),
            });
        }
        if item.cost.is_some_and(|c| c < Decimal::ZERO) {
            errors.push(ValidationError::NegativeCost(item.id.clone()));
        }
    }

    for machine in &profile.machines {
        let all = machine.inputs.iter().chain(&machine.outputs);
        check_ingredients("machine", &machine.id, all, &item_ids, &mut errors);
    }

    for recipe in &profile.recipes {
        let all = recipe.inputs.iter().chain(&recipe.outputs);
        check_ingredients("recipe", &recipe.id, all, &item_ids, &mut errors);
        if let Some(machine_id) = &recipe.machine_id {
            if !machine_ids.contains(machine_id.as_str()) {
                errors.push(ValidationError::DanglingMachine {
                    recipe_id: recipe.id.clone(),
                    machine_id: machine_id.clone(),
                });
            }
        }
    }

    for transport in &profile.transports {
        if !kinds.contains(transport.item_type.as_str()) {
            errors.push(ValidationError::UnknownIngredientType {
                entity: "transport",
                id: transport.id.clone(),
                kind: transport.item_type.clone(),
            });
        }
        if transport.speed < Decimal::ZERO {
            errors.push(ValidationError::NegativeQuantity {
                entity: "transport",
                id: transport.id.clone(),
            });
        }
    }

    for desired in &profile.desired_outputs {
        if desired.quantity < Decimal::ZERO {
            errors.push(ValidationError::NegativeQuantity {
                entity: "desired output",
                id: desired.item_id.clone(),
            });
        }
        if !item_ids.contains(desired.item_id.as_str()) {
            errors.push(ValidationError::DanglingItem {
                entity: "desired output",
                id: desired.item_id.clone(),
                item_id: desired.item_id.clone(),
            });
        }
    }

    errors
}

fn check_ids<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (index, id) in ids.enumerate() {
        if id.trim().is_empty() {
            errors.push(ValidationError::EmptyId { entity, index });
        } else if !seen.insert(id) {
            errors.push(ValidationError::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
}

fn check_ingredients<'a>(
    entity: &'static str,
    owner_id: &str,
    ingredients: impl Iterator<Item = &'a RecipeIngredient>,
    item_ids: &BTreeSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    for ingredient in ingredients {
        if ingredient.quantity < Decimal::ZERO {
            errors.push(ValidationError::NegativeQuantity {
                entity,
                id: owner_id.to_string(),
            });
        }
        if !item_ids.contains(ingredient.item_id.as_str()) {
            errors.push(ValidationError::DanglingItem {
                entity,
                id: owner_id.to_string(),
                item_id: ingredient.item_id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::{DesiredAmount, Item, Machine, Recipe, Transport};

    fn valid_profile() -> GameProfile {
        let mut ids = SequentialIds::new("v");
        let water = Item::new(&mut ids, "Water").with_kind("Liquid");
        let steam = Item::new(&mut ids, "Steam").with_kind("Gas");
        let boiler = Machine::new(&mut ids, "Boiler")
            .with_input(RecipeIngredient::new(&water.id, Decimal::new(60, 0)))
            .with_output(RecipeIngredient::new(&steam.id, Decimal::new(60, 0)))
            .with_function_requirement("1.8 MW");
        let boil = Recipe::new(&mut ids, "Boil")
            .with_input(RecipeIngredient::new(&water.id, Decimal::ONE))
            .with_output(RecipeIngredient::new(&steam.id, Decimal::ONE))
            .with_machine(&boiler.id);
        let pipe = Transport::new(&mut ids, "Pipe", "Liquid", Decimal::new(1200, 0));
        GameProfile::new("Steam Works")
            .with_desired_output(DesiredAmount::new(&steam.id, Decimal::new(30, 0)))
            .with_item(water)
            .with_item(steam)
            .with_machine(boiler)
            .with_recipe(boil)
            .with_transport(pipe)
    }

    #[test]
    fn valid_profile_passes() {
        assert_eq!(validate_profile(&valid_profile()), Ok(()));
        assert_eq!(validate_profile(&GameProfile::default()), Ok(()));
    }

    #[test]
    fn duplicate_and_empty_ids_are_reported() {
        let mut p = valid_profile();
        let dup = p.items[0].clone();
        p = p.with_item(dup.clone());
        p.machines[0].id = String::new();
        let report = validation_report(&p);
        assert!(report.contains(&ValidationError::DuplicateId {
            entity: "item",
            id: dup.id
        }));
        assert!(report.contains(&ValidationError::EmptyId {
            entity: "machine",
            index: 0
        }));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let p = valid_profile().with_item(Item::default().with_kind("Plasma"));
        let err = validate_profile(&p).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownIngredientType { entity: "item", ref kind, .. } if kind == "Plasma"));
        let p = p.with_ingredient_type("Plasma");
        assert_eq!(validate_profile(&p), Ok(()));
    }

    #[test]
    fn dangling_references_are_reported() {
        let p = valid_profile();
        let water_id = p.items[0].id.clone();
        let machine_id = p.machines[0].id.clone();
        let p = p.without_item(&water_id).without_machine(&machine_id);
        let report = validation_report(&p);
        assert!(report.iter().any(|e| matches!(e, ValidationError::DanglingItem { entity: "recipe", .. })));
        assert!(report.contains(&ValidationError::DanglingMachine {
            recipe_id: p.recipes[0].id.clone(),
            machine_id,
        }));
    }

    #[test]
    fn negative_values_are_reported() {
        let mut p = valid_profile();
        p.transports[0].speed = Decimal::new(-1, 0);
        p.items[0].cost = Some(Decimal::new(-5, 1));
        p.desired_outputs[0].quantity = Decimal::new(-2, 0);
        let report = validation_report(&p);
        assert!(report.contains(&ValidationError::NegativeCost(p.items[0].id.clone())));
        assert!(report.iter().any(|e| matches!(e, ValidationError::NegativeQuantity { entity: "transport", .. })));
        assert!(report.iter().any(|e| matches!(e, ValidationError::NegativeQuantity { entity: "desired output", .. })));
    }

    #[test]
    fn blank_header_fields_are_reported() {
        let mut p = GameProfile::new("  ").with_version("");
        p.ingredient_types.push("Gas".into());
        let report = validation_report(&p);
        assert_eq!(report[0], ValidationError::EmptyGameName);
        assert_eq!(report[1], ValidationError::EmptyVersion);
        assert_eq!(report[2], ValidationError::DuplicateIngredientType("Gas".into()));
    }
}
