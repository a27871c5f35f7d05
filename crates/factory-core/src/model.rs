//! Profile entities.
//!
//! Every type here is an immutable value: builders consume `self` and return
//! the updated value. Foreign keys (`item_id`, `machine_id`) are not checked;
//! see [`crate::validate`] for the well-formedness pass.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{fresh_id, IdGenerator};
use crate::rate::{convert, RateError};
use crate::units::{IngredientType, UnitRate};

/// Default game name of a fresh profile.
pub const DEFAULT_GAME_NAME: &str = "New Game";
/// Version tag written by this crate. Carried, not enforced.
pub const PROFILE_VERSION: &str = "1.0";

/// A good that flows through the factory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    /// Stable identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Physical form; one of the owning profile's `ingredient_types`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional unit cost.
    #[serde(with = "rust_decimal::serde::arbitrary_precision_option")]
    pub cost: Option<Decimal>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            name: String::new(),
            kind: IngredientType::Solid.into(),
            cost: None,
        }
    }
}

impl Item {
    /// New solid item with a generated id.
    pub fn new(ids: &mut impl IdGenerator, name: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_kind(self, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..self
        }
    }

    pub fn with_cost(self, cost: Decimal) -> Self {
        Self {
            cost: Some(cost),
            ..self
        }
    }

    pub fn without_cost(self) -> Self {
        Self { cost: None, ..self }
    }
}

/// An (item, quantity) pair consumed or produced by a machine or recipe.
///
/// `quantity` is expressed in the owning profile's [`UnitRate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeIngredient {
    pub item_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
}

impl RecipeIngredient {
    pub fn new(item_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }

    fn rescaled(&self, from: UnitRate, to: UnitRate) -> Result<Self, RateError> {
        Ok(Self {
            item_id: self.item_id.clone(),
            quantity: convert(self.quantity, from, to)?,
        })
    }
}

/// A building that turns inputs into outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub inputs: Vec<RecipeIngredient>,
    pub outputs: Vec<RecipeIngredient>,
    /// Free-form constraint labels, e.g. `"150 kW/s"`.
    pub function_requirements: Vec<String>,
}

impl Default for Machine {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            name: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            function_requirements: Vec::new(),
        }
    }
}

impl Machine {
    pub fn new(ids: &mut impl IdGenerator, name: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, ingredient: RecipeIngredient) -> Self {
        self.inputs.push(ingredient);
        self
    }

    pub fn with_output(mut self, ingredient: RecipeIngredient) -> Self {
        self.outputs.push(ingredient);
        self
    }

    pub fn with_function_requirement(mut self, label: impl Into<String>) -> Self {
        self.function_requirements.push(label.into());
        self
    }

    fn rescaled(&self, from: UnitRate, to: UnitRate) -> Result<Self, RateError> {
        Ok(Self {
            inputs: rescale_all(&self.inputs, from, to)?,
            outputs: rescale_all(&self.outputs, from, to)?,
            ..self.clone()
        })
    }
}

/// A conversion step, optionally bound to a machine and gated by a technology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub inputs: Vec<RecipeIngredient>,
    pub outputs: Vec<RecipeIngredient>,
    pub technology: Option<String>,
    pub machine_id: Option<String>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            name: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            technology: None,
            machine_id: None,
        }
    }
}

impl Recipe {
    pub fn new(ids: &mut impl IdGenerator, name: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, ingredient: RecipeIngredient) -> Self {
        self.inputs.push(ingredient);
        self
    }

    pub fn with_output(mut self, ingredient: RecipeIngredient) -> Self {
        self.outputs.push(ingredient);
        self
    }

    pub fn with_technology(self, technology: impl Into<String>) -> Self {
        Self {
            technology: Some(technology.into()),
            ..self
        }
    }

    pub fn with_machine(self, machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: Some(machine_id.into()),
            ..self
        }
    }

    fn rescaled(&self, from: UnitRate, to: UnitRate) -> Result<Self, RateError> {
        Ok(Self {
            inputs: rescale_all(&self.inputs, from, to)?,
            outputs: rescale_all(&self.outputs, from, to)?,
            ..self.clone()
        })
    }
}

/// A belt, pipe or similar carrier of one ingredient kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transport {
    pub id: String,
    pub name: String,
    /// Kind carried; one of the owning profile's `ingredient_types`.
    pub item_type: String,
    /// Throughput in the owning profile's [`UnitRate`].
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub speed: Decimal,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            id: fresh_id(),
            name: String::new(),
            item_type: IngredientType::Solid.into(),
            speed: Decimal::ZERO,
        }
    }
}

impl Transport {
    pub fn new(
        ids: &mut impl IdGenerator,
        name: impl Into<String>,
        item_type: impl Into<String>,
        speed: Decimal,
    ) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            item_type: item_type.into(),
            speed,
        }
    }

    pub fn with_speed(self, speed: Decimal) -> Self {
        Self { speed, ..self }
    }
}

/// Target output rate for an item, in the owning profile's [`UnitRate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesiredAmount {
    pub item_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
}

impl DesiredAmount {
    pub fn new(item_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Aggregate root: everything saved for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameProfile {
    pub game_name: String,
    /// Open vocabulary of ingredient kinds in use.
    pub ingredient_types: Vec<String>,
    /// Time base for every quantity and speed in this profile.
    pub unit_rate: UnitRate,
    pub items: Vec<Item>,
    pub machines: Vec<Machine>,
    pub recipes: Vec<Recipe>,
    pub transports: Vec<Transport>,
    pub desired_outputs: Vec<DesiredAmount>,
    pub version: String,
}

impl Default for GameProfile {
    fn default() -> Self {
        Self {
            game_name: DEFAULT_GAME_NAME.to_string(),
            ingredient_types: IngredientType::default_vocabulary(),
            unit_rate: UnitRate::default(),
            items: Vec::new(),
            machines: Vec::new(),
            recipes: Vec::new(),
            transports: Vec::new(),
            desired_outputs: Vec::new(),
            version: PROFILE_VERSION.to_string(),
        }
    }
}

impl GameProfile {
    /// Default profile with the given name.
    pub fn new(game_name: impl Into<String>) -> Self {
        Self::default().with_game_name(game_name)
    }

    pub fn with_game_name(self, game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            ..self
        }
    }

    /// Change the time base without touching stored quantities.
    ///
    /// Use [`GameProfile::rescaled_to`] to convert quantities as well.
    pub fn with_unit_rate(self, unit_rate: UnitRate) -> Self {
        Self { unit_rate, ..self }
    }

    /// Add a kind to the vocabulary; no-op if already present.
    pub fn with_ingredient_type(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if !self.ingredient_types.contains(&kind) {
            self.ingredient_types.push(kind);
        }
        self
    }

    pub fn with_version(self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self
        }
    }

    /// Append an item. Colliding ids are kept as-is.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn with_desired_output(mut self, desired: DesiredAmount) -> Self {
        self.desired_outputs.push(desired);
        self
    }

    /// Replace the item with the same id in place, or append it.
    pub fn replacing_item(mut self, item: Item) -> Self {
        upsert(&mut self.items, item, |i| &i.id);
        self
    }

    pub fn replacing_machine(mut self, machine: Machine) -> Self {
        upsert(&mut self.machines, machine, |m| &m.id);
        self
    }

    pub fn replacing_recipe(mut self, recipe: Recipe) -> Self {
        upsert(&mut self.recipes, recipe, |r| &r.id);
        self
    }

    pub fn replacing_transport(mut self, transport: Transport) -> Self {
        upsert(&mut self.transports, transport, |t| &t.id);
        self
    }

    /// Drop every item with this id. References to it are left dangling.
    pub fn without_item(mut self, id: &str) -> Self {
        self.items.retain(|i| i.id != id);
        self
    }

    pub fn without_machine(mut self, id: &str) -> Self {
        self.machines.retain(|m| m.id != id);
        self
    }

    pub fn without_recipe(mut self, id: &str) -> Self {
        self.recipes.retain(|r| r.id != id);
        self
    }

    pub fn without_transport(mut self, id: &str) -> Self {
        self.transports.retain(|t| t.id != id);
        self
    }

    /// Drop every desired output targeting `item_id`.
    pub fn without_desired_output(mut self, item_id: &str) -> Self {
        self.desired_outputs.retain(|d| d.item_id != item_id);
        self
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn transport(&self, id: &str) -> Option<&Transport> {
        self.transports.iter().find(|t| t.id == id)
    }

    /// Recipes bound to the given machine, in profile order.
    pub fn recipes_for_machine<'a>(&'a self, machine_id: &'a str) -> impl Iterator<Item = &'a Recipe> {
        self.recipes
            .iter()
            .filter(move |r| r.machine_id.as_deref() == Some(machine_id))
    }

    /// Convert every quantity and speed to `unit` and switch the time base.
    ///
    /// Costs are not rates and are left unchanged.
    pub fn rescaled_to(&self, unit: UnitRate) -> Result<GameProfile, RateError> {
        let from = self.unit_rate;
        if from == unit {
            return Ok(self.clone());
        }
        let machines = self
            .machines
            .iter()
            .map(|m| m.rescaled(from, unit))
            .collect::<Result<Vec<_>, _>>()?;
        let recipes = self
            .recipes
            .iter()
            .map(|r| r.rescaled(from, unit))
            .collect::<Result<Vec<_>, _>>()?;
        let transports = self
            .transports
            .iter()
            .map(|t| Ok(t.clone().with_speed(convert(t.speed, from, unit)?)))
            .collect::<Result<Vec<_>, RateError>>()?;
        let desired_outputs = self
            .desired_outputs
            .iter()
            .map(|d| Ok(DesiredAmount::new(d.item_id.clone(), convert(d.quantity, from, unit)?)))
            .collect::<Result<Vec<_>, RateError>>()?;
        Ok(GameProfile {
            unit_rate: unit,
            machines,
            recipes,
            transports,
            desired_outputs,
            ..self.clone()
        })
    }
}

fn rescale_all(
    ingredients: &[RecipeIngredient],
    from: UnitRate,
    to: UnitRate,
) -> Result<Vec<RecipeIngredient>, RateError> {
    ingredients.iter().map(|i| i.rescaled(from, to)).collect()
}

fn upsert<T>(entries: &mut Vec<T>, value: T, key: impl Fn(&T) -> &String) {
    match entries.iter().position(|e| key(e) == key(&value)) {
        Some(idx) => entries[idx] = value,
        None => entries.push(value),
    }
}
