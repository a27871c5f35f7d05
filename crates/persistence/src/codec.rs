//! JSON encoding of profiles.
//!
//! Output uses camelCase keys, symbolic enum names and decimals written with
//! their exact digit string. On read, keys are matched case-insensitively by
//! folding them to their canonical spelling before typed decoding.

use factory_core::GameProfile;
use serde::de::Error as _;
use serde_json::{Map, Value};

use crate::StoreError;

/// Every key the profile schema knows, in canonical spelling.
const CANONICAL_KEYS: &[&str] = &[
    "gameName",
    "ingredientTypes",
    "unitRate",
    "items",
    "machines",
    "recipes",
    "transports",
    "desiredOutputs",
    "version",
    "id",
    "name",
    "type",
    "cost",
    "inputs",
    "outputs",
    "functionRequirements",
    "technology",
    "machineId",
    "itemType",
    "speed",
    "itemId",
    "quantity",
];

/// Render a profile as an indented JSON document.
pub fn serialize(profile: &GameProfile) -> Result<String, StoreError> {
    serde_json::to_string_pretty(profile).map_err(StoreError::Serialize)
}

/// Parse a profile document. Unknown keys are ignored, missing keys default.
pub fn deserialize(text: &str) -> Result<GameProfile, StoreError> {
    from_slice(text.as_bytes())
}

pub(crate) fn from_slice(bytes: &[u8]) -> Result<GameProfile, StoreError> {
    let value: Value = serde_json::from_slice(bytes).map_err(StoreError::malformed)?;
    if !value.is_object() {
        return Err(StoreError::malformed(serde_json::Error::custom(
            "profile document must be a JSON object",
        )));
    }
    serde_json::from_value(fold_keys(value)).map_err(StoreError::malformed)
}

fn canonical(key: &str) -> Option<&'static str> {
    CANONICAL_KEYS
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(key))
}

/// Rewrite object keys to their canonical spelling, recursively.
///
/// When two keys fold to the same name, the one already spelled canonically
/// wins; otherwise the lexicographically first key is kept.
fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let inner = fold_keys(inner);
                match canonical(&key) {
                    Some(name) if name == key => {
                        out.insert(key, inner);
                    }
                    Some(name) => {
                        if !out.contains_key(name) {
                            out.insert(name.to_string(), inner);
                        }
                    }
                    None => {
                        out.insert(key, inner);
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{
        Decimal, DesiredAmount, Item, Machine, Recipe, RecipeIngredient, SequentialIds, Transport,
        UnitRate,
    };
    use proptest::prelude::*;

    fn sample() -> GameProfile {
        let mut ids = SequentialIds::new("c");
        let ore = Item::new(&mut ids, "Iron Ore").with_cost(Decimal::new(150, 2));
        let plate = Item::new(&mut ids, "Iron Plate");
        let furnace = Machine::new(&mut ids, "Furnace")
            .with_input(RecipeIngredient::new(&ore.id, Decimal::new(2500, 3)))
            .with_output(RecipeIngredient::new(&plate.id, Decimal::ONE))
            .with_function_requirement("150 kW/s");
        GameProfile::new("Test Game")
            .with_unit_rate(UnitRate::PerHour)
            .with_recipe(Recipe::new(&mut ids, "Smelt").with_machine(&furnace.id))
            .with_transport(Transport::new(&mut ids, "Belt", "Solid", Decimal::new(20, 1)))
            .with_desired_output(DesiredAmount::new(&plate.id, Decimal::new(10, 0)))
            .with_item(ore)
            .with_item(plate)
            .with_machine(furnace)
    }

    #[test]
    fn writes_camel_case_symbolic_and_exact() {
        let text = serialize(&sample()).unwrap();
        assert!(text.starts_with("{\n  \"gameName\": \"Test Game\""));
        assert!(text.contains("\"unitRate\": \"PerHour\""));
        assert!(text.contains("\"type\": \"Solid\""));
        assert!(text.contains("\"cost\": 1.50"));
        assert!(text.contains("\"quantity\": 2.500"));
        assert!(text.contains("\"speed\": 2.0"));
        assert!(text.contains("\"functionRequirements\": [\n"));
        assert!(text.contains("\"technology\": null"));
        assert!(text.contains("\"machineId\": \"c-3\""));
    }

    #[test]
    fn decimal_fields_are_json_numbers() {
        let value: Value = serde_json::from_str(&serialize(&sample()).unwrap()).unwrap();
        assert!(value["items"][0]["cost"].is_number());
        assert!(value["items"][1]["cost"].is_null());
        assert!(value["machines"][0]["inputs"][0]["quantity"].is_number());
        assert!(value["transports"][0]["speed"].is_number());
        assert!(value["desiredOutputs"][0]["quantity"].is_number());
    }

    #[test]
    fn reads_canonical_document() {
        let doc = r#"{
            "gameName": "Canonical",
            "ingredientTypes": ["Solid", "Liquid", "Gas"],
            "unitRate": "PerSecond",
            "items": [ { "id": "i1", "name": "Iron Ore", "type": "Solid", "cost": 1.5 } ],
            "machines": [ { "id": "m1", "name": "Furnace", "inputs": [ { "itemId": "i1", "quantity": 2 } ], "outputs": [], "functionRequirements": ["150 kW/s"] } ],
            "recipes": [ { "id": "r1", "name": "Smelt", "inputs": [], "outputs": [], "technology": null, "machineId": null } ],
            "transports": [ { "id": "t1", "name": "Belt", "itemType": "Solid", "speed": 2.0 } ],
            "desiredOutputs": [ { "itemId": "i1", "quantity": 10 } ],
            "version": "1.0"
        }"#;
        let p = deserialize(doc).unwrap();
        assert_eq!(p.game_name, "Canonical");
        assert_eq!(p.unit_rate, UnitRate::PerSecond);
        assert_eq!(p.items[0].cost, Some(Decimal::new(15, 1)));
        assert_eq!(p.machines[0].inputs[0].quantity, Decimal::new(2, 0));
        assert_eq!(p.machines[0].function_requirements, vec!["150 kW/s"]);
        assert_eq!(p.recipes[0].technology, None);
        assert_eq!(p.recipes[0].machine_id, None);
        assert_eq!(p.transports[0].speed, Decimal::new(20, 1));
        assert_eq!(p.transports[0].speed.scale(), 1);
        assert_eq!(p.desired_outputs[0].quantity, Decimal::new(10, 0));

        let text = serialize(&p).unwrap();
        assert!(text.contains("\"cost\": 1.5"));
        assert!(text.contains("\"speed\": 2.0"));
        assert!(text.contains("\"quantity\": 10"));
    }

    #[test]
    fn round_trip_keeps_scale() {
        let p = sample();
        let back = deserialize(&serialize(&p).unwrap()).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.items[0].cost.unwrap().scale(), 2);
        assert_eq!(back.machines[0].inputs[0].quantity.scale(), 3);
    }

    #[test]
    fn keys_match_case_insensitively() {
        let doc = r#"{
            "GAMENAME": "Shouty",
            "UnitRate": "PerSecond",
            "Items": [ { "ID": "a", "Name": "Ore", "TYPE": "Liquid", "Cost": 2.5 } ],
            "desiredoutputs": [ { "ITEMID": "a", "Quantity": 3 } ]
        }"#;
        let p = deserialize(doc).unwrap();
        assert_eq!(p.game_name, "Shouty");
        assert_eq!(p.unit_rate, UnitRate::PerSecond);
        assert_eq!(p.items[0].id, "a");
        assert_eq!(p.items[0].kind, "Liquid");
        assert_eq!(p.items[0].cost, Some(Decimal::new(25, 1)));
        assert_eq!(p.desired_outputs[0].quantity, Decimal::new(3, 0));
    }

    #[test]
    fn canonical_spelling_wins_on_collision() {
        let p = deserialize(r#"{ "GAMENAME": "folded", "gameName": "exact" }"#).unwrap();
        assert_eq!(p.game_name, "exact");
        let p = deserialize(r#"{ "gameName": "exact", "GameName": "folded" }"#).unwrap();
        assert_eq!(p.game_name, "exact");
    }

    #[test]
    fn missing_fields_default_and_unknown_are_ignored() {
        let p = deserialize(r#"{ "gameName": "Sparse", "colour": "red", "items": [ { "name": "Ore" } ] }"#)
            .unwrap();
        assert_eq!(p.game_name, "Sparse");
        assert_eq!(p.unit_rate, UnitRate::PerMinute);
        assert_eq!(p.ingredient_types, vec!["Solid", "Liquid", "Gas"]);
        assert_eq!(p.version, "1.0");
        assert_eq!(p.items[0].kind, "Solid");
        assert!(!p.items[0].id.is_empty());

        assert_eq!(deserialize("{}").unwrap().game_name, "New Game");
    }

    #[test]
    fn malformed_content_is_deserialize_error() {
        for doc in ["", "not json", "[]", "null", "42", r#"{"unitRate": "PerFortnight"}"#, r#"{"items": {}}"#] {
            let err = deserialize(doc).unwrap_err();
            assert!(err.is_corrupt(), "{doc:?} gave {err}");
            assert!(!err.is_io());
        }
    }

    #[test]
    fn numeric_unit_codes_are_rejected() {
        assert!(deserialize(r#"{"unitRate": 1}"#).unwrap_err().is_corrupt());
    }

    proptest! {
        #[test]
        fn decimals_survive_round_trip(m in any::<i64>(), scale in 0u32..=28, speed in 0i64..1_000_000_000, idx in 0usize..3) {
            let cost = Decimal::new(m, scale);
            let mut ids = SequentialIds::new("p");
            let item = Item::new(&mut ids, "X").with_cost(cost);
            let p = GameProfile::default()
                .with_unit_rate(UnitRate::ALL[idx])
                .with_transport(Transport::new(&mut ids, "T", "Gas", Decimal::new(speed, 3)))
                .with_item(item);
            let back = deserialize(&serialize(&p).unwrap()).unwrap();
            prop_assert_eq!(back.items[0].cost.unwrap().scale(), scale);
            prop_assert_eq!(&back, &p);
        }
    }
}
