//! The document kinds that packsmith ships with.

use serde_json::json;

use super::{Field, Node, NodeSchema};

/// The identifiers of the built-in kinds, in the order they appear in the kind menu
pub const KINDS: &[&str] = &[
    "loot-table",
    "predicate",
    "advancement",
    "dimension",
    "dimension-type",
    "sandbox",
];

/// Returns the schema for one of the built-in [`KINDS`]
pub fn schema_for(kind: &str) -> Option<NodeSchema> {
    Some(match kind {
        "loot-table" => loot_table(),
        "predicate" => predicate(),
        "advancement" => advancement(),
        "dimension" => dimension(),
        "dimension-type" => dimension_type(),
        "sandbox" => NodeSchema::new("sandbox", Node::Any),
        _ => return None,
    })
}

fn loot_table() -> NodeSchema {
    let entry = Node::record(vec![
        Field::required("type", Node::Str),
        Field::optional("name", Node::Str),
        Field::optional("weight", Node::Number),
        Field::optional("quality", Node::Number),
        Field::optional("conditions", Node::list(Node::Any)),
        Field::optional("functions", Node::list(Node::Any)),
    ]);
    let pool = Node::record(vec![
        Field::required("rolls", Node::Any),
        Field::optional("bonus_rolls", Node::Any),
        Field::required("entries", Node::list(entry)),
        Field::optional("conditions", Node::list(Node::Any)),
        Field::optional("functions", Node::list(Node::Any)),
    ]);
    NodeSchema::new(
        "loot-table",
        Node::record(vec![
            Field::optional("type", Node::Str),
            Field::required("pools", Node::list(pool)),
            Field::optional("functions", Node::list(Node::Any)),
        ]),
    )
    .with_default(json!({
        "pools": [
            {
                "rolls": 1,
                "entries": [
                    { "type": "minecraft:item", "name": "minecraft:stone" }
                ]
            }
        ]
    }))
}

fn predicate() -> NodeSchema {
    NodeSchema::new(
        "predicate",
        Node::record(vec![
            Field::required("condition", Node::Str).default(json!("minecraft:random_chance")),
            Field::optional("chance", Node::Number).default(json!(0.5)),
            Field::optional("term", Node::Any),
            Field::optional("terms", Node::list(Node::Any)),
            Field::optional("predicate", Node::Any),
        ]),
    )
}

fn advancement() -> NodeSchema {
    let display = Node::record(vec![
        Field::required("icon", Node::record(vec![Field::required("item", Node::Str)])),
        Field::required("title", Node::Any),
        Field::required("description", Node::Any),
        Field::optional("frame", Node::Str),
        Field::optional("background", Node::Str),
        Field::optional("show_toast", Node::Bool),
        Field::optional("announce_to_chat", Node::Bool),
        Field::optional("hidden", Node::Bool),
    ]);
    let rewards = Node::record(vec![
        Field::optional("recipes", Node::list(Node::Str)),
        Field::optional("loot", Node::list(Node::Str)),
        Field::optional("experience", Node::Number),
        Field::optional("function", Node::Str),
    ]);
    NodeSchema::new(
        "advancement",
        Node::record(vec![
            Field::optional("display", display),
            Field::optional("parent", Node::Str),
            Field::required("criteria", Node::map(Node::Any)),
            Field::optional("requirements", Node::list(Node::list(Node::Str))),
            Field::optional("rewards", rewards),
        ]),
    )
}

fn dimension() -> NodeSchema {
    let biome_source = Node::record(vec![
        Field::required("type", Node::Str).default(json!("minecraft:vanilla_layered")),
        Field::optional("seed", Node::Number).default(json!(0)),
        Field::optional("large_biomes", Node::Bool),
        Field::optional("biomes", Node::list(Node::Any)),
    ]);
    let generator = Node::record(vec![
        Field::required("type", Node::Str).default(json!("minecraft:noise")),
        Field::optional("seed", Node::Number).default(json!(0)),
        Field::optional("settings", Node::Any).default(json!("minecraft:overworld")),
        Field::optional("biome_source", biome_source.clone())
            .default(biome_source.default_value()),
    ]);
    NodeSchema::new(
        "dimension",
        Node::record(vec![
            Field::required("type", Node::Any).default(json!("minecraft:overworld")),
            Field::required("generator", generator),
        ]),
    )
}

fn dimension_type() -> NodeSchema {
    let flag = |name: &str, value: bool| Field::required(name, Node::Bool).default(json!(value));
    NodeSchema::new(
        "dimension-type",
        Node::record(vec![
            flag("ultrawarm", false),
            flag("natural", true),
            Field::required("coordinate_scale", Node::Number).default(json!(1)),
            flag("piglin_safe", false),
            flag("respawn_anchor_works", false),
            flag("bed_works", true),
            flag("has_raids", true),
            flag("has_skylight", true),
            flag("has_ceiling", false),
            Field::required("ambient_light", Node::Number).default(json!(0)),
            Field::optional("fixed_time", Node::Number),
            Field::required("logical_height", Node::Number).default(json!(256)),
            Field::required("infiniburn", Node::Str)
                .default(json!("minecraft:infiniburn_overworld")),
            Field::optional("effects", Node::Str).default(json!("minecraft:overworld")),
        ]),
    )
}
