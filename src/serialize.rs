//! Catalog serialization.
//!
//! Every reachable entity becomes a sparse JSON object: the kind tag is
//! always present, everything else only when meaningfully set. The
//! catalog itself maps each root's canonical name to its serialized
//! tree.

use serde_json::{Map, Value};

use crate::builder::BuiltModel;
use crate::entity::{EntityId, EntityKind};

/// Serialize the whole catalog.
pub fn serialize_catalog(model: &BuiltModel) -> Value {
    let mut catalog = Map::new();

    for (name, &id) in &model.registry {
        catalog.insert(name.clone(), entity_value(model, id));
    }

    Value::Object(catalog)
}

fn entity_value(model: &BuiltModel, id: EntityId) -> Value {
    let entity = model.arena.get(id);
    let mut out = Map::new();

    out.insert("kind".to_string(), Value::String(entity.kind.tag().to_string()));

    if let Some(name) = &entity.name {
        out.insert("name".to_string(), Value::String(name.clone()));
    }

    // Named members held directly by a catalog root are addressable by
    // key
    if let Some(parent) = entity.parent {
        if entity.name.is_some() && model.arena.get(parent).kind == EntityKind::GlobalObject {
            out.insert(
                "key".to_string(),
                Value::String(model.arena.member_key(id)),
            );
        }
    }

    if let Some(literal) = &entity.literal {
        out.insert("literal".to_string(), Value::String(literal.clone()));
    }

    if let Some(namespace) = &entity.namespace {
        out.insert("namespace".to_string(), Value::String(namespace.clone()));
    }

    let flags = entity.flags.names();
    if !flags.is_empty() {
        out.insert(
            "flags".to_string(),
            Value::Array(flags.into_iter().map(|f| Value::String(f.to_string())).collect()),
        );
    }

    if !entity.inherits.is_empty() {
        out.insert(
            "inherits".to_string(),
            Value::Array(
                entity
                    .inherits
                    .iter()
                    .map(|s| Value::String(s.clone()))
                    .collect(),
            ),
        );
    }

    if !entity.type_params.is_empty() {
        out.insert(
            "typeParams".to_string(),
            Value::String(entity.type_params.join(" ")),
        );
    }

    if !entity.params.is_empty() {
        out.insert("params".to_string(), Value::String(entity.params.join(" ")));
    }

    if let Some(ret) = &entity.return_type {
        out.insert("returns".to_string(), Value::String(ret.clone()));
    }

    if !entity.members.is_empty() {
        out.insert(
            "members".to_string(),
            Value::Array(
                entity
                    .members
                    .iter()
                    .map(|&m| entity_value(model, m))
                    .collect(),
            ),
        );
    }

    Value::Object(out)
}
