//! Inheritance resolution.
//!
//! One flat pass over the registry in insertion order. Every source name
//! that resolves to an already-present root contributes its members to
//! the target by handle; nothing is cloned and members keep their
//! original owner. The pass is deliberately non-recursive: a multi-level
//! chain flattens fully into a target only when the intermediate root's
//! own resolution ran earlier in iteration order.

use crate::builder::BuiltModel;
use crate::entity::EntityId;

/// Merge inherited members into every catalog root.
pub fn resolve(model: &mut BuiltModel) {
    let roots: Vec<EntityId> = model.registry.values().copied().collect();

    for target in roots {
        let sources = model.arena.get(target).inherits.clone();

        for source in sources {
            let Some(&source_id) = model.registry.get(&source) else {
                continue;
            };
            if source_id == target {
                continue;
            }

            let incoming: Vec<EntityId> = model.arena.get(source_id).members.clone();
            for member in incoming {
                if already_member(model, target, member) {
                    continue;
                }
                // By reference: the member keeps its owning context
                model.arena.get_mut(target).members.push(member);
            }
        }
    }
}

fn already_member(model: &BuiltModel, target: EntityId, incoming: EntityId) -> bool {
    let name = match &model.arena.get(incoming).name {
        Some(name) => name.clone(),
        // Unnamed members (call signatures, index signatures) always
        // merge
        None => return model.arena.get(target).members.contains(&incoming),
    };

    model
        .arena
        .get(target)
        .members
        .iter()
        .any(|&m| model.arena.get(m).name.as_deref() == Some(name.as_str()))
}
