//! The catalog's symbol model.
//!
//! Entities live in an arena and refer to each other through integer
//! handles; parent links are handles too, so ancestry lookups never
//! create reference cycles and inherited members can be shared between
//! roots without cloning.

use std::fmt;

/// Handle into an [`EntityArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a catalog entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A catalog root: global object, class, or namespace.
    GlobalObject,
    Method,
    Property,
    Event,
    Constructor,
    ReturnType,
    Generic,
    Parameter,
    /// An inlined structural type attached as a member's type.
    Type,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::GlobalObject => "object",
            EntityKind::Method => "method",
            EntityKind::Property => "property",
            EntityKind::Event => "event",
            EntityKind::Constructor => "constructor",
            EntityKind::ReturnType => "return",
            EntityKind::Generic => "generic",
            EntityKind::Parameter => "parameter",
            EntityKind::Type => "type",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-entity flags; all default to unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFlags {
    pub is_static: bool,
    pub is_optional_param: bool,
    pub is_rest_param: bool,
    pub is_async: bool,
    pub is_type_assertion: bool,
}

impl EntityFlags {
    /// The set flags by name, in a fixed order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.is_static {
            out.push("static");
        }
        if self.is_optional_param {
            out.push("optional");
        }
        if self.is_rest_param {
            out.push("rest");
        }
        if self.is_async {
            out.push("async");
        }
        if self.is_type_assertion {
            out.push("assertion");
        }
        out
    }
}

/// A mutable symbol node.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: Option<String>,
    /// Owning context, for name and ancestry lookup only.
    pub parent: Option<EntityId>,
    /// Owned members; grows during inheritance resolution.
    pub members: Vec<EntityId>,
    /// Names of inheritance sources, accumulated at creation time.
    pub inherits: Vec<String>,
    pub namespace: Option<String>,
    pub flags: EntityFlags,
    /// Literal text: a normalized type for properties and parameters, a
    /// constraint for generics.
    pub literal: Option<String>,
    /// Pre-rendered parameter type fragments, joined at serialization.
    pub params: Vec<String>,
    /// Pre-rendered type-parameter fragments.
    pub type_params: Vec<String>,
    /// Normalized return type, when one was declared.
    pub return_type: Option<String>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: Option<String>) -> Self {
        Self {
            kind,
            name,
            parent: None,
            members: Vec::new(),
            inherits: Vec::new(),
            namespace: None,
            flags: EntityFlags::default(),
            literal: None,
            params: Vec::new(),
            type_params: Vec::new(),
            return_type: None,
        }
    }
}

/// Arena owning every entity of one run.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: Vec<Entity>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    /// Attach `member` to `owner`. A member has exactly one owning
    /// context; attaching twice is a bug in the builder.
    pub fn attach(&mut self, owner: EntityId, member: EntityId) {
        debug_assert!(self.get(member).parent.is_none(), "member attached twice");
        self.get_mut(member).parent = Some(owner);
        self.get_mut(owner).members.push(member);
    }

    /// The ancestry segments of an entity: owner names from the root
    /// down, with an implicit "prototype" segment for instance members.
    fn ancestry(&self, id: EntityId) -> Vec<String> {
        let mut segments = Vec::new();
        let entity = self.get(id);

        let mut cursor = entity.parent;
        while let Some(pid) = cursor {
            let parent = self.get(pid);
            if let Some(name) = &parent.name {
                segments.push(name.clone());
            }
            cursor = parent.parent;
        }
        segments.reverse();

        let instance_member = matches!(
            entity.kind,
            EntityKind::Method | EntityKind::Property | EntityKind::Event
        );
        // Computed names attach straight to the object; only plain
        // instance members live behind the prototype
        let computed = entity
            .name
            .as_deref()
            .is_some_and(|n| n.starts_with('['));
        if entity.parent.is_some() && instance_member && !computed && !entity.flags.is_static {
            segments.push("prototype".to_string());
        }

        // A root's ancestry is its own name
        if segments.is_empty() {
            if let Some(name) = &entity.name {
                segments.push(name.clone());
            }
        }

        segments
    }

    /// The canonical catalog name of an entity (bare name for roots,
    /// dotted path otherwise).
    pub fn canonical_name(&self, id: EntityId) -> String {
        let entity = self.get(id);
        let name = entity.name.as_deref().unwrap_or("");
        render_key(name, &self.ancestry(id))
    }

    /// The member key of an entity, with the `.prototype.` → `::`
    /// abbreviation applied.
    pub fn member_key(&self, id: EntityId) -> String {
        self.canonical_name(id)
    }
}

/// Render a member key from a name and its ancestry segments.
///
/// Rules: ancestry equal to the name alone is the root case and renders
/// bare; segments join with "."; a bracketed computed name attaches
/// without a joining dot; "prototype" segments render as "::" and
/// consecutive ones collapse.
pub fn render_key(name: &str, ancestry: &[String]) -> String {
    if ancestry.is_empty() || (ancestry.len() == 1 && ancestry[0] == name) {
        return name.to_string();
    }

    let mut out = String::new();
    let mut segments: Vec<&str> = ancestry.iter().map(String::as_str).collect();
    if !name.is_empty() {
        segments.push(name);
    }

    for segment in segments {
        if segment == "prototype" {
            if !out.ends_with("::") {
                out.push_str("::");
            }
        } else if segment.starts_with('[') || out.is_empty() || out.ends_with("::") {
            out.push_str(segment);
        } else {
            out.push('.');
            out.push_str(segment);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn root_renders_bare() {
        assert_eq!(render_key("Array", &seg(&["Array"])), "Array");
    }

    #[test]
    fn instance_member_abbreviates_prototype() {
        assert_eq!(
            render_key("slice", &seg(&["Array", "prototype"])),
            "Array::slice"
        );
    }

    #[test]
    fn computed_name_attaches_without_dot() {
        assert_eq!(
            render_key("[Symbol.iterator]", &seg(&["Array"])),
            "Array[Symbol.iterator]"
        );
    }

    #[test]
    fn trailing_prototype_keeps_marker() {
        assert_eq!(render_key("prototype", &seg(&["Function"])), "Function::");
    }

    #[test]
    fn duplicate_prototype_collapses() {
        assert_eq!(
            render_key("bar", &seg(&["Foo", "prototype", "prototype"])),
            "Foo::bar"
        );
    }

    #[test]
    fn plain_nested_members_join_with_dots() {
        assert_eq!(
            render_key("format", &seg(&["Intl", "DateTimeFormat"])),
            "Intl.DateTimeFormat.format"
        );
    }

    #[test]
    fn arena_ancestry_inserts_prototype_for_instance_members() {
        let mut arena = EntityArena::new();
        let root = arena.alloc(Entity::new(
            EntityKind::GlobalObject,
            Some("Array".to_string()),
        ));

        let mut slice = Entity::new(EntityKind::Method, Some("slice".to_string()));
        slice.flags.is_static = false;
        let slice = arena.alloc(slice);
        arena.attach(root, slice);

        let mut of = Entity::new(EntityKind::Method, Some("of".to_string()));
        of.flags.is_static = true;
        let of = arena.alloc(of);
        arena.attach(root, of);

        assert_eq!(arena.member_key(slice), "Array::slice");
        assert_eq!(arena.member_key(of), "Array.of");
        assert_eq!(arena.canonical_name(root), "Array");
    }
}
