//! Model construction.
//!
//! Walks every fragment once and turns declarations into entities. The
//! registry maps catalog root names to entities and merges on insert, so
//! declarations split across fragments (or the constructor/instance
//! halves of one object) all land on a single root. Visit order within a
//! fragment is fixed: variables, interfaces, functions, namespaces,
//! classes. Each declaration node is visited at most once, tracked by
//! node identity, which keeps re-entrant visits from namespace
//! processing from double-attaching members.

use std::collections::HashMap;
use std::collections::HashSet;

use indexmap::IndexMap;

use crate::ast::{
    ClassDecl, Decl, Fragment, FunctionDecl, InterfaceDecl, Member, MethodSig, NamespaceDecl,
    Param, PropertySig, TypeAliasDecl, TypeExpr, TypeParam, VarDecl,
};
use crate::classify::{Classification, Shape};
use crate::entity::{Entity, EntityArena, EntityId, EntityKind};
use crate::error::CatalogError;
use crate::notation::{self, NotationOptions};
use crate::relations::RelationTable;

/// Name of the sentinel root owning top-level members.
pub const GLOBAL_SCOPE: &str = "globalThis";

/// The finished symbol model, ready for inheritance resolution and
/// serialization.
#[derive(Debug)]
pub struct BuiltModel {
    pub arena: EntityArena,
    /// Catalog roots by name, in first-seen order.
    pub registry: IndexMap<String, EntityId>,
}

/// Single-owner model builder; consumes itself when the batch is done.
pub struct ModelBuilder<'a> {
    arena: EntityArena,
    registry: IndexMap<String, EntityId>,
    classes: &'a Classification,
    relations: &'a RelationTable,
    opts: NotationOptions,
    /// Declaration nodes already visited, by identity.
    seen: HashSet<*const Decl>,
    /// All interface declarations by name, for structural inlining.
    interfaces: HashMap<String, Vec<&'a InterfaceDecl>>,
    /// Top-level type aliases, for one-step reference resolution.
    aliases: HashMap<String, &'a TypeAliasDecl>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(
        classes: &'a Classification,
        relations: &'a RelationTable,
        opts: NotationOptions,
    ) -> Self {
        let mut builder = Self {
            arena: EntityArena::new(),
            registry: IndexMap::new(),
            classes,
            relations,
            opts,
            seen: HashSet::new(),
            interfaces: HashMap::new(),
            aliases: HashMap::new(),
        };

        // The global scope exists before any declaration is seen
        let global = builder
            .arena
            .alloc(Entity::new(EntityKind::GlobalObject, Some(GLOBAL_SCOPE.to_string())));
        builder.registry.insert(GLOBAL_SCOPE.to_string(), global);
        builder
    }

    /// Build the model from the full fragment set.
    pub fn build(mut self, fragments: &'a [Fragment]) -> Result<BuiltModel, CatalogError> {
        for fragment in fragments {
            self.index_decls(&fragment.decls);
        }
        for fragment in fragments {
            self.visit_decls(&fragment.decls, None)?;
        }

        Ok(BuiltModel {
            arena: self.arena,
            registry: self.registry,
        })
    }

    fn index_decls(&mut self, decls: &'a [Decl]) {
        for decl in decls {
            match decl {
                Decl::Interface(iface) => {
                    self.interfaces
                        .entry(iface.name.clone())
                        .or_default()
                        .push(iface);
                }
                Decl::TypeAlias(alias) => {
                    self.aliases.insert(alias.name.clone(), alias);
                }
                Decl::Namespace(ns) if !ns.ambient => self.index_decls(&ns.decls),
                _ => {}
            }
        }
    }

    /// Visit one declaration list in the fixed kind order. `owner` is
    /// `None` at the top level (members go to roots or the global
    /// scope) and the namespace entity inside a namespace.
    fn visit_decls(
        &mut self,
        decls: &'a [Decl],
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        for decl in decls {
            if let Decl::Var(var) = decl {
                if self.mark_seen(decl) {
                    self.visit_var(var, owner)?;
                }
            }
        }
        for decl in decls {
            if let Decl::Interface(iface) = decl {
                if self.mark_seen(decl) {
                    self.visit_interface(iface, owner)?;
                }
            }
        }
        for decl in decls {
            if let Decl::Function(func) = decl {
                if self.mark_seen(decl) {
                    self.visit_function(func, owner)?;
                }
            }
        }
        for decl in decls {
            if let Decl::Namespace(ns) = decl {
                if self.mark_seen(decl) {
                    self.visit_namespace(ns, owner)?;
                }
            }
        }
        for decl in decls {
            if let Decl::Class(class) = decl {
                if self.mark_seen(decl) {
                    self.visit_class(class, owner)?;
                }
            }
        }
        Ok(())
    }

    fn mark_seen(&mut self, decl: &Decl) -> bool {
        self.seen.insert(decl as *const Decl)
    }

    /// Fetch or create the catalog root for `name`. Roots accumulate
    /// relationship-table sources once, at creation.
    fn root(&mut self, name: &str) -> Result<EntityId, CatalogError> {
        if let Some(&id) = self.registry.get(name) {
            let entity = self.arena.get(id);
            if entity.kind != EntityKind::GlobalObject {
                return Err(CatalogError::Contract(format!(
                    "registry entry {name:?} is a {} entity, expected an object root",
                    entity.kind
                )));
            }
            return Ok(id);
        }

        let mut entity = Entity::new(EntityKind::GlobalObject, Some(name.to_string()));
        entity.inherits = self.relations.sources(name);
        let id = self.arena.alloc(entity);
        self.registry.insert(name.to_string(), id);
        Ok(id)
    }

    fn add_sources(&mut self, id: EntityId, clauses: &[TypeExpr]) {
        for clause in clauses {
            if let TypeExpr::Named { name, .. } = clause {
                let entity = self.arena.get_mut(id);
                if !entity.inherits.iter().any(|s| s == name) {
                    entity.inherits.push(name.clone());
                }
            }
        }
    }

    fn visit_var(
        &mut self,
        var: &'a VarDecl,
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        // A top-level variable bound to an interface is the value half
        // of a catalog root; the interface passes fill in the members.
        if owner.is_none() {
            let references_interface = var
                .ty
                .simple_name()
                .is_some_and(|n| self.classes.is_interface(n));
            if references_interface || self.classes.is_interface(&var.name) {
                self.root(&var.name)?;
                return Ok(());
            }
        }

        let (owner_id, ns) = match owner {
            Some((id, ns)) => (id, Some(ns)),
            None => (self.registry[GLOBAL_SCOPE], None),
        };

        let kind = if is_event_property(&var.name, Some(&var.ty)) {
            EntityKind::Event
        } else {
            EntityKind::Property
        };

        let mut entity = Entity::new(kind, Some(var.name.clone()));
        entity.literal = Some(self.type_text(&var.ty));
        entity.namespace = ns.map(str::to_string);
        // Top-level and namespace values are always static
        entity.flags.is_static = true;
        let id = self.arena.alloc(entity);

        if self.dedup(owner_id, &var.name) {
            self.arena.attach(owner_id, id);
        }
        Ok(())
    }

    fn visit_interface(
        &mut self,
        iface: &'a InterfaceDecl,
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        let effective = match self.effective_name(iface) {
            Some(name) => name,
            // Pure structural type: not a root; reachable only inline
            // as a member's type
            None => return Ok(()),
        };

        let default_static = self.classes.shape_of(&iface.name) == Shape::Static;

        let (target, ns) = match owner {
            None => (self.root(&effective)?, None),
            Some((owner_id, ns)) => {
                let id = self.child_object(owner_id, &effective, ns)?;
                (id, Some(ns))
            }
        };

        self.add_sources(target, &iface.extends);
        self.attach_members(target, &iface.members, default_static, ns, true)?;
        Ok(())
    }

    /// Effective catalog name of an interface: its own name when a
    /// variable shares it, the cross-referenced variable's name when one
    /// points at it, otherwise none.
    fn effective_name(&self, iface: &InterfaceDecl) -> Option<String> {
        if self.classes.is_var(&iface.name) {
            return Some(iface.name.clone());
        }
        self.classes
            .var_for_type(&iface.name)
            .map(str::to_string)
    }

    fn visit_function(
        &mut self,
        func: &'a FunctionDecl,
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        let (owner_id, ns) = match owner {
            Some((id, ns)) => (id, Some(ns)),
            None => (self.registry[GLOBAL_SCOPE], None),
        };

        let mut entity = Entity::new(EntityKind::Method, Some(func.name.clone()));
        entity.namespace = ns.map(str::to_string);
        entity.flags.is_static = true;
        let id = self.arena.alloc(entity);
        self.fill_signature(id, &func.type_params, &func.params, func.ret.as_ref());

        if self.dedup(owner_id, &func.name) {
            self.arena.attach(owner_id, id);
        }
        Ok(())
    }

    fn visit_namespace(
        &mut self,
        ns: &'a NamespaceDecl,
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        if ns.ambient {
            return Ok(());
        }

        let target = match owner {
            None => self.root(&ns.name)?,
            Some((owner_id, outer)) => {
                let tag = format!("{outer}.{}", ns.name);
                self.child_object(owner_id, &ns.name, &tag)?
            }
        };

        // Re-entrant visit of the namespace body, same kind order
        self.visit_decls(&ns.decls, Some((target, &ns.name)))?;
        Ok(())
    }

    fn visit_class(
        &mut self,
        class: &'a ClassDecl,
        owner: Option<(EntityId, &str)>,
    ) -> Result<(), CatalogError> {
        let (target, ns) = match owner {
            None => (self.root(&class.name)?, None),
            Some((owner_id, ns)) => (self.child_object(owner_id, &class.name, ns)?, Some(ns)),
        };

        if let Some(base) = &class.extends {
            self.add_sources(target, std::slice::from_ref(base));
        }
        self.add_sources(target, &class.implements);

        // Class members are instance-shaped unless marked static
        self.attach_members(target, &class.members, false, ns, true)?;
        Ok(())
    }

    /// A nested object (interface, class, or namespace inside a
    /// namespace) attaches as a member rather than a registry root.
    fn child_object(
        &mut self,
        owner_id: EntityId,
        name: &str,
        ns: &str,
    ) -> Result<EntityId, CatalogError> {
        if let Some(&existing) = self
            .arena
            .get(owner_id)
            .members
            .iter()
            .find(|&&m| self.arena.get(m).name.as_deref() == Some(name))
        {
            return Ok(existing);
        }

        let mut entity = Entity::new(EntityKind::GlobalObject, Some(name.to_string()));
        entity.namespace = Some(ns.to_string());
        entity.flags.is_static = true;
        entity.inherits = self.relations.sources(name);
        let id = self.arena.alloc(entity);
        self.arena.attach(owner_id, id);
        Ok(id)
    }

    fn attach_members(
        &mut self,
        owner_id: EntityId,
        members: &[Member],
        default_static: bool,
        ns: Option<&str>,
        allow_inline: bool,
    ) -> Result<(), CatalogError> {
        let force_static = owner_id == self.registry[GLOBAL_SCOPE];

        for member in members {
            match member {
                Member::Property(prop) => {
                    self.attach_property(
                        owner_id,
                        prop,
                        default_static,
                        force_static,
                        ns,
                        allow_inline,
                    )?;
                }
                Member::Method(method) => {
                    self.attach_method(owner_id, method, default_static, force_static, ns);
                }
                Member::Call(sig) => {
                    // A call signature makes the object itself callable
                    let mut entity = Entity::new(EntityKind::Method, None);
                    entity.namespace = ns.map(str::to_string);
                    entity.flags.is_static = true;
                    let id = self.arena.alloc(entity);
                    self.fill_signature(id, &sig.type_params, &sig.params, sig.ret.as_ref());
                    self.arena.attach(owner_id, id);
                }
                Member::Construct(sig) => {
                    let mut entity =
                        Entity::new(EntityKind::Constructor, Some("constructor".to_string()));
                    entity.namespace = ns.map(str::to_string);
                    entity.flags.is_static = true;
                    let id = self.arena.alloc(entity);
                    self.fill_signature(id, &sig.type_params, &sig.params, sig.ret.as_ref());
                    if self.dedup(owner_id, "constructor") {
                        self.arena.attach(owner_id, id);
                    }
                }
                Member::Index(sig) => {
                    let mut entity = Entity::new(EntityKind::Property, None);
                    entity.namespace = ns.map(str::to_string);
                    entity.flags.is_static = default_static || force_static;
                    entity.literal = Some(format!(
                        "(index {} {})",
                        notation::render(&sig.key_type, &self.opts),
                        notation::render(&sig.value_type, &self.opts)
                    ));
                    let id = self.arena.alloc(entity);
                    self.arena.attach(owner_id, id);
                }
            }
        }
        Ok(())
    }

    fn attach_property(
        &mut self,
        owner_id: EntityId,
        prop: &PropertySig,
        default_static: bool,
        force_static: bool,
        ns: Option<&str>,
        allow_inline: bool,
    ) -> Result<(), CatalogError> {
        let name = prop.name.text().to_string();
        if !self.dedup(owner_id, &name) {
            return Ok(());
        }

        let kind = if !prop.name.is_computed() && is_event_property(&name, prop.ty.as_ref()) {
            EntityKind::Event
        } else {
            EntityKind::Property
        };

        let mut entity = Entity::new(kind, Some(name));
        entity.namespace = ns.map(str::to_string);
        entity.flags.is_static = force_static || prop.is_static.unwrap_or(default_static);
        entity.literal = prop.ty.as_ref().map(|ty| self.type_text(ty));
        let id = self.arena.alloc(entity);
        self.arena.attach(owner_id, id);

        // One direct named reference to a pure structural interface is
        // expanded in place, one level deep
        if allow_inline {
            if let Some(TypeExpr::Named { name: ty_name, args }) = &prop.ty {
                if args.is_empty() && self.is_structural(ty_name) {
                    let decls: Vec<&'a InterfaceDecl> = self
                        .interfaces
                        .get(ty_name)
                        .map(|v| v.to_vec())
                        .unwrap_or_default();
                    if !decls.is_empty() {
                        let mut inline =
                            Entity::new(EntityKind::Type, Some(ty_name.clone()));
                        inline.namespace = ns.map(str::to_string);
                        inline.flags.is_static = true;
                        let inline_id = self.arena.alloc(inline);
                        self.arena.attach(id, inline_id);
                        for decl in decls {
                            self.attach_members(inline_id, &decl.members, true, ns, false)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn attach_method(
        &mut self,
        owner_id: EntityId,
        method: &MethodSig,
        default_static: bool,
        force_static: bool,
        ns: Option<&str>,
    ) {
        let name = method.name.text().to_string();
        if !self.dedup(owner_id, &name) {
            return;
        }

        let mut entity = Entity::new(EntityKind::Method, Some(name));
        entity.namespace = ns.map(str::to_string);
        entity.flags.is_static = force_static || method.is_static.unwrap_or(default_static);
        entity.flags.is_async = method.is_async;
        if matches!(method.ret, Some(TypeExpr::Predicate { .. })) {
            entity.flags.is_type_assertion = true;
        }
        let id = self.arena.alloc(entity);
        self.fill_signature(id, &method.type_params, &method.params, method.ret.as_ref());
        self.arena.attach(owner_id, id);
    }

    /// Populate a callable entity: parameter and generic children plus
    /// the pre-rendered text fragments, and the return type.
    fn fill_signature(
        &mut self,
        id: EntityId,
        type_params: &[TypeParam],
        params: &[Param],
        ret: Option<&TypeExpr>,
    ) {
        for tp in type_params {
            let mut generic = Entity::new(EntityKind::Generic, Some(tp.name.clone()));
            generic.literal = tp
                .constraint
                .as_ref()
                .map(|c| notation::render(c, &self.opts));
            let gid = self.arena.alloc(generic);
            self.arena.attach(id, gid);

            let fragment = notation::render_type_param(tp, &self.opts);
            self.arena.get_mut(id).type_params.push(fragment);
        }

        for param in params {
            let mut child = Entity::new(EntityKind::Parameter, Some(param.name.clone()));
            child.flags.is_optional_param = param.optional;
            child.flags.is_rest_param = param.rest;
            child.literal = param.ty.as_ref().map(|ty| self.type_text(ty));
            let pid = self.arena.alloc(child);
            self.arena.attach(id, pid);

            let fragment = notation::render_param(param, &self.opts);
            self.arena.get_mut(id).params.push(fragment);
        }

        if let Some(ret) = ret {
            let text = notation::render(ret, &self.opts);
            let mut child = Entity::new(EntityKind::ReturnType, None);
            child.literal = Some(text.clone());
            let rid = self.arena.alloc(child);
            self.arena.attach(id, rid);
            self.arena.get_mut(id).return_type = Some(text);
        }
    }

    /// Whether `owner` can take a member with this name; an existing
    /// member of the same name wins (declaration merging keeps the
    /// union without duplicates).
    fn dedup(&self, owner_id: EntityId, name: &str) -> bool {
        !self
            .arena
            .get(owner_id)
            .members
            .iter()
            .any(|&m| self.arena.get(m).name.as_deref() == Some(name))
    }

    /// An interface that resolves to no catalog root.
    fn is_structural(&self, name: &str) -> bool {
        self.classes.is_interface(name)
            && !self.classes.is_var(name)
            && self.classes.var_for_type(name).is_none()
    }

    /// Normalized type text with one-step alias resolution: a bare
    /// reference to a top-level alias renders the alias body.
    fn type_text(&self, ty: &TypeExpr) -> String {
        if let Some(name) = ty.simple_name() {
            if !self.classes.is_interface(name) {
                if let Some(alias) = self.aliases.get(name) {
                    return notation::render(&alias.ty, &self.opts);
                }
            }
        }
        notation::render(ty, &self.opts)
    }
}

/// The `onfoo` handler-property convention: `on` + lowercase tail, with
/// a function somewhere in the declared type.
fn is_event_property(name: &str, ty: Option<&TypeExpr>) -> bool {
    let Some(tail) = name.strip_prefix("on") else {
        return false;
    };
    if tail.is_empty() || !tail.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }
    ty.is_some_and(type_has_function)
}

fn type_has_function(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Function(_) | TypeExpr::Constructor(_) => true,
        TypeExpr::Paren(inner) => type_has_function(inner),
        TypeExpr::Union(arms) => arms.iter().any(type_has_function),
        TypeExpr::Named { name, .. } => name.ends_with("EventHandler"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build(sources: &[&str]) -> BuiltModel {
        let fragments: Vec<Fragment> = sources.iter().map(|s| parse(s).unwrap()).collect();
        let classes = Classification::scan(&fragments);
        let relations = RelationTable::bundled();
        ModelBuilder::new(&classes, &relations, NotationOptions::default())
            .build(&fragments)
            .unwrap()
    }

    fn member_names(model: &BuiltModel, root: &str) -> Vec<String> {
        let id = model.registry[root];
        model
            .arena
            .get(id)
            .members
            .iter()
            .filter_map(|&m| model.arena.get(m).name.clone())
            .collect()
    }

    #[test]
    fn constructor_and_instance_halves_share_one_root() {
        let model = build(&[
            "interface Foo { bar(): void; }",
            "interface FooConstructor { new (): Foo; readonly prototype: Foo; }",
            "declare var Foo: FooConstructor;",
        ]);

        let names = member_names(&model, "Foo");
        assert!(names.contains(&"constructor".to_string()));
        assert!(names.contains(&"prototype".to_string()));
        assert!(names.contains(&"bar".to_string()));

        let root = model.registry["Foo"];
        let bar = model
            .arena
            .get(root)
            .members
            .iter()
            .find(|&&m| model.arena.get(m).name.as_deref() == Some("bar"))
            .copied()
            .unwrap();
        assert!(!model.arena.get(bar).flags.is_static);
        assert_eq!(model.arena.member_key(bar), "Foo::bar");

        let proto = model
            .arena
            .get(root)
            .members
            .iter()
            .find(|&&m| model.arena.get(m).name.as_deref() == Some("prototype"))
            .copied()
            .unwrap();
        assert!(model.arena.get(proto).flags.is_static);
        assert_eq!(model.arena.member_key(proto), "Foo::");
    }

    #[test]
    fn fragments_merge_without_duplicates() {
        let model = build(&[
            "interface Win { alpha(): void; }\ndeclare var Win: Win;",
            "interface Win { alpha(): void; beta(): void; }",
        ]);

        let names = member_names(&model, "Win");
        assert_eq!(
            names.iter().filter(|n| n.as_str() == "alpha").count(),
            1
        );
        assert!(names.contains(&"beta".to_string()));
    }

    #[test]
    fn top_level_values_attach_to_global_scope_as_static() {
        let model = build(&[
            "declare var version: string;\ndeclare function parseThing(text: string): number;",
        ]);

        let names = member_names(&model, GLOBAL_SCOPE);
        assert!(names.contains(&"version".to_string()));
        assert!(names.contains(&"parseThing".to_string()));

        let global = model.registry[GLOBAL_SCOPE];
        for &m in &model.arena.get(global).members {
            assert!(model.arena.get(m).flags.is_static);
        }
    }

    #[test]
    fn structural_interface_is_not_a_root() {
        let model = build(&["interface Options { depth?: number; }"]);
        assert!(!model.registry.contains_key("Options"));
    }

    #[test]
    fn structural_interface_inlines_into_member_type() {
        let model = build(&[
            "interface Options { depth: number; }",
            "interface Scanner { config: Options; }\ndeclare var Scanner: Scanner;",
        ]);

        let root = model.registry["Scanner"];
        let config = model
            .arena
            .get(root)
            .members
            .iter()
            .find(|&&m| model.arena.get(m).name.as_deref() == Some("config"))
            .copied()
            .unwrap();
        let inline = model.arena.get(config).members[0];
        assert_eq!(model.arena.get(inline).kind, EntityKind::Type);
        let inner = model.arena.get(inline).members[0];
        assert_eq!(model.arena.get(inner).name.as_deref(), Some("depth"));
    }

    #[test]
    fn handler_properties_become_events() {
        let model = build(&[
            "interface Sock { onclose: ((ev: unknown) => void) | null; label: string; }\ndeclare var Sock: Sock;",
        ]);

        let root = model.registry["Sock"];
        let members = &model.arena.get(root).members;
        let onclose = members
            .iter()
            .find(|&&m| model.arena.get(m).name.as_deref() == Some("onclose"))
            .copied()
            .unwrap();
        let label = members
            .iter()
            .find(|&&m| model.arena.get(m).name.as_deref() == Some("label"))
            .copied()
            .unwrap();
        assert_eq!(model.arena.get(onclose).kind, EntityKind::Event);
        assert_eq!(model.arena.get(label).kind, EntityKind::Property);
    }

    #[test]
    fn class_members_use_explicit_static_modifier() {
        let model = build(&[
            "declare class Point { constructor(x: number); static origin(): Point; dist(): number; }",
        ]);

        let root = model.registry["Point"];
        for &m in &model.arena.get(root).members {
            let e = model.arena.get(m);
            match e.name.as_deref() {
                Some("constructor") | Some("origin") => assert!(e.flags.is_static),
                Some("dist") => assert!(!e.flags.is_static),
                _ => {}
            }
        }
    }

    #[test]
    fn namespace_members_carry_the_tag() {
        let model = build(&[
            "declare namespace Intl { function getCanonicalLocales(l: string[]): string[]; }",
        ]);

        let root = model.registry["Intl"];
        let member = model.arena.get(root).members[0];
        let e = model.arena.get(member);
        assert_eq!(e.name.as_deref(), Some("getCanonicalLocales"));
        assert_eq!(e.namespace.as_deref(), Some("Intl"));
        assert!(e.flags.is_static);
    }

    #[test]
    fn extends_clause_and_relation_table_both_record_sources() {
        let model = build(&[
            "interface Worker extends EventTarget { post(msg: string): void; }\ndeclare var Worker: Worker;",
        ]);

        let root = model.registry["Worker"];
        let inherits = &model.arena.get(root).inherits;
        // Bundled table gives EventTarget + AbstractWorker; the extends
        // clause repeats EventTarget without duplicating it
        assert_eq!(
            inherits.iter().filter(|s| s.as_str() == "EventTarget").count(),
            1
        );
        assert!(inherits.contains(&"AbstractWorker".to_string()));
    }

    #[test]
    fn method_signature_fragments_are_prerendered() {
        let model = build(&[
            "interface M { go<T extends object>(a: string, b?: number, ...rest: T[]): boolean; }\ndeclare var M: M;",
        ]);

        let root = model.registry["M"];
        let go = model.arena.get(root).members[0];
        let e = model.arena.get(go);
        assert_eq!(
            e.params,
            vec!["string", "(optional number)", "(rest (array T))"]
        );
        assert_eq!(e.type_params, vec!["(extends T object)"]);
        assert_eq!(e.return_type.as_deref(), Some("boolean"));
    }

    #[test]
    fn predicate_return_sets_assertion_flag() {
        let model = build(&[
            "interface Check { isNode(x: unknown): x is Node; }\ndeclare var Check: Check;",
        ]);

        let root = model.registry["Check"];
        let m = model.arena.get(root).members[0];
        assert!(model.arena.get(m).flags.is_type_assertion);
    }

    #[test]
    fn alias_reference_resolves_one_step() {
        let model = build(&[
            "type Level = \"info\" | \"warn\";\ninterface Log { level: Level; }\ndeclare var Log: Log;",
        ]);

        let root = model.registry["Log"];
        let level = model.arena.get(root).members[0];
        assert_eq!(
            model.arena.get(level).literal.as_deref(),
            Some("(or \"info\" \"warn\")")
        );
    }
}
