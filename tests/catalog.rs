//! End-to-end catalog tests: fragments in, JSON document out.

use std::fs;

use serde_json::Value;

use dts_catalog::{
    build_catalog, load_fragments, parse, CatalogError, Fragment, NotationOptions, RelationTable,
};

fn catalog_of(sources: &[&str]) -> Value {
    let fragments: Vec<Fragment> = sources
        .iter()
        .map(|s| parse(s).expect("fixture should parse"))
        .collect();
    build_catalog(
        &fragments,
        &RelationTable::bundled(),
        NotationOptions::default(),
    )
    .expect("catalog should build")
}

fn member<'a>(root: &'a Value, name: &str) -> &'a Value {
    root["members"]
        .as_array()
        .expect("root should have members")
        .iter()
        .find(|m| m["name"] == name)
        .unwrap_or_else(|| panic!("no member named {name:?}"))
}

/// The constructor/instance duality: a variable, its constructor-shaped
/// interface, and a co-named instance interface collapse into one root.
#[test]
fn constructor_variable_trio_builds_one_root() {
    let value = catalog_of(&[
        "interface Foo { bar(): void; }",
        "interface FooConstructor { new (): Foo; readonly prototype: Foo; }",
        "declare var Foo: FooConstructor;",
    ]);

    let root = &value["Foo"];
    assert_eq!(root["kind"], "object");

    let ctor = member(root, "constructor");
    assert_eq!(ctor["kind"], "constructor");
    assert_eq!(ctor["flags"], serde_json::json!(["static"]));

    let proto = member(root, "prototype");
    assert_eq!(proto["kind"], "property");
    assert_eq!(proto["flags"], serde_json::json!(["static"]));
    assert_eq!(proto["key"], "Foo::");

    let bar = member(root, "bar");
    assert_eq!(bar["kind"], "method");
    assert_eq!(bar["key"], "Foo::bar");
    assert!(bar.get("flags").is_none(), "instance method has no flags");
}

/// Two fragments resolving to the same effective name merge their
/// members into one root, without duplicates.
#[test]
fn declaration_merging_across_fragments() {
    let value = catalog_of(&[
        "interface Env { alpha(): void; }\ndeclare var Env: Env;",
        "interface Env { alpha(): void; beta(): void; }",
    ]);

    let members = value["Env"]["members"].as_array().unwrap();
    let alphas = members.iter().filter(|m| m["name"] == "alpha").count();
    assert_eq!(alphas, 1, "merged fragments must not duplicate members");
    assert!(members.iter().any(|m| m["name"] == "beta"));
}

/// Root `A` declaring source `B` picks up `B`'s members after
/// resolution.
#[test]
fn inheritance_contributes_source_members() {
    let value = catalog_of(&[
        "interface B { m(): void; }\ndeclare var B: B;",
        "interface A extends B { own(): void; }\ndeclare var A: A;",
    ]);

    let root = &value["A"];
    assert!(root["inherits"]
        .as_array()
        .unwrap()
        .contains(&Value::String("B".to_string())));
    assert_eq!(member(root, "m")["kind"], "method");
}

/// The relationship table feeds sources even without an extends clause.
#[test]
fn relation_table_supplies_sources() {
    let value = catalog_of(&[
        "interface EventTarget { dispatch(): boolean; }\ndeclare var EventTarget: EventTarget;",
        "interface Worker { post(msg: string): void; }\ndeclare var Worker: Worker;",
    ]);

    // Worker -> EventTarget comes from the bundled table
    let root = &value["Worker"];
    assert_eq!(member(root, "dispatch")["key"], "EventTarget::dispatch");
}

/// Computed symbol names attach to their key without a joining dot.
#[test]
fn computed_member_keys() {
    let value = catalog_of(&[
        "interface Arr { [Symbol.iterator](): Arr; slice(start: number): Arr; }\ndeclare var Arr: Arr;",
    ]);

    let root = &value["Arr"];
    assert_eq!(member(root, "[Symbol.iterator]")["key"], "Arr[Symbol.iterator]");
    assert_eq!(member(root, "slice")["key"], "Arr::slice");
}

/// An unrecognized type kind renders an inline marker and never aborts
/// the run; sibling members still serialize.
#[test]
fn unknown_type_kind_degrades_locally() {
    let value = catalog_of(&[
        "interface Host { plugin: import(\"ext\").Plugin; label: string; }\ndeclare var Host: Host;",
    ]);

    let root = &value["Host"];
    assert_eq!(member(root, "plugin")["literal"], "<unknown:import>");
    assert_eq!(member(root, "label")["literal"], "string");
}

/// Serializing an unchanged input set twice yields identical output.
#[test]
fn catalog_output_is_deterministic() {
    let sources = [
        "interface Doc { title: string; open(url: string): Doc; onload: ((ev: unknown) => void) | null; }\ndeclare var Doc: Doc;",
        "declare namespace Intl { function getCanonicalLocales(l: string[]): string[]; }",
        "declare var release: `v${number}`;",
    ];

    let first = serde_json::to_string(&catalog_of(&sources)).unwrap();
    let second = serde_json::to_string(&catalog_of(&sources)).unwrap();
    assert_eq!(first, second);
}

/// Handler-shaped properties are catalogued as events.
#[test]
fn event_members() {
    let value = catalog_of(&[
        "interface Chan { onmessage: ((ev: unknown) => void) | null; online: boolean; }\ndeclare var Chan: Chan;",
    ]);

    let root = &value["Chan"];
    assert_eq!(member(root, "onmessage")["kind"], "event");
    // "online" has no function type anywhere, so it stays a property
    assert_eq!(member(root, "online")["kind"], "property");
}

/// Top-level values land on the global scope root and are always
/// static.
#[test]
fn global_scope_collects_top_level_values() {
    let value = catalog_of(&[
        "declare var version: string;\ndeclare function probe(name: string): boolean;",
    ]);

    let root = &value["globalThis"];
    let version = member(root, "version");
    assert_eq!(version["flags"], serde_json::json!(["static"]));
    assert_eq!(version["key"], "globalThis.version");

    let probe = member(root, "probe");
    assert_eq!(probe["kind"], "method");
    assert_eq!(probe["params"], "string");
    assert_eq!(probe["returns"], "boolean");
}

/// Fragments come off the file system through the same path the binary
/// uses.
#[test]
fn fragments_load_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.d.ts");
    let b = dir.path().join("b.d.ts");
    fs::write(&a, "interface Foo { bar(): void; }\ndeclare var Foo: Foo;").unwrap();
    fs::write(&b, "interface Foo { baz(): void; }").unwrap();

    let fragments = load_fragments(&[a, b]).expect("fragments should load");
    let value = build_catalog(
        &fragments,
        &RelationTable::bundled(),
        NotationOptions::default(),
    )
    .unwrap();

    let root = &value["Foo"];
    assert_eq!(member(root, "bar")["kind"], "method");
    assert_eq!(member(root, "baz")["kind"], "method");
}

/// Zero fragments and unreadable fragments are startup errors, distinct
/// from everything else.
#[test]
fn startup_errors_are_classified() {
    let err = load_fragments(&[]).expect_err("empty input should fail");
    assert!(matches!(err, CatalogError::NoInput));
    assert!(err.is_startup());

    let missing = vec![std::path::PathBuf::from("/nonexistent/missing.d.ts")];
    let err = load_fragments(&missing).expect_err("missing file should fail");
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.is_startup());
}

/// Verbose notation prefixes every node with its raw kind tag.
#[test]
fn verbose_types_mode() {
    let fragments =
        vec![parse("interface V { x: string | null; }\ndeclare var V: V;").unwrap()];
    let value = build_catalog(
        &fragments,
        &RelationTable::bundled(),
        NotationOptions { verbose: true },
    )
    .unwrap();

    assert_eq!(
        member(&value["V"], "x")["literal"],
        "[Union](or [Token]string [Token]null)"
    );
}
