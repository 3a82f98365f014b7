//! Catalog extraction for TypeScript declaration files.
//!
//! This crate reads a set of `.d.ts` declaration fragments and produces
//! a normalized catalog of the global API surface they describe:
//! objects, constructors, properties, methods, and events, with type
//! expressions rendered in a compact canonical notation.
//!
//! The pipeline is a synchronous four-stage batch: pre-classify every
//! fragment, build the symbol model, resolve inheritance, serialize.

mod ast;
mod builder;
mod classify;
mod entity;
mod error;
mod inherit;
mod lexer;
mod notation;
mod parser;
mod relations;
mod serialize;

pub use ast::{Decl, Fragment, Member, TypeExpr};
pub use builder::{BuiltModel, ModelBuilder, GLOBAL_SCOPE};
pub use classify::{Classification, Shape};
pub use entity::{render_key, Entity, EntityArena, EntityId, EntityKind};
pub use error::CatalogError;
pub use lexer::{Lexer, Token, TokenKind};
pub use notation::{render, NotationOptions};
pub use parser::{parse, parse_type_str, ParseError, ParseResult};
pub use relations::{Relation, RelationTable};
pub use serialize::serialize_catalog;

use std::path::PathBuf;

/// Read and parse every fragment path. Fails fast: an unreadable or
/// unparsable fragment is a startup error, and so is an empty list.
pub fn load_fragments(paths: &[PathBuf]) -> Result<Vec<Fragment>, CatalogError> {
    if paths.is_empty() {
        return Err(CatalogError::NoInput);
    }

    let mut fragments = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        let fragment = parse(&source).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;
        fragments.push(fragment);
    }
    Ok(fragments)
}

/// Run the full pipeline over parsed fragments and return the catalog
/// document.
pub fn build_catalog(
    fragments: &[Fragment],
    relations: &RelationTable,
    opts: NotationOptions,
) -> Result<serde_json::Value, CatalogError> {
    let classes = Classification::scan(fragments);
    let mut model = ModelBuilder::new(&classes, relations, opts).build(fragments)?;
    inherit::resolve(&mut model);
    Ok(serialize_catalog(&model))
}
