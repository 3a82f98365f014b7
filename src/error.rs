//! Error taxonomy for catalog construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// A fatal condition encountered while building a catalog.
///
/// Recoverable conditions (an unrecognized type-expression kind, missing
/// optional data) never surface here; they are handled locally where they
/// occur.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A declaration node did not have the shape a visitor requires.
    /// This is a contract violation between pipeline stages and aborts
    /// the run; the message carries the offending value.
    #[error("contract violation: {0}")]
    Contract(String),

    /// A fragment failed to parse.
    #[error("parse error in {path}: {source}", path = .path.display())]
    Parse { path: PathBuf, source: ParseError },

    /// A fragment could not be read.
    #[error("failed to read {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The run was started with an empty fragment list.
    #[error("no declaration fragments given")]
    NoInput,
}

impl CatalogError {
    /// Whether this error belongs to the startup class (bad input set,
    /// unreadable or unparsable fragments), which maps to its own exit
    /// status distinct from mid-run contract violations.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            CatalogError::Parse { .. } | CatalogError::Io { .. } | CatalogError::NoInput
        )
    }
}
