//! # Schema Loader
//!
//! Resolves schema names to files under a fixed schemas root:
//!
//! ```text
//! <root>/<name>.schema.json     preferred
//! <root>/<name>.schema.yaml     YAML-authored alternative
//! <root>/<name>.schema.yml
//! ```
//!
//! Loaded schemas are cached by name for the lifetime of the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hfv_core::{LoadError, ResourceKind};
use serde_json::Value;

use crate::document::{read_document, DocumentError};

/// File suffixes tried, in order, when resolving a schema name.
const SCHEMA_SUFFIXES: [&str; 3] = [".schema.json", ".schema.yaml", ".schema.yml"];

/// A parsed schema document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    path: PathBuf,
    document: Value,
}

impl Schema {
    /// Wrap an already-parsed schema document.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, document: Value) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            document,
        }
    }

    /// The name the schema was requested by (e.g. `"domain-event"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the schema was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

/// Loads and caches schemas from a schemas root directory.
#[derive(Debug)]
pub struct SchemaStore {
    root: PathBuf,
    cache: HashMap<String, Arc<Schema>>,
}

impl SchemaStore {
    /// Create a store rooted at `root`. Nothing is read until [`load`](Self::load).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// The canonical location for `name`, whether or not it exists.
    pub fn expected_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{}", SCHEMA_SUFFIXES[0]))
    }

    /// The first existing file for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        SCHEMA_SUFFIXES
            .iter()
            .map(|suffix| self.root.join(format!("{name}{suffix}")))
            .find(|path| path.is_file())
    }

    /// Load a schema by name.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` naming [`expected_path`](Self::expected_path)
    /// when no candidate file exists, and `LoadError::MalformedSchema` when the
    /// file cannot be read or parsed, or parses to something that is neither
    /// an object nor a boolean schema.
    pub fn load(&mut self, name: &str) -> Result<Arc<Schema>, LoadError> {
        if let Some(schema) = self.cache.get(name) {
            return Ok(Arc::clone(schema));
        }

        let path = self.resolve(name).ok_or_else(|| LoadError::NotFound {
            kind: ResourceKind::Schema,
            path: self.expected_path(name),
        })?;

        let document = read_document(&path).map_err(|e| match e {
            DocumentError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                LoadError::NotFound {
                    kind: ResourceKind::Schema,
                    path: path.clone(),
                }
            }
            other => LoadError::MalformedSchema {
                path: path.clone(),
                reason: other.to_string(),
            },
        })?;

        if !(document.is_object() || document.is_boolean()) {
            return Err(LoadError::MalformedSchema {
                path,
                reason: "schema document must be a JSON object or boolean".to_string(),
            });
        }

        tracing::debug!(schema = name, path = %path.display(), "loaded schema");

        let schema = Arc::new(Schema::new(name, path, document));
        self.cache.insert(name.to_string(), Arc::clone(&schema));
        Ok(schema)
    }
}
