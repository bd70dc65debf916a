//! # Local `$ref` Retrieval
//!
//! Schemas reference each other by `$id` URIs such as
//! `https://schemas.0xhoneyjar.com/loa-hounfour/<version>/<name>`. These
//! URIs are resolved to files in the schemas root by their last path
//! segment, so validation never touches the network.

use std::path::PathBuf;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;

use crate::document::read_document;

/// Resolves `$ref` URIs to schema files under a local root directory.
///
/// For a URI whose last path segment is `<seg>`, the candidates are, in
/// order: `<root>/<seg>`, `<root>/<seg>.schema.json`, `<root>/<seg>.json`.
/// A URI with no matching file is an error; it is never fetched remotely.
#[derive(Debug, Clone)]
pub struct LocalSchemaRetriever {
    root: PathBuf,
}

impl LocalSchemaRetriever {
    /// Create a retriever over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The file a URI maps to, if one exists.
    pub fn locate(&self, uri: &str) -> Option<PathBuf> {
        let without_fragment = uri.split('#').next().unwrap_or(uri);
        let segment = without_fragment
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())?;

        [
            segment.to_string(),
            format!("{segment}.schema.json"),
            format!("{segment}.json"),
        ]
        .into_iter()
        .map(|candidate| self.root.join(candidate))
        .find(|path| path.is_file())
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let path = self.locate(uri_str).ok_or_else(|| {
            format!(
                "cannot resolve $ref '{uri_str}': no matching schema in {}",
                self.root.display()
            )
        })?;

        tracing::trace!(uri = uri_str, path = %path.display(), "resolved $ref locally");
        Ok(read_document(&path)?)
    }
}
