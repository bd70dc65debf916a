//! # Vector Loader
//!
//! A vector file is a JSON (or YAML) object holding two named arrays:
//!
//! ```json
//! {
//!   "valid_entries":   [ { "id": "alloc-basic", "data": { ... } } ],
//!   "invalid_entries": [ { "id": "alloc-negative", "data": { ... } },
//!                        { "id": "alloc-shape-note", "note": "documents a shape only" } ]
//! }
//! ```
//!
//! Entries in the valid group must carry `data`. Entries in the invalid
//! group may omit it; such signal-only entries are kept but never
//! validated. What happens to them is governed by [`MissingDataPolicy`].
//! Presence is what counts: `"data": null` is a payload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hfv_core::{sha256_digest, CanonicalBytes, ContentDigest, LoadError, ResourceKind};
use hfv_schema::{read_document, DocumentError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Treatment of invalid-group entries that carry no `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDataPolicy {
    /// Skip silently.
    #[default]
    Skip,
    /// Skip, logging a warning per entry.
    Warn,
    /// Reject the vector file as malformed.
    Fail,
}

impl MissingDataPolicy {
    /// Returns the label accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for MissingDataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingDataPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown missing-data policy '{other}'")),
        }
    }
}

/// One golden vector.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    /// Identifier used in progress lines and failure reports.
    pub id: String,
    /// The instance to validate. `None` only for signal-only invalid entries.
    pub data: Option<Value>,
    /// Free-text annotation carried by the fixture.
    pub note: Option<String>,
}

/// A parsed vector file.
#[derive(Debug, Clone)]
pub struct VectorFile {
    path: PathBuf,
    valid: Vec<VectorEntry>,
    invalid: Vec<VectorEntry>,
    digest: ContentDigest,
}

impl VectorFile {
    /// Read and parse the vector file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` when the file does not exist and
    /// `LoadError::MalformedVectorFile` when it cannot be parsed or has the
    /// wrong shape (see [`from_value`](Self::from_value)).
    pub fn load(
        path: &Path,
        valid_key: &str,
        invalid_key: &str,
        policy: MissingDataPolicy,
    ) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound {
                kind: ResourceKind::VectorFile,
                path: path.to_path_buf(),
            });
        }

        let value = read_document(path).map_err(|e| match e {
            DocumentError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                LoadError::NotFound {
                    kind: ResourceKind::VectorFile,
                    path: path.to_path_buf(),
                }
            }
            other => malformed(path, other.to_string()),
        })?;

        Self::from_value(path, &value, valid_key, invalid_key, policy)
    }

    /// Build a vector file from an already-parsed document.
    ///
    /// An absent group key yields an empty group.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MalformedVectorFile` when the top level is not an
    /// object, a group is not an array, an entry is not an object or lacks a
    /// string `id`, a valid-group entry lacks `data`, or (under
    /// [`MissingDataPolicy::Fail`]) an invalid-group entry lacks `data`.
    pub fn from_value(
        path: &Path,
        value: &Value,
        valid_key: &str,
        invalid_key: &str,
        policy: MissingDataPolicy,
    ) -> Result<Self, LoadError> {
        let root = value
            .as_object()
            .ok_or_else(|| malformed(path, "top level must be an object".to_string()))?;

        let valid = parse_group(path, root, valid_key, true)?;
        let invalid = parse_group(path, root, invalid_key, policy == MissingDataPolicy::Fail)?;

        let canonical = CanonicalBytes::new(value)
            .map_err(|e| malformed(path, format!("cannot canonicalize: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            valid,
            invalid,
            digest: sha256_digest(&canonical),
        })
    }

    /// The file the vectors were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Expected-valid entries, in file order.
    pub fn valid(&self) -> &[VectorEntry] {
        &self.valid
    }

    /// Expected-invalid entries (including signal-only ones), in file order.
    pub fn invalid(&self) -> &[VectorEntry] {
        &self.invalid
    }

    /// Number of invalid-group entries without `data`.
    pub fn payloadless_count(&self) -> usize {
        self.invalid.iter().filter(|e| e.data.is_none()).count()
    }

    /// Number of vectors that will actually be validated.
    pub fn evaluable_count(&self) -> usize {
        self.valid.len() + self.invalid.len() - self.payloadless_count()
    }

    /// Digest of the canonical form of the whole file.
    pub fn digest(&self) -> ContentDigest {
        self.digest
    }
}

fn malformed(path: &Path, reason: String) -> LoadError {
    LoadError::MalformedVectorFile {
        path: path.to_path_buf(),
        reason,
    }
}

fn parse_group(
    path: &Path,
    root: &Map<String, Value>,
    key: &str,
    require_data: bool,
) -> Result<Vec<VectorEntry>, LoadError> {
    let Some(group) = root.get(key) else {
        tracing::debug!(path = %path.display(), group = key, "group absent; treating as empty");
        return Ok(Vec::new());
    };

    let items = group
        .as_array()
        .ok_or_else(|| malformed(path, format!("group '{key}' must be an array")))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let entry = item.as_object().ok_or_else(|| {
                malformed(path, format!("entry {index} in '{key}' must be an object"))
            })?;

            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    malformed(path, format!("entry {index} in '{key}' has no string 'id'"))
                })?
                .to_string();

            let data = entry.get("data").cloned();
            if require_data && data.is_none() {
                return Err(malformed(
                    path,
                    format!("entry '{id}' in '{key}' has no 'data'"),
                ));
            }

            let note = entry.get("note").and_then(Value::as_str).map(str::to_string);

            Ok(VectorEntry { id, data, note })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> &'static Path {
        Path::new("vectors/billing/allocation.json")
    }

    fn sample() -> Value {
        json!({
            "valid_entries": [
                { "id": "v1", "data": { "x": 1 } },
                { "id": "v2", "data": { "x": 2 }, "note": "second" }
            ],
            "invalid_entries": [
                { "id": "i1", "data": { "x": "a" } },
                { "id": "i2", "note": "signal only" },
                { "id": "i3", "data": null }
            ]
        })
    }

    #[test]
    fn groups_parsed_in_order() {
        let file = VectorFile::from_value(
            path(),
            &sample(),
            "valid_entries",
            "invalid_entries",
            MissingDataPolicy::Skip,
        )
        .unwrap();

        let ids: Vec<_> = file.valid().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2"]);
        let ids: Vec<_> = file.invalid().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["i1", "i2", "i3"]);
        assert_eq!(file.valid()[1].note.as_deref(), Some("second"));
    }

    #[test]
    fn payloadless_entries_are_enumerated_not_evaluable() {
        let file = VectorFile::from_value(
            path(),
            &sample(),
            "valid_entries",
            "invalid_entries",
            MissingDataPolicy::Warn,
        )
        .unwrap();
        assert_eq!(file.invalid()[1].data, None);
        assert_eq!(file.payloadless_count(), 1);
        assert_eq!(file.evaluable_count(), 4);
    }

    #[test]
    fn explicit_null_data_is_a_payload() {
        let file = VectorFile::from_value(
            path(),
            &sample(),
            "valid_entries",
            "invalid_entries",
            MissingDataPolicy::Skip,
        )
        .unwrap();
        assert_eq!(file.invalid()[2].data, Some(Value::Null));
    }

    #[test]
    fn fail_policy_rejects_payloadless_entries() {
        let err = VectorFile::from_value(
            path(),
            &sample(),
            "valid_entries",
            "invalid_entries",
            MissingDataPolicy::Fail,
        )
        .unwrap_err();
        match err {
            LoadError::MalformedVectorFile { reason, .. } => assert!(reason.contains("'i2'")),
            other => panic!("Expected MalformedVectorFile, got: {other}"),
        }
    }

    #[test]
    fn absent_groups_are_empty() {
        let file = VectorFile::from_value(path(), &json!({}), "valid", "invalid", MissingDataPolicy::Skip)
            .unwrap();
        assert!(file.valid().is_empty());
        assert!(file.invalid().is_empty());
        assert_eq!(file.evaluable_count(), 0);
    }

    #[test]
    fn valid_entry_without_data_is_malformed() {
        let doc = json!({ "valid": [ { "id": "v1" } ] });
        let err = VectorFile::from_value(path(), &doc, "valid", "invalid", MissingDataPolicy::Skip)
            .unwrap_err();
        assert!(err.to_string().contains("entry 'v1' in 'valid' has no 'data'"));
    }

    #[test]
    fn shape_errors_are_malformed() {
        let cases = [
            json!([]),
            json!({ "valid": {} }),
            json!({ "valid": [ 1 ] }),
            json!({ "valid": [ { "data": {} } ] }),
            json!({ "invalid": [ { "id": 7, "data": {} } ] }),
        ];
        for doc in cases {
            let err = VectorFile::from_value(path(), &doc, "valid", "invalid", MissingDataPolicy::Skip)
                .unwrap_err();
            assert!(
                matches!(err, LoadError::MalformedVectorFile { .. }),
                "Expected MalformedVectorFile for {doc}, got: {err}"
            );
        }
    }

    #[test]
    fn digest_ignores_key_order() {
        let a = json!({ "valid": [ { "id": "v1", "data": { "a": 1, "b": 2 } } ] });
        let b = json!({ "valid": [ { "data": { "b": 2, "a": 1 }, "id": "v1" } ] });
        let fa = VectorFile::from_value(path(), &a, "valid", "invalid", MissingDataPolicy::Skip).unwrap();
        let fb = VectorFile::from_value(path(), &b, "valid", "invalid", MissingDataPolicy::Skip).unwrap();
        assert_eq!(fa.digest(), fb.digest());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = VectorFile::load(&missing, "valid", "invalid", MissingDataPolicy::Skip).unwrap_err();
        match err {
            LoadError::NotFound { kind, path } => {
                assert_eq!(kind, ResourceKind::VectorFile);
                assert_eq!(path, missing);
            }
            other => panic!("Expected NotFound, got: {other}"),
        }
    }

    #[test]
    fn load_unparsable_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{ \"valid\": [").unwrap();
        let err = VectorFile::load(&file, "valid", "invalid", MissingDataPolicy::Skip).unwrap_err();
        assert!(matches!(err, LoadError::MalformedVectorFile { .. }));
    }

    #[test]
    fn load_yaml_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("traces.yaml");
        std::fs::write(&file, "valid:\n  - id: t1\n    data: {x: 1}\ninvalid:\n  - id: t2\n").unwrap();
        let loaded = VectorFile::load(&file, "valid", "invalid", MissingDataPolicy::Skip).unwrap();
        assert_eq!(loaded.valid()[0].data, Some(json!({"x": 1})));
        assert_eq!(loaded.payloadless_count(), 1);
    }

    #[test]
    fn policy_labels_round_trip() {
        for policy in [MissingDataPolicy::Skip, MissingDataPolicy::Warn, MissingDataPolicy::Fail] {
            assert_eq!(policy.as_str().parse::<MissingDataPolicy>().unwrap(), policy);
        }
        assert_eq!(MissingDataPolicy::default(), MissingDataPolicy::Skip);
        assert!("ignore".parse::<MissingDataPolicy>().is_err());
    }
}
