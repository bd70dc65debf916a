//! # `jsonschema` Backend
//!
//! In-process validation with the `jsonschema` crate. The draft is taken
//! from each schema's `$schema` keyword unless pinned with
//! [`JsonSchemaBackend::with_draft`].
//!
//! Violations are described only when `debug` logging is enabled, and are
//! logged and discarded; the harness sees nothing but the verdict.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use hfv_core::{ValidatorError, Validity};
use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{CompiledSchema, ValidatorBackend};
use crate::retriever::LocalSchemaRetriever;
use crate::store::Schema;

/// JSON Schema drafts a backend can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaDraft {
    /// Draft 4.
    Draft4,
    /// Draft 6.
    Draft6,
    /// Draft 7.
    Draft7,
    /// Draft 2019-09.
    #[serde(rename = "draft2019-09")]
    Draft201909,
    /// Draft 2020-12.
    #[serde(rename = "draft2020-12")]
    Draft202012,
}

impl SchemaDraft {
    /// Returns the label accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft4 => "draft4",
            Self::Draft6 => "draft6",
            Self::Draft7 => "draft7",
            Self::Draft201909 => "draft2019-09",
            Self::Draft202012 => "draft2020-12",
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaDraft {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft4" => Ok(Self::Draft4),
            "draft6" => Ok(Self::Draft6),
            "draft7" => Ok(Self::Draft7),
            "draft2019-09" => Ok(Self::Draft201909),
            "draft2020-12" => Ok(Self::Draft202012),
            other => Err(format!("unknown JSON Schema draft '{other}'")),
        }
    }
}

impl From<SchemaDraft> for Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => Draft::Draft4,
            SchemaDraft::Draft6 => Draft::Draft6,
            SchemaDraft::Draft7 => Draft::Draft7,
            SchemaDraft::Draft201909 => Draft::Draft201909,
            SchemaDraft::Draft202012 => Draft::Draft202012,
        }
    }
}

/// Validator backend built on the `jsonschema` crate.
#[derive(Debug, Clone)]
pub struct JsonSchemaBackend {
    schemas_root: PathBuf,
    draft: Option<SchemaDraft>,
}

impl JsonSchemaBackend {
    /// Create a backend resolving cross-schema `$ref`s under `schemas_root`.
    pub fn new(schemas_root: impl Into<PathBuf>) -> Self {
        Self {
            schemas_root: schemas_root.into(),
            draft: None,
        }
    }

    /// Pin every schema to `draft` instead of detecting it from `$schema`.
    pub fn with_draft(mut self, draft: Option<SchemaDraft>) -> Self {
        self.draft = draft;
        self
    }
}

impl ValidatorBackend for JsonSchemaBackend {
    fn name(&self) -> &str {
        "jsonschema"
    }

    fn compile(&self, schema: &Schema) -> Result<Box<dyn CompiledSchema>, ValidatorError> {
        let mut opts = jsonschema::options();
        if let Some(draft) = self.draft {
            opts.with_draft(draft.into());
        }
        opts.with_retriever(LocalSchemaRetriever::new(&self.schemas_root));

        let validator = opts
            .build(schema.document())
            .map_err(|e| ValidatorError::Compile {
                schema: schema.name().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Box::new(CompiledJsonSchema {
            schema_name: schema.name().to_string(),
            validator,
        }))
    }
}

struct CompiledJsonSchema {
    schema_name: String,
    validator: Validator,
}

/// `<instance path>: <message>` for every violation, `(root)` for the root.
fn describe_violations(validator: &Validator, instance: &Value) -> Vec<String> {
    validator
        .iter_errors(instance)
        .map(|e| {
            let location = e.instance_path.to_string();
            let location = if location.is_empty() { "(root)" } else { &location };
            format!("{location}: {e}")
        })
        .collect()
}

impl CompiledSchema for CompiledJsonSchema {
    fn check(&self, instance: &Value) -> Result<Validity, ValidatorError> {
        if self.validator.is_valid(instance) {
            return Ok(Validity::Valid);
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            let violations = describe_violations(&self.validator, instance);
            tracing::debug!(
                schema = %self.schema_name,
                count = violations.len(),
                violations = %violations.join("; "),
                "instance rejected"
            );
        }
        Ok(Validity::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point_schema() -> Schema {
        Schema::new(
            "point",
            "point.schema.json",
            json!({
                "type": "object",
                "required": ["x"],
                "properties": { "x": { "type": "number" } }
            }),
        )
    }

    fn backend() -> JsonSchemaBackend {
        JsonSchemaBackend::new(std::env::temp_dir())
    }

    #[test]
    fn conforming_instance_is_valid() {
        let verdict = backend().check(&point_schema(), &json!({"x": 1})).unwrap();
        assert_eq!(verdict, Validity::Valid);
    }

    #[test]
    fn violating_instance_is_invalid_not_error() {
        let compiled = backend().compile(&point_schema()).unwrap();
        assert_eq!(compiled.check(&json!({"x": "a"})).unwrap(), Validity::Invalid);
        assert_eq!(compiled.check(&json!({})).unwrap(), Validity::Invalid);
        assert_eq!(compiled.check(&json!([1])).unwrap(), Validity::Invalid);
    }

    #[test]
    fn structurally_invalid_schema_is_compile_error() {
        let schema = Schema::new("bad", "bad.schema.json", json!({"type": 12}));
        let err = backend().compile(&schema).err().unwrap();
        assert!(
            matches!(err, ValidatorError::Compile { ref schema, .. } if schema == "bad"),
            "Expected Compile error, got: {err}"
        );
    }

    #[test]
    fn pinned_draft_still_validates() {
        let backend = backend().with_draft(Some(SchemaDraft::Draft7));
        let compiled = backend.compile(&point_schema()).unwrap();
        assert_eq!(compiled.check(&json!({"x": 2.5})).unwrap(), Validity::Valid);
        assert_eq!(compiled.check(&json!({"x": null})).unwrap(), Validity::Invalid);
    }

    #[test]
    fn draft_labels_round_trip() {
        for draft in [
            SchemaDraft::Draft4,
            SchemaDraft::Draft6,
            SchemaDraft::Draft7,
            SchemaDraft::Draft201909,
            SchemaDraft::Draft202012,
        ] {
            assert_eq!(draft.as_str().parse::<SchemaDraft>().unwrap(), draft);
        }
        assert!("draft3".parse::<SchemaDraft>().is_err());
    }

    #[test]
    fn violations_name_instance_locations() {
        let validator = jsonschema::validator_for(point_schema().document()).unwrap();
        assert!(describe_violations(&validator, &json!({"x": 1})).is_empty());

        let missing = describe_violations(&validator, &json!({}));
        assert_eq!(missing.len(), 1);
        assert!(missing[0].starts_with("(root): "), "{missing:?}");

        let wrong_type = describe_violations(&validator, &json!({"x": "a"}));
        assert!(wrong_type[0].starts_with("/x: "), "{wrong_type:?}");
    }
}
