//! # Validator Adapter
//!
//! The harness drives validation only through these two traits. A backend
//! compiles each schema once per suite; the compiled form is then asked
//! about every vector in that suite.

use hfv_core::{ValidatorError, Validity};
use serde_json::Value;

use crate::store::Schema;

/// A schema prepared by a backend for repeated checks.
pub trait CompiledSchema {
    /// Classify `instance` as valid or invalid.
    ///
    /// Constraint violations yield `Ok(Validity::Invalid)`. An `Err` means
    /// the backend could not reach a verdict at all.
    fn check(&self, instance: &Value) -> Result<Validity, ValidatorError>;
}

/// A JSON Schema validation mechanism.
pub trait ValidatorBackend {
    /// Short identifier used in logs and reports (e.g. `"jsonschema"`).
    fn name(&self) -> &str;

    /// Prepare `schema` for checking.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorError::Compile` if the backend rejects the schema.
    fn compile(&self, schema: &Schema) -> Result<Box<dyn CompiledSchema>, ValidatorError>;

    /// One-shot check: compile `schema` and classify `instance`.
    fn check(&self, schema: &Schema, instance: &Value) -> Result<Validity, ValidatorError> {
        self.compile(schema)?.check(instance)
    }
}
