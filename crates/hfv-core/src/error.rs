//! # Error Types: Load and Validator Failures
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Load errors name the path that was expected or could not be parsed.
//!   "File absent" and "file present but unparsable" are separate variants.
//! - Validator errors describe a malfunction of the validation mechanism
//!   itself. An instance failing its schema is not an error; it is
//!   [`Validity::Invalid`](crate::Validity::Invalid).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which kind of input file a [`LoadError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A schema document under the schemas root.
    Schema,
    /// A golden-vector file under the vectors root.
    VectorFile,
}

impl ResourceKind {
    /// Returns the human-readable label used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::VectorFile => "vector file",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal failure while loading a schema or vector file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file does not exist at the resolved location.
    #[error("{kind} not found: {}", path.display())]
    NotFound {
        /// What was being loaded.
        kind: ResourceKind,
        /// The location that was expected to exist.
        path: PathBuf,
    },

    /// The schema file exists but is not a usable schema document.
    #[error("malformed schema {}: {reason}", path.display())]
    MalformedSchema {
        /// Path to the schema file.
        path: PathBuf,
        /// Why the content was rejected.
        reason: String,
    },

    /// The vector file exists but does not have the expected shape.
    #[error("malformed vector file {}: {reason}", path.display())]
    MalformedVectorFile {
        /// Path to the vector file.
        path: PathBuf,
        /// Why the content was rejected.
        reason: String,
    },
}

/// The validation mechanism malfunctioned.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// The backend refused to compile the schema (e.g. the schema is
    /// structurally invalid, or a `$ref` could not be resolved).
    #[error("validator could not compile schema '{schema}': {reason}")]
    Compile {
        /// Schema name.
        schema: String,
        /// Backend-provided reason.
        reason: String,
    },

    /// The backend failed while checking a single instance.
    #[error("validator failed while checking against schema '{schema}': {reason}")]
    Check {
        /// Schema name.
        schema: String,
        /// Backend-provided reason.
        reason: String,
    },

    /// The backend itself is misconfigured or unavailable.
    #[error("validator backend unavailable: {reason}")]
    Backend {
        /// What went wrong.
        reason: String,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
