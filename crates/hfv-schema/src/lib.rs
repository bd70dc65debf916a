//! # hfv-schema: Schema Loading & Validator Backends
//!
//! ## Schema Loader (`store`)
//!
//! [`SchemaStore::load`] resolves a schema name to
//! `<schemas_root>/<name>.schema.json` (or a YAML sibling), parses it, and
//! caches the result by name. Schemas are immutable once loaded and are
//! shared as `Arc<Schema>`.
//!
//! ## Validator Adapter (`backend`)
//!
//! [`ValidatorBackend`] is the seam the harness is polymorphic over. A
//! backend compiles a [`Schema`] once into a [`CompiledSchema`], which then
//! classifies instances as [`Validity::Valid`](hfv_core::Validity::Valid)
//! or [`Validity::Invalid`](hfv_core::Validity::Invalid). Backend
//! malfunction surfaces as [`ValidatorError`](hfv_core::ValidatorError),
//! never as an invalid verdict.
//!
//! Backends:
//!
//! - [`JsonSchemaBackend`]: in-process validation with the `jsonschema`
//!   crate. Cross-schema `$ref`s resolve against the schemas root through
//!   [`LocalSchemaRetriever`]; no network requests are made.
//! - [`CommandBackend`]: drives an external validator program, which is
//!   how runners written in other languages are checked against the same
//!   vectors.

pub mod backend;
pub mod command;
pub mod document;
pub mod json_schema;
pub mod retriever;
pub mod store;

pub use backend::{CompiledSchema, ValidatorBackend};
pub use command::CommandBackend;
pub use document::{parse_document, read_document, DocumentError, DocumentFormat};
pub use json_schema::{JsonSchemaBackend, SchemaDraft};
pub use retriever::LocalSchemaRetriever;
pub use store::{Schema, SchemaStore};
