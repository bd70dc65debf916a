//! # hfv-harness: Golden-Vector Conformance Harness
//!
//! Loads vector files, drives a [`ValidatorBackend`](hfv_schema::ValidatorBackend)
//! over every vector, and aggregates the outcomes into a [`RunReport`].
//!
//! ## Flow
//!
//! 1. [`HarnessConfig`] names the schemas root, the vectors root, and the
//!    ordered list of [`VectorSuite`]s (built-in table or a manifest file).
//! 2. [`SuiteRunner::run`] loads the suite's schema and vector file,
//!    compiles the schema once, and checks every vector in file order:
//!    the valid group first, then the invalid group.
//! 3. Each verdict becomes an [`Outcome`]. A live `[PASS]`/`[FAIL]` line is
//!    written and flushed per vector.
//! 4. [`RunReport`] renders the summary and derives the process exit code.
//!
//! ## Crate Policy
//!
//! - No process-wide state: every run owns its `RunReport`.
//! - A mismatch is data. Only load failures, validator malfunctions and
//!   output errors are `Err`.

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod suite;
pub mod vectors;

pub use config::{HarnessConfig, Manifest};
pub use error::HarnessError;
pub use report::{CrossRunnerResult, Outcome, RunReport, SuiteFailure, SuiteSummary, ValidatorFailure};
pub use runner::{execute, SuiteRunner};
pub use suite::{default_suites, VectorSuite};
pub use vectors::{MissingDataPolicy, VectorEntry, VectorFile};
