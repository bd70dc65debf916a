//! # hfv-core: Foundational Types for the Golden-Vector Runner
//!
//! Shared vocabulary for every other `hfv-*` crate. Depends on nothing
//! internal.
//!
//! ## Key Types
//!
//! - [`Validity`]: the two-valued outcome of checking an instance against
//!   a schema. "Instance invalid" is a value, never an error.
//! - [`LoadError`]: fatal failures while reading schema or vector files.
//! - [`ValidatorError`]: a validator backend malfunctioned. Kept distinct
//!   from [`Validity::Invalid`] so the two can never be conflated.
//! - [`CanonicalBytes`] / [`ContentDigest`]: RFC 8785 canonical JSON and
//!   its SHA-256 digest, used to fingerprint vector files across runners.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hfv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod validity;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, LoadError, ResourceKind, ValidatorError};
pub use validity::Validity;
