//! # Harness Errors

use std::path::PathBuf;

use hfv_core::{LoadError, ValidatorError};
use thiserror::Error;

/// A failure that stops a suite (or the whole run).
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A schema or vector file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The validator backend malfunctioned while preparing a suite.
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// A manifest or suite selection is unusable.
    #[error("configuration error in {}: {reason}", path.display())]
    Config {
        /// The manifest path, or the selection source.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// Progress or report output could not be written.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
