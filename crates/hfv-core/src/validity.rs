//! # Validity
//!
//! The outcome of checking one instance against one schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an instance conforms to a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validity {
    /// The instance conforms.
    Valid,
    /// The instance violates at least one constraint.
    Invalid,
}

impl Validity {
    /// Map a "conforms" boolean to a validity.
    pub fn from_conforms(conforms: bool) -> Self {
        if conforms {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    /// Returns the lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
