//! # Harness Configuration
//!
//! Defaults come from the repository layout (`<root>/schemas`,
//! `<root>/vectors`, built-in suite table). A manifest file may replace the
//! suite table and override the directories and missing-data policy:
//!
//! ```yaml
//! schemas_dir: ../schemas        # relative to the manifest's directory
//! vectors_dir: ../vectors
//! missing_data: warn
//! suites:
//!   - schema: domain-event
//!     vectors: domain-event/events.json
//!     valid_key: valid_events
//!     invalid_key: invalid
//! ```

use std::path::{Path, PathBuf};

use hfv_schema::read_document;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::suite::{default_suites, VectorSuite};
use crate::vectors::MissingDataPolicy;

/// A suite manifest as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Schemas root, relative to the manifest's directory.
    #[serde(default)]
    pub schemas_dir: Option<PathBuf>,
    /// Vectors root, relative to the manifest's directory.
    #[serde(default)]
    pub vectors_dir: Option<PathBuf>,
    /// Treatment of invalid entries without `data`.
    #[serde(default)]
    pub missing_data: Option<MissingDataPolicy>,
    /// Suites to run, in order.
    pub suites: Vec<VectorSuite>,
}

impl Manifest {
    /// Read a manifest (JSON, or YAML by extension).
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let value = read_document(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let manifest: Self = serde_json::from_value(value).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if manifest.suites.is_empty() {
            return Err(HarnessError::Config {
                path: path.to_path_buf(),
                reason: "manifest lists no suites".to_string(),
            });
        }
        Ok(manifest)
    }
}

/// Everything a run needs besides the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Directory holding `<name>.schema.json` files.
    pub schemas_dir: PathBuf,
    /// Directory vector locators are relative to.
    pub vectors_dir: PathBuf,
    /// Treatment of invalid entries without `data`.
    pub missing_data: MissingDataPolicy,
    /// Record suite load failures and continue instead of aborting.
    pub keep_going: bool,
    /// Suites to run, in order.
    pub suites: Vec<VectorSuite>,
}

impl HarnessConfig {
    /// Defaults for a repository rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        Self {
            schemas_dir: root.join("schemas"),
            vectors_dir: root.join("vectors"),
            missing_data: MissingDataPolicy::default(),
            keep_going: false,
            suites: default_suites(),
        }
    }

    /// Apply a manifest read from `manifest_path`.
    ///
    /// Relative directories in the manifest resolve against the manifest's
    /// own directory.
    pub fn apply_manifest(&mut self, manifest: Manifest, manifest_path: &Path) {
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        if let Some(dir) = manifest.schemas_dir {
            self.schemas_dir = base.join(dir);
        }
        if let Some(dir) = manifest.vectors_dir {
            self.vectors_dir = base.join(dir);
        }
        if let Some(policy) = manifest.missing_data {
            self.missing_data = policy;
        }
        self.suites = manifest.suites;
    }

    /// Keep only the suites whose schema name is in `names`, preserving
    /// configured order. An empty selection keeps everything.
    pub fn select_suites(&mut self, names: &[String]) -> Result<(), HarnessError> {
        if names.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.suites.iter().any(|s| &s.schema == *n))
        {
            return Err(HarnessError::Config {
                path: PathBuf::from("--suite"),
                reason: format!("no configured suite for schema '{unknown}'"),
            });
        }
        self.suites.retain(|s| names.contains(&s.schema));
        Ok(())
    }
}
