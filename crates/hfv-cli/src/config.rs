//! # Shared Configuration Flags
//!
//! Flags common to `run` and `list`, layered over the repository defaults:
//! built-in table, then `--manifest`, then explicit directory flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use hfv_harness::{HarnessConfig, Manifest, MissingDataPolicy};

/// Where schemas, vectors and suites come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Suite manifest (JSON or YAML) replacing the built-in suite table.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Schemas root (default: `<root>/schemas`).
    #[arg(long)]
    pub schemas_dir: Option<PathBuf>,

    /// Vectors root (default: `<root>/vectors`).
    #[arg(long)]
    pub vectors_dir: Option<PathBuf>,

    /// Only run suites for these schema names. Repeatable.
    #[arg(long = "suite", value_name = "SCHEMA")]
    pub suites: Vec<String>,

    /// Treatment of invalid vectors without `data`: skip, warn, or fail.
    #[arg(long, value_name = "POLICY")]
    pub missing_data: Option<MissingDataPolicy>,
}

impl ConfigArgs {
    /// Build the harness configuration for `repo_root`.
    pub fn build(&self, repo_root: &Path) -> anyhow::Result<HarnessConfig> {
        let mut config = HarnessConfig::for_root(repo_root);

        if let Some(manifest) = &self.manifest {
            let path = crate::resolve_path(manifest, repo_root);
            let loaded = Manifest::load(&path)
                .with_context(|| format!("loading manifest {}", path.display()))?;
            config.apply_manifest(loaded, &path);
        }
        if let Some(dir) = &self.schemas_dir {
            config.schemas_dir = crate::resolve_path(dir, repo_root);
        }
        if let Some(dir) = &self.vectors_dir {
            config.vectors_dir = crate::resolve_path(dir, repo_root);
        }
        if let Some(policy) = self.missing_data {
            config.missing_data = policy;
        }
        config.select_suites(&self.suites)?;

        tracing::debug!(
            schemas_dir = %config.schemas_dir.display(),
            vectors_dir = %config.vectors_dir.display(),
            suites = config.suites.len(),
            missing_data = %config.missing_data,
            "resolved configuration"
        );
        Ok(config)
    }
}
