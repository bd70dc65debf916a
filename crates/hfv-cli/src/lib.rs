//! # hfv-cli: Golden-Vector Runner CLI
//!
//! Provides the `hfv` command-line interface.
//!
//! ## Subcommands
//!
//! - `hfv run`: Run the configured suites and exit `0` only if every
//!   evaluated vector matched its expectation.
//! - `hfv list`: Print the configured suites and whether their files exist.
//!
//! ```bash
//! hfv run
//! hfv run --suite billing-entry --missing-data warn
//! hfv run --backend command --command python3 --command-arg validate.py
//! hfv run --format cross-runner > normalized-rust.json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; loading, validation and aggregation
//!   live in `hfv-harness` and `hfv-schema`.
//! - Stdout carries the report. Diagnostics go to stderr via `tracing`.

pub mod config;
pub mod list;
pub mod run;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path is taken relative to
/// `repo_root` if it exists there, otherwise relative to the current
/// directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory holding both `schemas/`
/// and `vectors/`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("schemas").is_dir() && dir.join("vectors").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_absolute_path_returned_as_is() {
        let result = resolve_path(Path::new("/abs/suites.yaml"), Path::new("/repo"));
        assert_eq!(result, PathBuf::from("/abs/suites.yaml"));
    }

    #[test]
    fn resolve_path_prefers_repo_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("suites.yaml"), b"suites: []").unwrap();
        let result = resolve_path(Path::new("suites.yaml"), dir.path());
        assert_eq!(result, dir.path().join("suites.yaml"));
    }

    #[test]
    fn resolve_path_falls_back_to_cwd_relative() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_path(Path::new("missing.yaml"), dir.path());
        assert_eq!(result, PathBuf::from("missing.yaml"));
    }

    #[test]
    fn find_repo_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("schemas")).unwrap();
        std::fs::create_dir_all(dir.path().join("vectors/runners/rust")).unwrap();
        let found = find_repo_root(&dir.path().join("vectors/runners/rust")).unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn find_repo_root_requires_both_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("only/schemas")).unwrap();
        assert_ne!(
            find_repo_root(&dir.path().join("only")).as_deref(),
            Some(dir.path().join("only").as_path())
        );
    }
}
