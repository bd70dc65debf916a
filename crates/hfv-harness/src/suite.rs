//! # Vector Suites
//!
//! A suite pairs one schema with one vector file and names the two groups
//! inside that file. Group names differ from file to file
//! (`valid_events`/`invalid`, `valid_entries`/`invalid_entries`, ...), so
//! they are spelled out per suite rather than inferred.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One schema plus the vector file exercising it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorSuite {
    /// Schema name, resolved to `<schemas_root>/<schema>.schema.json`.
    pub schema: String,
    /// Vector file, relative to the vectors root.
    pub vectors: PathBuf,
    /// Top-level key of the expected-valid group.
    pub valid_key: String,
    /// Top-level key of the expected-invalid group.
    pub invalid_key: String,
}

impl VectorSuite {
    /// Build a suite descriptor.
    pub fn new(
        schema: impl Into<String>,
        vectors: impl Into<PathBuf>,
        valid_key: impl Into<String>,
        invalid_key: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            vectors: vectors.into(),
            valid_key: valid_key.into(),
            invalid_key: invalid_key.into(),
        }
    }

    /// Absolute location of the vector file under `vectors_root`.
    pub fn vector_path(&self, vectors_root: &Path) -> PathBuf {
        vectors_root.join(&self.vectors)
    }

    /// The vector file's name, as shown in suite headers.
    pub fn file_name(&self) -> String {
        self.vectors
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.vectors.display().to_string())
    }

    /// The vector locator with `/` separators, as used in reports.
    pub fn locator(&self) -> String {
        self.vectors
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// The built-in suite table, in run order.
pub fn default_suites() -> Vec<VectorSuite> {
    vec![
        VectorSuite::new("domain-event", "domain-event/events.json", "valid_events", "invalid"),
        VectorSuite::new(
            "domain-event-batch",
            "domain-event/batches.json",
            "valid_batches",
            "invalid_batches",
        ),
        VectorSuite::new(
            "conversation",
            "conversation/conversations.json",
            "valid_conversations",
            "invalid",
        ),
        VectorSuite::new(
            "billing-entry",
            "billing/allocation.json",
            "valid_entries",
            "invalid_entries",
        ),
        VectorSuite::new(
            "transfer-spec",
            "transfer/transfers.json",
            "valid_transfers",
            "invalid_transfers",
        ),
        VectorSuite::new(
            "lifecycle-transition-payload",
            "agent/lifecycle-payloads.json",
            "valid_payloads",
            "invalid_payloads",
        ),
        VectorSuite::new("health-status", "health/health-status.json", "valid", "invalid"),
        VectorSuite::new("thinking-trace", "thinking/thinking-traces.json", "valid", "invalid"),
    ]
}
