//! # Report Aggregator
//!
//! [`RunReport`] is the run-scoped accumulator threaded through every
//! suite by `&mut`. It keeps the counters, the ordered mismatch log, and
//! per-suite summaries, and renders them in three forms:
//!
//! - text: the `Results:` line plus `Failures:` block on stdout;
//! - JSON: the whole report, via `serde`;
//! - cross-runner: one normalized `{schema_name, vector_file, result}`
//!   entry per suite, sorted by schema name, so outputs from runners in
//!   different languages can be diffed directly.
//!
//! ## Invariant
//!
//! `passed + failed` equals the number of vectors evaluated. Skipped
//! signal-only entries and validator errors count toward neither.

use std::fmt;
use std::io::{self, Write};

use hfv_core::{ContentDigest, Validity};
use serde::Serialize;

use crate::suite::VectorSuite;

/// Verdict for one evaluated vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Schema name of the suite the vector belongs to.
    pub schema: String,
    /// Vector identifier.
    pub id: String,
    /// Which group the vector came from.
    pub expected: Validity,
    /// What the backend reported.
    pub actual: Validity,
}

impl Outcome {
    /// True when the backend agreed with the vector's group.
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }

    /// `PASS` or `FAIL`, as shown in progress lines.
    pub fn status(&self) -> &'static str {
        if self.passed() {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

/// Renders the mismatch line body: `<id>: expected <v>, got <v>`.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, got {}", self.id, self.expected, self.actual)
    }
}

/// A vector the backend could not classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorFailure {
    /// Schema name of the suite.
    pub schema: String,
    /// Vector identifier.
    pub id: String,
    /// Backend diagnostic.
    pub reason: String,
}

impl fmt::Display for ValidatorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.schema, self.id, self.reason)
    }
}

/// A suite that could not run at all (only recorded with keep-going).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteFailure {
    /// Schema name of the suite.
    pub schema: String,
    /// Vector file locator.
    pub vector_file: String,
    /// The fatal error.
    pub error: String,
}

impl fmt::Display for SuiteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.schema, self.vector_file, self.error)
    }
}

/// Per-suite counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// Schema name.
    pub schema: String,
    /// Vector file locator, relative to the vectors root.
    pub vector_file: String,
    /// Canonical digest of the vector file.
    pub vector_digest: ContentDigest,
    /// Vectors matching their expectation.
    pub passed: usize,
    /// Mismatching vectors.
    pub failed: usize,
    /// Signal-only entries that were not evaluated.
    pub skipped: usize,
    /// Vectors the backend could not classify.
    pub errors: usize,
    /// Mismatch lines for this suite, in order.
    #[serde(skip)]
    mismatches: Vec<String>,
}

/// One normalized per-suite result, comparable across runners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossRunnerResult {
    /// Schema name.
    pub schema_name: String,
    /// Vector file locator.
    pub vector_file: String,
    /// `"pass"` or `"fail"`.
    pub result: &'static str,
    /// Failure descriptions, present only for failing suites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Run-scoped result accumulator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Name of the validator backend that produced the verdicts.
    pub backend: String,
    /// Vectors matching their expectation.
    pub passed: usize,
    /// Mismatching vectors.
    pub failed: usize,
    /// Signal-only entries that were not evaluated.
    pub skipped: usize,
    /// Mismatches, in evaluation order.
    pub failures: Vec<Outcome>,
    /// Vectors the backend could not classify, in evaluation order.
    pub validator_errors: Vec<ValidatorFailure>,
    /// Suites that could not run.
    pub suite_errors: Vec<SuiteFailure>,
    /// Per-suite counters, in run order.
    pub suites: Vec<SuiteSummary>,
}

impl RunReport {
    /// Start an empty report for `backend`.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            ..Self::default()
        }
    }

    /// Open a per-suite summary. Subsequent records are attributed to it.
    pub fn begin_suite(&mut self, suite: &VectorSuite, digest: ContentDigest) {
        self.suites.push(SuiteSummary {
            schema: suite.schema.clone(),
            vector_file: suite.locator(),
            vector_digest: digest,
            passed: 0,
            failed: 0,
            skipped: 0,
            errors: 0,
            mismatches: Vec::new(),
        });
    }

    /// Record a verdict.
    pub fn record(&mut self, outcome: Outcome) {
        let passed = outcome.passed();
        if let Some(summary) = self.suites.last_mut() {
            if passed {
                summary.passed += 1;
            } else {
                summary.failed += 1;
                summary.mismatches.push(outcome.to_string());
            }
        }
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failures.push(outcome);
        }
    }

    /// Record a signal-only entry that was not evaluated.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
        if let Some(summary) = self.suites.last_mut() {
            summary.skipped += 1;
        }
    }

    /// Record a vector the backend could not classify.
    pub fn record_validator_error(&mut self, failure: ValidatorFailure) {
        if let Some(summary) = self.suites.last_mut() {
            summary.errors += 1;
            summary.mismatches.push(failure.to_string());
        }
        self.validator_errors.push(failure);
    }

    /// Record a suite that could not run.
    pub fn record_suite_error(&mut self, suite: &VectorSuite, error: &dyn fmt::Display) {
        self.suite_errors.push(SuiteFailure {
            schema: suite.schema.clone(),
            vector_file: suite.locator(),
            error: error.to_string(),
        });
    }

    /// Number of vectors evaluated.
    pub fn evaluated(&self) -> usize {
        self.passed + self.failed
    }

    /// True when every evaluated vector matched and nothing malfunctioned.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.validator_errors.is_empty() && self.suite_errors.is_empty()
    }

    /// Process exit code: `0` on success, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Write the closing summary and the failure blocks.
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(50))?;
        writeln!(out, "Results: {} passed, {} failed", self.passed, self.failed)?;

        if !self.failures.is_empty() {
            writeln!(out, "\nFailures:")?;
            for outcome in &self.failures {
                writeln!(out, "  {outcome}")?;
            }
        }

        if !self.validator_errors.is_empty() {
            writeln!(out, "\nValidator errors:")?;
            for failure in &self.validator_errors {
                writeln!(out, "  {failure}")?;
            }
        }

        if !self.suite_errors.is_empty() {
            writeln!(out, "\nSuite errors:")?;
            for failure in &self.suite_errors {
                writeln!(out, "  {failure}")?;
            }
        }

        out.flush()
    }

    /// Normalized per-suite results, sorted by schema name.
    pub fn cross_runner_results(&self) -> Vec<CrossRunnerResult> {
        let mut results: Vec<CrossRunnerResult> = self
            .suites
            .iter()
            .map(|s| {
                let ok = s.failed == 0 && s.errors == 0;
                CrossRunnerResult {
                    schema_name: s.schema.clone(),
                    vector_file: s.vector_file.clone(),
                    result: if ok { "pass" } else { "fail" },
                    errors: (!ok).then(|| s.mismatches.clone()),
                }
            })
            .chain(self.suite_errors.iter().map(|s| CrossRunnerResult {
                schema_name: s.schema.clone(),
                vector_file: s.vector_file.clone(),
                result: "fail",
                errors: Some(vec![s.error.clone()]),
            }))
            .collect();
        results.sort_by(|a, b| a.schema_name.cmp(&b.schema_name));
        results
    }
}
