//! # Suite Runner
//!
//! Executes suites in the order given. Within a suite the valid group is
//! checked in file order, then the invalid group in file order. Each
//! verdict is written and flushed as soon as it is known so long runs show
//! live progress.
//!
//! A suite's schema, compiled validator and vector file must all load
//! before its header is printed; a fatal load error therefore leaves no
//! partial output for that suite.

use std::io::Write;
use std::path::PathBuf;

use hfv_core::Validity;
use hfv_schema::{CompiledSchema, SchemaStore, ValidatorBackend};
use serde_json::Value;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::{Outcome, RunReport, ValidatorFailure};
use crate::suite::VectorSuite;
use crate::vectors::{MissingDataPolicy, VectorFile};

/// Drives a validator backend over vector suites, writing progress to `W`.
pub struct SuiteRunner<'a, W: Write> {
    schemas: SchemaStore,
    vectors_root: PathBuf,
    backend: &'a dyn ValidatorBackend,
    missing_data: MissingDataPolicy,
    out: W,
}

impl<'a, W: Write> SuiteRunner<'a, W> {
    /// Create a runner. Progress lines are written to `out`.
    pub fn new(
        schemas: SchemaStore,
        vectors_root: impl Into<PathBuf>,
        backend: &'a dyn ValidatorBackend,
        out: W,
    ) -> Self {
        Self {
            schemas,
            vectors_root: vectors_root.into(),
            backend,
            missing_data: MissingDataPolicy::default(),
            out,
        }
    }

    /// Set the treatment of invalid-group entries without `data`.
    pub fn with_missing_data(mut self, policy: MissingDataPolicy) -> Self {
        self.missing_data = policy;
        self
    }

    /// Consume the runner, returning the progress writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run one suite, accumulating into `report`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Load` if the schema or vector file cannot be
    /// loaded, `HarnessError::Validator` if the backend cannot compile the
    /// schema, and `HarnessError::Output` if progress cannot be written.
    /// Mismatches and per-vector validator errors are recorded, not returned.
    pub fn run(&mut self, suite: &VectorSuite, report: &mut RunReport) -> Result<(), HarnessError> {
        let schema = self.schemas.load(&suite.schema)?;
        let compiled = self.backend.compile(&schema)?;
        let vectors = VectorFile::load(
            &suite.vector_path(&self.vectors_root),
            &suite.valid_key,
            &suite.invalid_key,
            self.missing_data,
        )?;

        tracing::info!(
            schema = %suite.schema,
            vectors = %vectors.path().display(),
            digest = %vectors.digest(),
            evaluable = vectors.evaluable_count(),
            "running suite"
        );

        writeln!(self.out, "\n{} ({}):", suite.schema, suite.file_name())?;
        report.begin_suite(suite, vectors.digest());

        for entry in vectors.valid() {
            if let Some(data) = &entry.data {
                self.evaluate(compiled.as_ref(), &suite.schema, &entry.id, data, Validity::Valid, report)?;
            }
        }

        for entry in vectors.invalid() {
            match &entry.data {
                Some(data) => {
                    self.evaluate(compiled.as_ref(), &suite.schema, &entry.id, data, Validity::Invalid, report)?;
                }
                None => {
                    if self.missing_data == MissingDataPolicy::Warn {
                        tracing::warn!(
                            schema = %suite.schema,
                            id = %entry.id,
                            "invalid vector has no 'data'; not evaluated"
                        );
                    }
                    report.record_skip();
                }
            }
        }

        Ok(())
    }

    /// Run `suites` in order.
    ///
    /// With `keep_going`, a suite that fails to load is recorded in the
    /// report and the next suite runs. Output errors always abort.
    pub fn run_all(
        &mut self,
        suites: &[VectorSuite],
        report: &mut RunReport,
        keep_going: bool,
    ) -> Result<(), HarnessError> {
        for suite in suites {
            match self.run(suite, report) {
                Ok(()) => {}
                Err(HarnessError::Output(e)) => return Err(HarnessError::Output(e)),
                Err(e) if keep_going => {
                    tracing::error!(schema = %suite.schema, "suite aborted: {e}");
                    report.record_suite_error(suite, &e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn evaluate(
        &mut self,
        compiled: &dyn CompiledSchema,
        schema: &str,
        id: &str,
        data: &Value,
        expected: Validity,
        report: &mut RunReport,
    ) -> Result<(), HarnessError> {
        match compiled.check(data) {
            Ok(actual) => {
                let outcome = Outcome {
                    schema: schema.to_string(),
                    id: id.to_string(),
                    expected,
                    actual,
                };
                writeln!(self.out, "  [{}] {id}", outcome.status())?;
                report.record(outcome);
            }
            Err(e) => {
                tracing::error!(schema, id, "validator error: {e}");
                writeln!(self.out, "  [ERROR] {id}")?;
                report.record_validator_error(ValidatorFailure {
                    schema: schema.to_string(),
                    id: id.to_string(),
                    reason: e.to_string(),
                });
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Run every suite in `config` with `backend`, writing progress to `out`.
///
/// Returns the completed report; rendering the summary is left to the
/// caller.
pub fn execute<W: Write>(
    config: &HarnessConfig,
    backend: &dyn ValidatorBackend,
    out: W,
) -> Result<RunReport, HarnessError> {
    let mut report = RunReport::new(backend.name());
    let mut runner = SuiteRunner::new(
        SchemaStore::new(&config.schemas_dir),
        &config.vectors_dir,
        backend,
        out,
    )
    .with_missing_data(config.missing_data);

    runner.run_all(&config.suites, &mut report, config.keep_going)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use hfv_core::ValidatorError;
    use hfv_schema::Schema;
    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    /// Valid iff the instance is an object with an integer `x`; errors on `x: "boom"`.
    struct IntegerX;

    impl CompiledSchema for IntegerX {
        fn check(&self, instance: &Value) -> Result<Validity, ValidatorError> {
            if instance.get("x") == Some(&json!("boom")) {
                return Err(ValidatorError::Check {
                    schema: "point".into(),
                    reason: "boom".into(),
                });
            }
            Ok(Validity::from_conforms(
                instance.get("x").is_some_and(Value::is_i64),
            ))
        }
    }

    struct IntegerXBackend;

    impl ValidatorBackend for IntegerXBackend {
        fn name(&self) -> &str {
            "integer-x"
        }

        fn compile(&self, _schema: &Schema) -> Result<Box<dyn CompiledSchema>, ValidatorError> {
            Ok(Box::new(IntegerX))
        }
    }

    fn fixture(vectors: Value) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("schemas")).unwrap();
        std::fs::create_dir_all(dir.path().join("vectors/point")).unwrap();
        std::fs::write(dir.path().join("schemas/point.schema.json"), "{}").unwrap();
        std::fs::write(
            dir.path().join("vectors/point/points.json"),
            serde_json::to_vec(&vectors).unwrap(),
        )
        .unwrap();
        dir
    }

    fn suite() -> VectorSuite {
        VectorSuite::new("point", "point/points.json", "valid", "invalid")
    }

    fn run(dir: &Path, policy: MissingDataPolicy) -> (Result<(), HarnessError>, RunReport, String) {
        let backend = IntegerXBackend;
        let mut report = RunReport::new(backend.name());
        let mut runner = SuiteRunner::new(
            SchemaStore::new(dir.join("schemas")),
            dir.join("vectors"),
            &backend,
            Vec::new(),
        )
        .with_missing_data(policy);
        let result = runner.run(&suite(), &mut report);
        let out = String::from_utf8(runner.into_output()).unwrap();
        (result, report, out)
    }

    #[test]
    fn progress_lines_in_group_order() {
        let dir = fixture(json!({
            "invalid": [ { "id": "i1", "data": { "x": "a" } } ],
            "valid": [ { "id": "v1", "data": { "x": 1 } }, { "id": "v2", "data": { "x": 2.5 } } ]
        }));
        let (result, report, out) = run(dir.path(), MissingDataPolicy::Skip);
        result.unwrap();
        assert_eq!(out, "\npoint (points.json):\n  [PASS] v1\n  [FAIL] v2\n  [PASS] i1\n");
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].to_string(), "v2: expected valid, got invalid");
    }

    #[test]
    fn payloadless_invalid_entries_produce_no_line() {
        let dir = fixture(json!({
            "valid": [],
            "invalid": [ { "id": "i1", "note": "shape only" }, { "id": "i2", "data": {} } ]
        }));
        for policy in [MissingDataPolicy::Skip, MissingDataPolicy::Warn] {
            let (result, report, out) = run(dir.path(), policy);
            result.unwrap();
            assert!(!out.contains("i1"));
            assert!(out.contains("  [PASS] i2"));
            assert_eq!(report.evaluated(), 1);
            assert_eq!(report.skipped, 1);
        }
    }

    #[test]
    fn fail_policy_aborts_suite_before_header() {
        let dir = fixture(json!({ "invalid": [ { "id": "i1" } ] }));
        let (result, report, out) = run(dir.path(), MissingDataPolicy::Fail);
        assert!(matches!(
            result,
            Err(HarnessError::Load(hfv_core::LoadError::MalformedVectorFile { .. }))
        ));
        assert!(out.is_empty());
        assert!(report.suites.is_empty());
    }

    #[test]
    fn validator_error_is_distinct_from_mismatch() {
        let dir = fixture(json!({
            "valid": [ { "id": "v1", "data": { "x": "boom" } }, { "id": "v2", "data": { "x": 3 } } ]
        }));
        let (result, report, out) = run(dir.path(), MissingDataPolicy::Skip);
        result.unwrap();
        assert!(out.contains("  [ERROR] v1\n  [PASS] v2\n"));
        assert_eq!(report.failed, 0);
        assert_eq!(report.passed, 1);
        assert_eq!(report.validator_errors.len(), 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn run_all_keep_going_records_suite_errors() {
        let dir = fixture(json!({ "valid": [ { "id": "v1", "data": { "x": 1 } } ] }));
        let backend = IntegerXBackend;
        let suites = [
            VectorSuite::new("missing", "missing/m.json", "valid", "invalid"),
            suite(),
        ];

        let mut report = RunReport::new(backend.name());
        let mut runner = SuiteRunner::new(
            SchemaStore::new(dir.path().join("schemas")),
            dir.path().join("vectors"),
            &backend,
            Vec::new(),
        );
        runner.run_all(&suites, &mut report, true).unwrap();
        assert_eq!(report.suite_errors.len(), 1);
        assert_eq!(report.suite_errors[0].schema, "missing");
        assert_eq!(report.passed, 1);
        assert_eq!(report.exit_code(), 1);

        let mut report = RunReport::new(backend.name());
        let err = runner.run_all(&suites, &mut report, false).unwrap_err();
        assert!(matches!(err, HarnessError::Load(hfv_core::LoadError::NotFound { .. })));
        assert_eq!(report.evaluated(), 0);
    }

    /// Log sink shared between the subscriber and the assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn run_logged(dir: &Path, policy: MissingDataPolicy) -> (RunReport, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let (result, report, _) = tracing::subscriber::with_default(subscriber, || run(dir, policy));
        result.unwrap();
        (report, logs.text())
    }

    #[test]
    fn warn_policy_logs_each_payloadless_entry() {
        let dir = fixture(json!({
            "invalid": [ { "id": "i1" }, { "id": "i2", "data": {} }, { "id": "i3", "note": "shape" } ]
        }));

        let (report, logs) = run_logged(dir.path(), MissingDataPolicy::Warn);
        assert_eq!(report.skipped, 2);
        assert_eq!(logs.matches("invalid vector has no 'data'").count(), 2, "{logs}");
        assert!(logs.contains("id=i1"), "{logs}");
        assert!(logs.contains("id=i3"), "{logs}");

        let (report, logs) = run_logged(dir.path(), MissingDataPolicy::Skip);
        assert_eq!(report.skipped, 2);
        assert!(!logs.contains("invalid vector has no 'data'"), "{logs}");
    }

    #[cfg(unix)]
    #[test]
    fn command_backend_drives_a_suite() {
        let dir = fixture(json!({
            "valid": [ { "id": "v1", "data": { "x": 1 } } ],
            "invalid": [
                { "id": "i1", "data": { "x": 2 } },
                { "id": "i2", "data": { "x": 1 } },
                { "id": "i3", "data": { "x": "boom" } }
            ]
        }));
        let script = r#"[ -f "$1" ] || exit 4
input=$(cat)
case "$input" in
  *boom*) echo "validator crashed" >&2; exit 3 ;;
  *'"x":1'*) exit 0 ;;
  *) exit 1 ;;
esac"#;
        let backend = hfv_schema::CommandBackend::new("sh").with_args(["-c", script, "validator"]);

        let mut report = RunReport::new(backend.name());
        let mut runner = SuiteRunner::new(
            SchemaStore::new(dir.path().join("schemas")),
            dir.path().join("vectors"),
            &backend,
            Vec::new(),
        );
        runner.run(&suite(), &mut report).unwrap();
        let out = String::from_utf8(runner.into_output()).unwrap();

        assert_eq!(
            out,
            "\npoint (points.json):\n  [PASS] v1\n  [PASS] i1\n  [FAIL] i2\n  [ERROR] i3\n"
        );
        assert_eq!(report.backend, "command:sh");
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.validator_errors.len(), 1);
        assert!(report.validator_errors[0].reason.contains("validator crashed"));
    }
}
