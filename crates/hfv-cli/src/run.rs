//! # Run Subcommand
//!
//! Runs the configured suites with the selected backend.
//!
//! In `text` format the banner, live progress and summary all go to
//! stdout. In `json` and `cross-runner` formats stdout carries only the
//! JSON document and live progress moves to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use hfv_harness::{execute, RunReport};
use hfv_schema::{CommandBackend, JsonSchemaBackend, SchemaDraft, ValidatorBackend};

use crate::config::ConfigArgs;

const BANNER: &str = "loa-hounfour Golden Vector Runner (Rust)";

/// Validator backend selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-process `jsonschema` crate.
    #[default]
    Jsonschema,
    /// External program: `<command> [args..] <schema-path>`, instance on stdin.
    Command,
}

/// Report format written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable progress and summary.
    #[default]
    Text,
    /// The full run report as JSON.
    Json,
    /// Normalized per-suite results for cross-language diffing.
    CrossRunner,
}

/// Arguments for the run subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Validator backend.
    #[arg(long, value_enum, default_value_t = BackendKind::Jsonschema)]
    pub backend: BackendKind,

    /// Validator program for `--backend command`.
    #[arg(long, value_name = "PROGRAM")]
    pub command: Option<PathBuf>,

    /// Argument passed to the validator program before the schema path. Repeatable.
    #[arg(long = "command-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub command_args: Vec<String>,

    /// Pin the JSON Schema draft: draft4, draft6, draft7, draft2019-09, draft2020-12.
    #[arg(long, value_name = "DRAFT")]
    pub draft: Option<SchemaDraft>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the full JSON report to this file.
    #[arg(long, value_name = "PATH")]
    pub report_out: Option<PathBuf>,

    /// Record suites that fail to load and continue with the rest.
    #[arg(long)]
    pub keep_going: bool,
}

/// Build the backend selected by `args`.
pub fn build_backend(args: &RunArgs, schemas_dir: &Path) -> anyhow::Result<Box<dyn ValidatorBackend>> {
    match args.backend {
        BackendKind::Jsonschema => Ok(Box::new(
            JsonSchemaBackend::new(schemas_dir).with_draft(args.draft),
        )),
        BackendKind::Command => {
            let program = args
                .command
                .clone()
                .context("--backend command requires --command <PROGRAM>")?;
            if args.draft.is_some() {
                tracing::warn!("--draft has no effect with --backend command");
            }
            Ok(Box::new(
                CommandBackend::new(program).with_args(args.command_args.iter().cloned()),
            ))
        }
    }
}

/// Execute the run subcommand. Returns the process exit code.
pub fn run_vectors(args: &RunArgs, repo_root: &Path) -> anyhow::Result<u8> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    write_run(args, repo_root, &mut stdout.lock(), &mut stderr.lock())
}

/// Execute the run subcommand with the report written to `out` and, in
/// JSON formats, live progress written to `progress`.
pub fn write_run(
    args: &RunArgs,
    repo_root: &Path,
    out: &mut impl Write,
    progress: &mut impl Write,
) -> anyhow::Result<u8> {
    let mut config = args.config.build(repo_root)?;
    config.keep_going = args.keep_going;
    let backend = build_backend(args, &config.schemas_dir)?;

    tracing::info!(
        backend = backend.name(),
        suites = config.suites.len(),
        "starting golden vector run"
    );

    let report = match args.format {
        OutputFormat::Text => {
            writeln!(out, "{BANNER}")?;
            writeln!(out, "{}", "=".repeat(BANNER.len()))?;
            let report = execute(&config, backend.as_ref(), &mut *out)?;
            report.write_summary(out)?;
            report
        }
        OutputFormat::Json | OutputFormat::CrossRunner => {
            let report = execute(&config, backend.as_ref(), &mut *progress)?;
            writeln!(out, "{}", render_json(&report, args.format)?)?;
            out.flush()?;
            report
        }
    };

    if let Some(path) = &args.report_out {
        let json = serde_json::to_vec_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    tracing::info!(
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        validator_errors = report.validator_errors.len(),
        "golden vector run complete"
    );

    Ok(report.exit_code())
}

fn render_json(report: &RunReport, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::CrossRunner => serde_json::to_string_pretty(&report.cross_runner_results())?,
        _ => serde_json::to_string_pretty(report)?,
    };
    Ok(rendered)
}
