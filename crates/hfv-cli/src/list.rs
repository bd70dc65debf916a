//! # List Subcommand
//!
//! Prints the configured suites, one per line, flagging missing files.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use hfv_harness::HarnessConfig;
use hfv_schema::SchemaStore;

use crate::config::ConfigArgs;

/// Arguments for the list subcommand.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the list subcommand. Returns the process exit code.
pub fn run_list(args: &ListArgs, repo_root: &Path) -> anyhow::Result<u8> {
    let config = args.config.build(repo_root)?;
    let mut out = io::stdout().lock();
    write_listing(&config, &mut out)?;
    Ok(0)
}

/// Write one line per suite:
/// `<schema>  <vectors>  [<valid_key>/<invalid_key>]`, plus a `missing`
/// marker naming any absent schema or vector file.
pub fn write_listing(config: &HarnessConfig, out: &mut impl Write) -> io::Result<()> {
    let store = SchemaStore::new(&config.schemas_dir);
    let width = config
        .suites
        .iter()
        .map(|s| s.schema.len())
        .max()
        .unwrap_or(0);

    for suite in &config.suites {
        let mut missing = Vec::new();
        if store.resolve(&suite.schema).is_none() {
            missing.push("schema");
        }
        if !suite.vector_path(&config.vectors_dir).is_file() {
            missing.push("vectors");
        }

        write!(
            out,
            "{:width$}  {}  [{}/{}]",
            suite.schema,
            suite.locator(),
            suite.valid_key,
            suite.invalid_key
        )?;
        if missing.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "  missing: {}", missing.join(", "))?;
        }
    }
    out.flush()
}
