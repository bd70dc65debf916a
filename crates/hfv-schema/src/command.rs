//! # External-Command Backend
//!
//! Drives a validator written in another language. For every instance the
//! backend runs
//!
//! ```text
//! <program> [args..] <schema-path>
//! ```
//!
//! with the instance JSON on stdin, and reads the verdict from the exit
//! status:
//!
//! | exit status | verdict                     |
//! |-------------|-----------------------------|
//! | `0`         | `Validity::Valid`           |
//! | `1`         | `Validity::Invalid`         |
//! | other       | `ValidatorError::Check`     |
//! | signal      | `ValidatorError::Check`     |

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use hfv_core::{ValidatorError, Validity};
use serde_json::Value;

use crate::backend::{CompiledSchema, ValidatorBackend};
use crate::store::Schema;

/// Validator backend that shells out to an external program.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: PathBuf,
    args: Vec<String>,
    label: String,
}

impl CommandBackend {
    /// Create a backend invoking `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let label = format!("command:{}", program.display());
        Self {
            program,
            args: Vec::new(),
            label,
        }
    }

    /// Arguments placed before the schema path.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl ValidatorBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.label
    }

    fn compile(&self, schema: &Schema) -> Result<Box<dyn CompiledSchema>, ValidatorError> {
        if self.program.as_os_str().is_empty() {
            return Err(ValidatorError::Backend {
                reason: "no validator program configured".to_string(),
            });
        }
        Ok(Box::new(CompiledCommand {
            program: self.program.clone(),
            args: self.args.clone(),
            schema_name: schema.name().to_string(),
            schema_path: schema.path().to_path_buf(),
        }))
    }
}

struct CompiledCommand {
    program: PathBuf,
    args: Vec<String>,
    schema_name: String,
    schema_path: PathBuf,
}

impl CompiledCommand {
    fn check_error(&self, reason: String) -> ValidatorError {
        ValidatorError::Check {
            schema: self.schema_name.clone(),
            reason,
        }
    }
}

impl CompiledSchema for CompiledCommand {
    fn check(&self, instance: &Value) -> Result<Validity, ValidatorError> {
        let payload = serde_json::to_vec(instance)
            .map_err(|e| self.check_error(format!("cannot serialize instance: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.schema_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ValidatorError::Backend {
                reason: format!("cannot spawn {}: {e}", self.program.display()),
            })?;

        // Stdin is fed concurrently with draining stderr.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || match stdin.write_all(&payload) {
                // A validator may decide without reading all of stdin.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.check_error(format!("cannot wait for validator: {e}")))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    return Err(self.check_error(format!("cannot write instance: {e}")));
                }
                Err(_) => {
                    return Err(self.check_error("instance writer panicked".to_string()));
                }
            }
        }

        match output.status.code() {
            Some(0) => Ok(Validity::Valid),
            Some(1) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::debug!(schema = %self.schema_name, stderr = %stderr.trim(), "instance rejected");
                Ok(Validity::Invalid)
            }
            Some(code) => Err(self.check_error(format!(
                "validator exited with status {code}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            None => Err(self.check_error("validator terminated by signal".to_string())),
        }
    }
}
