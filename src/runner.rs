//! Process executor
//!
//! Implements the engine's `Executor` seam by actually spawning the
//! resolved installer commands. Renders each operation's config document
//! into the working directory first, then runs the command with the
//! config path appended.

use crate::render;
use deploykit::{Executor, ExecutionOutcome, Operation, Result};
use std::path::PathBuf;
use std::process::Command;

/// Runs planned operations as real processes
pub struct ProcessExecutor {
    work_dir: PathBuf,
}

impl ProcessExecutor {
    /// Create an executor rendering config files into `work_dir`
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    fn config_path(&self, operation: &Operation) -> anyhow::Result<Option<PathBuf>> {
        match &operation.config {
            Some(document) => {
                let stem = config_stem(operation);
                Ok(Some(render::write_config(document, &self.work_dir, stem)?))
            }
            None => Ok(None),
        }
    }
}

impl Executor for ProcessExecutor {
    fn execute(&mut self, operation: &Operation) -> Result<ExecutionOutcome> {
        let config_path = match self.config_path(operation) {
            Ok(path) => path,
            Err(e) => {
                return Ok(ExecutionOutcome::Failed {
                    message: format!("config rendering failed: {e}"),
                });
            }
        };

        let args = operation.command.resolved_args(config_path.as_deref());
        log::debug!(
            "running {} {}",
            operation.command.program.display(),
            args.join(" ")
        );

        let output = match Command::new(&operation.command.program).args(&args).output() {
            Ok(output) => output,
            Err(e) => {
                return Ok(ExecutionOutcome::Failed {
                    message: format!(
                        "could not start {}: {e}",
                        operation.command.program.display()
                    ),
                });
            }
        };

        if output.status.success() {
            Ok(ExecutionOutcome::Completed)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(ExecutionOutcome::Failed {
                message: format!(
                    "exit status {}: {}",
                    output.status,
                    stderr.trim()
                ),
            })
        }
    }
}

fn config_stem(operation: &Operation) -> &'static str {
    use deploykit::OperationKind;
    match operation.kind {
        OperationKind::InstallBase => "install-config",
        OperationKind::ApplyServicePack => "servicepack-config",
        OperationKind::ApplyLanguagePack => "language-config",
        OperationKind::Uninstall => "uninstall-config",
    }
}

/// Where config files go when the caller didn't pick a directory
pub fn default_work_dir() -> anyhow::Result<PathBuf> {
    let dir = std::env::temp_dir().join("msodeploy");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
