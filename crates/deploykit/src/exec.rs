//! Plan execution driver
//!
//! The engine emits operations; an external [`Executor`] actually spawns
//! commands. [`run_plan`] drives one plan through the idempotency guard
//! and the executor, failing fast: later operations declare completion
//! dependencies on earlier ones, so nothing past a failure is attempted.

use crate::error::{Error, Result};
use crate::guard::{Decision, StateProbe, should_apply};
use crate::plan::Operation;
use serde::Serialize;

/// Options for one orchestration run
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't mutate anything, just report what would happen
    pub dry_run: bool,
}

/// Result of handing one operation to the executor
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    Completed,
    Failed { message: String },
}

/// Runs the concrete command for an operation (external collaborator)
pub trait Executor {
    fn execute(&mut self, operation: &Operation) -> Result<ExecutionOutcome>;
}

/// Per-run bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub applied: usize,
    pub skipped: usize,
    /// Operations never attempted because an earlier one failed
    pub aborted: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.aborted
    }
}

/// Drive a plan to completion, guard first, executor second
///
/// # Errors
///
/// Returns `Error::Execution` for the first operation the executor
/// reports as failed; every operation after it is aborted, not run.
pub fn run_plan(
    operations: &[Operation],
    probe: &dyn StateProbe,
    executor: &mut dyn Executor,
    opts: &ExecuteOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, operation) in operations.iter().enumerate() {
        match should_apply(operation, probe) {
            Decision::Skip { reason } => {
                log::info!("skip {}: {reason}", operation.kind);
                summary.skipped += 1;
                continue;
            }
            Decision::Apply => {}
        }

        if opts.dry_run {
            log::info!("would apply {}", operation.kind);
            summary.applied += 1;
            continue;
        }

        log::info!("applying {}", operation.kind);
        match executor.execute(operation) {
            Ok(ExecutionOutcome::Completed) => summary.applied += 1,
            Ok(ExecutionOutcome::Failed { message }) => {
                summary.aborted = operations.len() - index - 1;
                return Err(Error::Execution {
                    operation: operation.kind.to_string(),
                    message,
                });
            }
            Err(err) => {
                summary.aborted = operations.len() - index - 1;
                return Err(err);
            }
        }
    }

    Ok(summary)
}
