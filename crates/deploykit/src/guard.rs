//! Idempotency guard
//!
//! Decides, per operation, whether the machine is already in the desired
//! state by reading external state through a [`StateProbe`]. Never
//! mutates anything. An unreadable probe is logged and treated as Apply:
//! skipping on ambiguous state risks leaving the target undesired.

use crate::catalog::Build;
use crate::error::Result;
use crate::plan::{IdempotencyProbe, Operation};
use std::path::Path;

/// Read-only view of the target machine's installed-software state
///
/// Implemented outside the engine (registry lookups, filesystem checks).
pub trait StateProbe {
    /// Installed build number recorded at `key`, if any
    fn installed_build(&self, key: &str) -> Result<Option<Build>>;

    /// Whether the marker path exists
    fn file_exists(&self, path: &Path) -> Result<bool>;
}

/// Whether an operation should run or is already satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Apply,
    Skip { reason: String },
}

impl Decision {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }
}

/// Decide whether the operation's mutation is still needed
pub fn should_apply(operation: &Operation, probe: &dyn StateProbe) -> Decision {
    match &operation.probe {
        IdempotencyProbe::BuildAtLeast { key, build } => {
            match probe.installed_build(key) {
                Ok(Some(installed)) if installed >= *build => Decision::Skip {
                    reason: format!("installed build {installed} already at or past {build}"),
                },
                Ok(_) => Decision::Apply,
                Err(err) => apply_on_unreadable(operation, &err),
            }
        }
        IdempotencyProbe::BuildAbsent { key } => match probe.installed_build(key) {
            Ok(None) => Decision::Skip {
                reason: "no installed build recorded, nothing to remove".to_string(),
            },
            // Any recorded build means something is installed; attempt removal
            Ok(Some(_)) => Decision::Apply,
            Err(err) => apply_on_unreadable(operation, &err),
        },
        IdempotencyProbe::FileExists { path } => match probe.file_exists(path) {
            Ok(true) => Decision::Skip {
                reason: format!("{} already present", path.display()),
            },
            Ok(false) => Decision::Apply,
            Err(err) => apply_on_unreadable(operation, &err),
        },
    }
}

fn apply_on_unreadable(operation: &Operation, err: &crate::error::Error) -> Decision {
    log::warn!(
        "cannot probe state for '{}' ({err}), applying anyway",
        operation.kind
    );
    Decision::Apply
}
