//! Error types for the deploykit crate

use std::fmt;
use thiserror::Error;

/// Errors that can occur during resolution, planning, and execution
#[derive(Error, Debug)]
pub enum Error {
    /// The raw spec violated one or more constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The install root could not be composed from the deployment root
    #[error("install root could not be resolved from deployment root '{root}'")]
    UnresolvedInstallRoot { root: String },

    /// A catalog lookup that validation vouched for came back empty
    #[error("catalog has no entry for {0}")]
    CatalogMiss(String),

    /// External state could not be read (permissions, missing hive, ...)
    #[error("state probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// An operation was handed to the executor and did not succeed
    #[error("{operation} failed: {message}")]
    Execution { operation: String, message: String },
}

/// Result type for deploykit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Aggregated validation failure: every violated constraint, not just the first
///
/// Callers get the full list in one pass so a bad request can be fixed
/// without re-running validation per field.
#[derive(Debug)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid install spec: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A single violated constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("unsupported version '{0}'")]
    InvalidVersion(String),

    #[error("unknown edition '{edition}' for version {version}")]
    InvalidEdition { version: String, edition: String },

    #[error("service pack level {0} is outside 0..=3 or not in the catalog")]
    InvalidServicePack(i64),

    #[error("license key must be five hyphen-separated groups of five alphanumerics")]
    InvalidLicenseKey,

    #[error("architecture must be 'x86' or 'x64', got '{0}'")]
    InvalidArchitecture(String),

    #[error("unknown language code '{0}'")]
    InvalidLanguage(String),

    #[error("ensure must be 'present' or 'absent', got '{0}'")]
    InvalidEnsureState(String),

    #[error("deployment root must not be empty")]
    MissingDeploymentRoot,
}
