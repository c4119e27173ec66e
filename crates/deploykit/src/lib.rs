//! # Deploykit
//!
//! Installer resolution and sequencing engine: given a declarative
//! description of a target product (version, edition, service-pack
//! level, language, license, present/absent goal), derive the ordered
//! sequence of idempotent operations that converge a machine toward it.
//!
//! ## Pipeline
//!
//! 1. **Validate** — [`spec::validate`] checks a raw request against the
//!    [`catalog::Catalog`] and reports every violated constraint at once.
//! 2. **Resolve** — [`variant::resolve`] derives the concrete,
//!    version-specific parameters (paths, product ids, probe key, config
//!    format, uninstall shape) behind one strategy table.
//! 3. **Plan** — [`plan::plan`] expands the spec into ordered
//!    [`plan::Operation`]s with declared prerequisites.
//! 4. **Guard + execute** — [`exec::run_plan`] probes external state per
//!    operation ([`guard::should_apply`]) and hands the rest to an
//!    [`exec::Executor`], failing fast past the first failure.
//!
//! The engine never trusts its own memory of prior runs: every skip
//! decision comes from probing registry-like state or the filesystem
//! through the [`guard::StateProbe`] seam.
//!
//! ## Example
//!
//! ```ignore
//! use deploykit::{catalog::Catalog, plan, spec, variant};
//!
//! let catalog = Catalog::builtin();
//! let install = spec::validate(&raw, &catalog)?;
//! let resolved = variant::resolve(&install, &catalog)?;
//! let operations = plan::plan(&install, &resolved);
//! ```
//!
//! All components are pure functions over their inputs plus the
//! read-only catalog; independent specs can be planned concurrently.

pub mod catalog;
pub mod configfile;
pub mod error;
pub mod exec;
pub mod guard;
pub mod plan;
pub mod spec;
pub mod variant;

// Re-export main types at crate root
pub use catalog::{Build, Catalog, ProductVersion, VersionEntry};
pub use configfile::{ConfigDocument, XmlConfig};
pub use error::{Error, Result, ValidationError, Violation};
pub use exec::{ExecuteOptions, ExecutionOutcome, Executor, RunSummary, run_plan};
pub use guard::{Decision, StateProbe, should_apply};
pub use plan::{CommandSpec, IdempotencyProbe, Operation, OperationKind, plan};
pub use spec::{Architecture, Ensure, InstallSpec, Overrides, RawSpec, validate};
pub use variant::{ConfigKind, ResolvedVariant, UninstallShape, UpdateShape, resolve};
