//! Loading the declarative request and the catalog

use anyhow::{Context, Result};
use deploykit::{Catalog, RawSpec};
use std::path::Path;

/// Load a deployment request from a TOML file
///
/// The deployment root is shell-expanded (`~`, `$VARS`) before the
/// engine ever sees it.
pub fn load_request(path: &Path) -> Result<RawSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read request file: {}", path.display()))?;

    let mut raw: RawSpec =
        toml::from_str(&content).context("invalid TOML in deployment request")?;

    raw.deployment_root = shellexpand::full(&raw.deployment_root)
        .with_context(|| format!("could not expand deployment root '{}'", raw.deployment_root))?
        .into_owned();

    Ok(raw)
}

/// The catalog to resolve against: an external file, or the built-in table
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("could not read catalog file: {}", path.display()))?;
            Catalog::from_toml(&content)
                .with_context(|| format!("invalid catalog file: {}", path.display()))
        }
        None => Ok(Catalog::builtin()),
    }
}
