//! `msodeploy validate` - check a request against the catalog

use crate::cli::RequestArgs;
use crate::request;
use anyhow::Result;
use colored::Colorize;
use deploykit::validate;
use std::path::Path;

pub fn run(args: &RequestArgs, catalog_path: Option<&Path>) -> Result<()> {
    let catalog = request::load_catalog(catalog_path)?;
    let raw = request::load_request(&args.request)?;

    match validate(&raw, &catalog) {
        Ok(spec) => {
            println!(
                "{} {} {} {} ({}, service pack {}, {})",
                "✓".green(),
                "valid:".bold(),
                spec.version,
                spec.edition,
                spec.arch,
                spec.service_pack,
                spec.language,
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {}", "✗".red(), "invalid request:".bold());
            for violation in &err.violations {
                eprintln!("  {} {violation}", "-".red());
            }
            anyhow::bail!("{} constraint(s) violated", err.violations.len())
        }
    }
}
