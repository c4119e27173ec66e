//! `msodeploy apply` - converge the machine toward the requested state

use crate::cli::ApplyArgs;
use crate::probe::MachineProbe;
use crate::request;
use crate::runner::{self, ProcessExecutor};
use anyhow::Result;
use colored::Colorize;
use deploykit::{ExecuteOptions, plan, resolve, run_plan, validate};
use std::path::Path;

pub fn run(args: &ApplyArgs, catalog_path: Option<&Path>) -> Result<()> {
    let catalog = request::load_catalog(catalog_path)?;
    let raw = request::load_request(&args.request)?;
    let spec = validate(&raw, &catalog)?;
    let variant = resolve(&spec, &catalog)?;
    let operations = plan(&spec, &variant);

    let work_dir = match &args.work_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => runner::default_work_dir()?,
    };

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
    };
    let mut executor = ProcessExecutor::new(&work_dir);

    let summary = run_plan(&operations, &MachineProbe, &mut executor, &opts)?;

    let label = if args.dry_run { "would apply" } else { "applied" };
    println!(
        "{} {} {label}, {} skipped",
        "done:".bold().green(),
        summary.applied,
        summary.skipped,
    );
    Ok(())
}
