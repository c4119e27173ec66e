//! `msodeploy plan` - show the operation sequence without executing it

use crate::cli::{OutputFormat, PlanArgs};
use crate::request;
use anyhow::Result;
use colored::Colorize;
use deploykit::{IdempotencyProbe, Operation, plan, resolve, validate};
use std::path::Path;

pub fn run(args: &PlanArgs, catalog_path: Option<&Path>) -> Result<()> {
    let catalog = request::load_catalog(catalog_path)?;
    let raw = request::load_request(&args.request)?;
    let spec = validate(&raw, &catalog)?;
    let variant = resolve(&spec, &catalog)?;
    let operations = plan(&spec, &variant);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&operations)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} {} -> {:?} ({} operation{})",
                "plan:".bold(),
                spec.version,
                spec.edition,
                spec.ensure,
                operations.len(),
                if operations.len() == 1 { "" } else { "s" },
            );
            for (i, op) in operations.iter().enumerate() {
                print_operation(i + 1, op);
            }
        }
    }

    Ok(())
}

fn print_operation(index: usize, op: &Operation) {
    println!(
        "  {} {}",
        format!("{index}.").bold(),
        op.kind.to_string().cyan()
    );
    println!(
        "     command: {} {}",
        op.command.program.display(),
        op.command.resolved_args(None).join(" ")
    );
    if let Some(config) = &op.config {
        println!("     config:  {:?} document", config.kind());
    }
    if !op.prerequisites.is_empty() {
        let names: Vec<String> = op.prerequisites.iter().map(ToString::to_string).collect();
        println!("     after:   {}", names.join(", "));
    }
    match &op.probe {
        IdempotencyProbe::BuildAtLeast { key, build } => {
            println!("     skip if: {key} >= {build}");
        }
        IdempotencyProbe::BuildAbsent { key } => {
            println!("     skip if: {key} is absent");
        }
        IdempotencyProbe::FileExists { path } => {
            println!("     skip if: {} exists", path.display());
        }
    }
}
