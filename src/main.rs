mod cli;
mod commands;
mod probe;
mod render;
mod request;
mod runner;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Validate(args) => commands::validate::run(&args, cli.catalog.as_deref()),
        Command::Plan(args) => commands::plan::run(&args, cli.catalog.as_deref()),
        Command::Apply(args) => commands::apply::run(&args, cli.catalog.as_deref()),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "msodeploy", &mut io::stdout());
            Ok(())
        }
    }
}
