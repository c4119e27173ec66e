use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "msodeploy")]
#[command(version)]
#[command(about = "Desired-state deployment CLI for Microsoft Office", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Catalog file overriding the built-in product table
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a deployment request without planning anything
    Validate(RequestArgs),

    /// Show the operations a request would run, without touching the machine
    Plan(PlanArgs),

    /// Converge the machine toward the requested state
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct RequestArgs {
    /// Deployment request file (TOML)
    pub request: PathBuf,
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Deployment request file (TOML)
    pub request: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Deployment request file (TOML)
    pub request: PathBuf,

    /// Probe and plan, but don't run any installer
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Directory where config files are rendered (defaults to a temp dir)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
