//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - ordered, recorded database migrations
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database path)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default config file and migrations directory
    Init(InitArgs),

    /// Create a new timestamped migration file
    Create(CreateArgs),

    /// Show which migrations are applied and which are pending
    Status(StatusArgs),

    /// Apply every pending migration
    Up,

    /// Revert the most recently applied migrations
    Down(DownArgs),

    /// Run a single idempotent migration, regardless of its status
    Run(RunArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Database path written to the new config
    #[arg(long, default_value = "tidemark.duckdb")]
    pub database_path: String,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Free-form description, used to name the file
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,

    /// Mark the migration as safe to run more than once
    #[arg(long)]
    pub idempotent: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Number of migrations to revert
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Migration identifier (file name, with or without `.sql`)
    pub identifier: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
