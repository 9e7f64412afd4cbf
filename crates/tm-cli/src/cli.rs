//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tm_core::command::{parse_count, parse_target};
use tm_core::{Command, Version};

const LONG_HELP_NOTES: &str = "\
Examples:
  tidemark up          Apply every pending migration
  tidemark up 2        Apply the next two pending migrations
  tidemark down        Revert every applied migration
  tidemark down 1      Revert the most recently applied migration
  tidemark goto 20     Move forward or back until version 20 is current
  tidemark goto 0      Revert everything

Environment variables:
  DB_DRIVER    Database engine (required)
  DB_CONN      Full connection string; overrides the other DB_* settings
  DB_USER      Database user
  DB_PASS      Database password
  DB_HOST      Database host
  DB_PORT      Database port (defaults to the engine's standard port)
  DB_NAME      Database name, or the database file for duckdb
  MIGRATIONS   Directory containing migration files (required)

Supported drivers:
  duckdb, postgres, mysql

Migration files are named <version>_<description>.sql and contain an
'-- @up' section followed by a '-- @down' section.";

/// Tidemark - versioned, reversible SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true, arg_required_else_help = true)]
#[command(after_long_help = LONG_HELP_NOTES)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read settings from a YAML file; environment and flags take precedence
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database engine
    #[arg(long, env = "DB_DRIVER", global = true)]
    pub driver: Option<String>,

    /// Full connection string
    #[arg(long, env = "DB_CONN", global = true, hide_env_values = true)]
    pub conn: Option<String>,

    /// Database user
    #[arg(long, env = "DB_USER", global = true)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASS", global = true, hide_env_values = true)]
    pub pass: Option<String>,

    /// Database host
    #[arg(long, env = "DB_HOST", global = true)]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = "DB_PORT", global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Database name, or the database file for duckdb
    #[arg(long, env = "DB_NAME", global = true)]
    pub name: Option<String>,

    /// Directory containing migration files
    #[arg(long, env = "MIGRATIONS", global = true)]
    pub migrations: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations, all of them unless a count is given
    Up(StepArgs),

    /// Revert applied migrations, all of them unless a count is given
    Down(StepArgs),

    /// Migrate forward or backward until VERSION is current
    Goto(GotoArgs),

    /// Show detailed usage
    Help,
}

/// Arguments for the up and down commands
#[derive(Args, Debug)]
pub struct StepArgs {
    /// Number of migrations to run
    #[arg(value_parser = count_arg)]
    pub count: Option<NonZeroUsize>,
}

/// Arguments for the goto command
#[derive(Args, Debug)]
pub struct GotoArgs {
    /// Version to end at; 0 reverts everything
    #[arg(value_parser = target_arg)]
    pub version: Version,
}

impl Commands {
    /// The migration command this invocation asks for
    pub fn to_command(&self) -> Command {
        match self {
            Commands::Up(args) => Command::StepUp(args.count),
            Commands::Down(args) => Command::StepDown(args.count),
            Commands::Goto(args) => Command::GotoVersion(args.version),
            Commands::Help => Command::Help,
        }
    }
}

fn count_arg(s: &str) -> Result<NonZeroUsize, String> {
    parse_count(s).map_err(|e| e.to_string())
}

fn target_arg(s: &str) -> Result<Version, String> {
    parse_target(s).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
