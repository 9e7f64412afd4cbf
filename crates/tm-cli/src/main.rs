//! Tidemark CLI - versioned, reversible SQL schema migrations

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tm_core::CoreError;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{help, migrate};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if is_usage_error(&err) {
                eprintln!();
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Help => help::execute(),
        command => migrate::execute(&command.to_command(), &cli.global),
    }
}

/// `RUST_LOG` wins when set; otherwise `-v` selects debug output
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Failures caused by how the tool was invoked rather than by a migration
fn is_usage_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<CoreError>())
        .any(CoreError::is_usage_error)
}
