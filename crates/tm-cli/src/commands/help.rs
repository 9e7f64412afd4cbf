//! Help command implementation

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::Cli;

/// Print the long usage; never reads config or touches the database
pub(crate) fn execute() -> Result<()> {
    Cli::command().print_long_help()?;
    Ok(())
}
