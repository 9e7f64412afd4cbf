//! Up, down, and goto command implementation

use anyhow::{Context, Result};
use tm_core::{Catalog, Command, FsScriptSource};
use tm_db::drivers;
use tm_runner::Runner;

use crate::cli::GlobalArgs;
use crate::commands::common::load_settings;

/// Execute a migration command
pub(crate) fn execute(command: &Command, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;

    let mut catalog = Catalog::load(&settings.migrations).with_context(|| {
        format!("loading migrations from {}", settings.migrations.display())
    })?;
    if catalog.is_empty() {
        println!("no migrations found");
        return Ok(());
    }

    log::debug!(
        "Found {} migrations in {}",
        catalog.len(),
        settings.migrations.display()
    );

    let driver = drivers::load(&settings.driver)?;
    let mut db = drivers::connect(driver, &settings.target).context("connecting to database")?;

    let report = Runner::new(db.as_mut(), driver.version_store(), &FsScriptSource)
        .on_step(|direction, migration| println!("{direction} \"{}\"", migration.name()))
        .run(command, &mut catalog)
        .with_context(|| format!("running '{command}'"))?;

    if global.verbose {
        println!(
            "{} migration(s) run, current version {}",
            report.applied.len(),
            report.final_version
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
