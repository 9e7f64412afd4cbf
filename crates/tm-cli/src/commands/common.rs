//! Shared utilities for CLI commands

use anyhow::Result;
use tm_core::config::DatabaseConfig;
use tm_core::{Config, Settings};

use crate::cli::GlobalArgs;

/// Resolve settings from the config file, environment, and flags.
///
/// clap has already folded environment variables into `global`, with flags
/// taking precedence, so only the file layer is merged here.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let base = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let overrides = Config {
        database: DatabaseConfig {
            driver: global.driver.clone(),
            conn: global.conn.clone(),
            user: global.user.clone(),
            pass: global.pass.clone(),
            host: global.host.clone(),
            port: global.port,
            name: global.name.clone(),
        },
        migrations: global.migrations.clone(),
    };

    Ok(base.merge(overrides).resolve()?)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
