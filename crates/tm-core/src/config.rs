//! Configuration types and resolution.
//!
//! Settings come from an optional YAML file, then environment variables, then
//! command-line flags, with later layers winning. The CLI folds environment
//! and flags into one [`Config`] overlay before calling [`Config::merge`].

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Drivers that open a local file rather than a network server
const EMBEDDED_DRIVERS: &[&str] = &["duckdb"];

/// Raw, possibly partial configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory containing migration files
    #[serde(default)]
    pub migrations: Option<PathBuf>,
}

/// Database connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Engine name (duckdb, postgres, mysql)
    #[serde(default)]
    pub driver: Option<String>,

    /// Full connection string; overrides everything but `driver`
    #[serde(default)]
    pub conn: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub pass: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    /// Defaults to the engine's standard port
    #[serde(default)]
    pub port: Option<u16>,

    /// Database name, or file path for embedded engines
    #[serde(default)]
    pub name: Option<String>,
}

/// Pieces of a connection string when no full DSN is configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub user: String,
    pub pass: String,
    pub host: String,
    /// `None` selects the engine's default port
    pub port: Option<u16>,
    pub name: String,
}

/// How to reach the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// Connection string used as-is
    Dsn(String),
    /// Connection string built by the engine from parts
    Params(ConnectionParams),
}

/// Fully validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub driver: String,
    pub target: ConnectionTarget,
    pub migrations: PathBuf,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: Config) -> Config {
        let db = self.database;
        let over = other.database;
        Config {
            database: DatabaseConfig {
                driver: over.driver.or(db.driver),
                conn: over.conn.or(db.conn),
                user: over.user.or(db.user),
                pass: over.pass.or(db.pass),
                host: over.host.or(db.host),
                port: over.port.or(db.port),
                name: over.name.or(db.name),
            },
            migrations: other.migrations.or(self.migrations),
        }
    }

    /// Validate and produce the settings for a run.
    ///
    /// Empty strings count as unset.
    pub fn resolve(self) -> CoreResult<Settings> {
        let db = self.database;
        let driver = required(db.driver, "DB_DRIVER")?;

        let target = match non_empty(db.conn) {
            Some(dsn) => ConnectionTarget::Dsn(dsn),
            None if EMBEDDED_DRIVERS.contains(&driver.as_str()) => {
                ConnectionTarget::Params(ConnectionParams {
                    name: required(db.name, "DB_NAME")?,
                    ..ConnectionParams::default()
                })
            }
            None => {
                let user = required(db.user, "DB_USER")?;
                let pass = required(db.pass, "DB_PASS")?;
                let host = required(db.host, "DB_HOST")?;
                let port = match db.port {
                    Some(0) => {
                        return Err(CoreError::ConfigInvalid {
                            message: "\"0\" is not a valid port".to_string(),
                        })
                    }
                    port => port,
                };
                let name = required(db.name, "DB_NAME")?;
                ConnectionTarget::Params(ConnectionParams {
                    user,
                    pass,
                    host,
                    port,
                    name,
                })
            }
        };

        let migrations = self
            .migrations
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(CoreError::MissingSetting { key: "MIGRATIONS" })?;

        Ok(Settings {
            driver,
            target,
            migrations,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &'static str) -> CoreResult<String> {
    non_empty(value).ok_or(CoreError::MissingSetting { key })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
