//! Version tracking table shared by the SQL engines.
//!
//! The table holds exactly one row. Engines differ only in how the UPDATE
//! binds its parameter.

use crate::error::{DbError, DbResult};
use crate::traits::Transaction;
use tm_core::Version;

/// Name of the tracking table created in the target database
pub const VERSION_TABLE: &str = "tidemark_version";

const CREATE_SQL: &str = "CREATE TABLE IF NOT EXISTS tidemark_version (version BIGINT NOT NULL)";
const SELECT_SQL: &str = "SELECT version FROM tidemark_version";
const SEED_SQL: &str = "INSERT INTO tidemark_version (version) VALUES (0)";

pub(crate) fn load(tx: &mut dyn Transaction) -> DbResult<Version> {
    tx.execute_batch(CREATE_SQL).map_err(|e| {
        DbError::VersionStoreError(format!("failed to ensure {VERSION_TABLE} table exists: {e}"))
    })?;

    let stored = tx.query_version(SELECT_SQL).map_err(|e| {
        DbError::VersionStoreError(format!("failed to query {VERSION_TABLE} version: {e}"))
    })?;

    match stored {
        Some(raw) => Version::try_from(raw).map_err(DbError::CorruptVersion),
        None => {
            tx.execute_batch(SEED_SQL).map_err(|e| {
                DbError::VersionStoreError(format!(
                    "failed to initialize {VERSION_TABLE} version to 0: {e}"
                ))
            })?;
            log::debug!("Initialized {VERSION_TABLE} at version 0");
            Ok(Version::ZERO)
        }
    }
}

/// `update_sql` must set `version` from its single bound parameter
pub(crate) fn save(tx: &mut dyn Transaction, update_sql: &str, version: Version) -> DbResult<()> {
    tx.execute_with_version(update_sql, version.as_i64())
        .map_err(|e| {
            DbError::VersionStoreError(format!(
                "failed to update {VERSION_TABLE} version to {version}: {e}"
            ))
        })?;
    Ok(())
}
