//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Driver, Transaction, VersionStore};
use crate::version_table;
use duckdb::Connection;
use std::path::Path;
use tm_core::{ConnectionParams, Version};

const UPDATE_SQL: &str = "UPDATE tidemark_version SET version = ?";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Connection,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Database for DuckDbBackend {
    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(DuckDbTransaction { tx }))
    }
}

struct DuckDbTransaction<'conn> {
    tx: duckdb::Transaction<'conn>,
}

impl Transaction for DuckDbTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.tx.execute_batch(sql)?;
        Ok(())
    }

    fn query_version(&mut self, sql: &str) -> DbResult<Option<i64>> {
        let mut stmt = self.tx.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let version = match rows.next()? {
            Some(row) => Some(row.get::<_, i64>(0)?),
            None => None,
        };
        Ok(version)
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        Ok(self.tx.execute(sql, duckdb::params![version])?)
    }

    fn commit(self: Box<Self>) -> DbResult<()> {
        self.tx
            .commit()
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.tx
            .rollback()
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

/// Embedded DuckDB engine; the connection string is the database file path
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDriver;

impl VersionStore for DuckDbDriver {
    fn load_current_version(&self, tx: &mut dyn Transaction) -> DbResult<Version> {
        version_table::load(tx)
    }

    fn save_current_version(&self, tx: &mut dyn Transaction, version: Version) -> DbResult<()> {
        version_table::save(tx, UPDATE_SQL, version)
    }

    fn connection_string(&self, params: &ConnectionParams) -> String {
        params.name.clone()
    }
}

impl Driver for DuckDbDriver {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn connect(&self, dsn: &str) -> DbResult<Box<dyn Database>> {
        Ok(Box::new(DuckDbBackend::new(dsn)?))
    }

    fn version_store(&self) -> &dyn VersionStore {
        self
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
