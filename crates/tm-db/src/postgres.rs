//! PostgreSQL database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Driver, Transaction, VersionStore};
use crate::version_table;
use postgres::{Client, NoTls};
use tm_core::{ConnectionParams, Version};

const UPDATE_SQL: &str = "UPDATE tidemark_version SET version = $1";

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// PostgreSQL database backend
pub struct PostgresBackend {
    client: Client,
}

impl PostgresBackend {
    /// Connect using a libpq-style connection string or URL
    pub fn connect(dsn: &str) -> DbResult<Self> {
        let client = Client::connect(dsn, NoTls)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Database for PostgresBackend {
    fn db_type(&self) -> &'static str {
        "postgres"
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .client
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction<'conn> {
    tx: postgres::Transaction<'conn>,
}

impl Transaction for PostgresTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.tx.batch_execute(sql)?;
        Ok(())
    }

    fn query_version(&mut self, sql: &str) -> DbResult<Option<i64>> {
        let row = self.tx.query_opt(sql, &[])?;
        let version = match row {
            Some(row) => Some(row.try_get::<_, i64>(0)?),
            None => None,
        };
        Ok(version)
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        let affected = self.tx.execute(sql, &[&version])?;
        Ok(affected as usize)
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

/// PostgreSQL engine
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl VersionStore for PostgresDriver {
    fn load_current_version(&self, tx: &mut dyn Transaction) -> DbResult<Version> {
        version_table::load(tx)
    }

    fn save_current_version(&self, tx: &mut dyn Transaction, version: Version) -> DbResult<()> {
        version_table::save(tx, UPDATE_SQL, version)
    }

    fn connection_string(&self, params: &ConnectionParams) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            urlencoding::encode(&params.user),
            urlencoding::encode(&params.pass),
            params.host,
            params.port.unwrap_or(DEFAULT_PORT),
            urlencoding::encode(&params.name),
        )
    }
}

impl Driver for PostgresDriver {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn connect(&self, dsn: &str) -> DbResult<Box<dyn Database>> {
        Ok(Box::new(PostgresBackend::connect(dsn)?))
    }

    fn version_store(&self) -> &dyn VersionStore {
        self
    }
}
