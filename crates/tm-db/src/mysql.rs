//! MySQL database backend implementation
//!
//! MySQL commits DDL implicitly, so a failed script that already ran a DDL
//! statement cannot be fully rolled back. The version update still is.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Driver, Transaction, VersionStore};
use crate::version_table;
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, TxOpts};
use tm_core::{ConnectionParams, Version};

const UPDATE_SQL: &str = "UPDATE tidemark_version SET version = ?";

/// Default MySQL port
pub const DEFAULT_PORT: u16 = 3306;

/// MySQL database backend
pub struct MySqlBackend {
    conn: Conn,
}

impl MySqlBackend {
    /// Connect using a `mysql://` URL
    pub fn connect(dsn: &str) -> DbResult<Self> {
        let opts = Opts::from_url(dsn).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let conn = Conn::new(opts).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl Database for MySqlBackend {
    fn db_type(&self) -> &'static str {
        "mysql"
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .conn
            .start_transaction(TxOpts::default())
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(MySqlTransaction { tx }))
    }
}

struct MySqlTransaction<'conn> {
    tx: mysql::Transaction<'conn>,
}

impl Transaction for MySqlTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.tx.query_drop(sql)?;
        Ok(())
    }

    fn query_version(&mut self, sql: &str) -> DbResult<Option<i64>> {
        Ok(self.tx.query_first::<i64, _>(sql)?)
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        self.tx.exec_drop(sql, (version,))?;
        Ok(self.tx.affected_rows() as usize)
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

/// MySQL engine
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

impl VersionStore for MySqlDriver {
    fn load_current_version(&self, tx: &mut dyn Transaction) -> DbResult<Version> {
        version_table::load(tx)
    }

    fn save_current_version(&self, tx: &mut dyn Transaction, version: Version) -> DbResult<()> {
        version_table::save(tx, UPDATE_SQL, version)
    }

    fn connection_string(&self, params: &ConnectionParams) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            urlencoding::encode(&params.user),
            urlencoding::encode(&params.pass),
            params.host,
            params.port.unwrap_or(DEFAULT_PORT),
            urlencoding::encode(&params.name),
        )
    }
}

impl Driver for MySqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn connect(&self, dsn: &str) -> DbResult<Box<dyn Database>> {
        Ok(Box::new(MySqlBackend::connect(dsn)?))
    }

    fn version_store(&self) -> &dyn VersionStore {
        self
    }
}
