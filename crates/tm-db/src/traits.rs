//! Database trait definitions

use crate::error::DbResult;
use tm_core::{ConnectionParams, Version};

/// An open connection to the target database.
pub trait Database {
    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Start a transaction. Only one may be open at a time.
    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>>;
}

/// A transaction on a [`Database`].
///
/// Dropping a transaction without calling [`commit`](Transaction::commit)
/// rolls it back.
pub trait Transaction {
    /// Execute one or more SQL statements
    fn execute_batch(&mut self, sql: &str) -> DbResult<()>;

    /// Run a query whose first row's first column is a version, returning
    /// `None` when there are no rows
    fn query_version(&mut self, sql: &str) -> DbResult<Option<i64>>;

    /// Execute a statement with a single bound version parameter, returning
    /// affected rows
    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize>;

    fn commit(self: Box<Self>) -> DbResult<()>;

    fn rollback(self: Box<Self>) -> DbResult<()>;
}

/// Durable storage of the current version inside the target database.
///
/// Implemented once per engine; everything engine-specific about tracking
/// the version lives behind this trait.
pub trait VersionStore {
    /// Read the current version, creating the tracking table and seeding it
    /// with 0 on first use
    fn load_current_version(&self, tx: &mut dyn Transaction) -> DbResult<Version>;

    /// Overwrite the current version. Safe to repeat with the same value.
    fn save_current_version(&self, tx: &mut dyn Transaction, version: Version) -> DbResult<()>;

    /// Build a connection string from parts; an unset port selects the
    /// engine's default
    fn connection_string(&self, params: &ConnectionParams) -> String;
}

/// A supported database engine
pub trait Driver: VersionStore {
    /// Name used to select the driver (`DB_DRIVER`)
    fn name(&self) -> &'static str;

    /// Open a connection
    fn connect(&self, dsn: &str) -> DbResult<Box<dyn Database>>;

    /// This driver's version tracking
    fn version_store(&self) -> &dyn VersionStore;
}
