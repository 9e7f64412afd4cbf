//! tm-db - Database layer for Tidemark
//!
//! This crate provides the `Database`, `Transaction`, and `VersionStore`
//! traits, the tracking of the current version inside the target database,
//! and drivers for DuckDB, PostgreSQL (`postgres` feature), and MySQL
//! (`mysql` feature).

pub mod drivers;
pub mod duckdb;
pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;
pub mod transaction;
pub mod version_table;

pub use self::duckdb::{DuckDbBackend, DuckDbDriver};
#[cfg(feature = "mysql")]
pub use self::mysql::{MySqlBackend, MySqlDriver};
#[cfg(feature = "postgres")]
pub use self::postgres::{PostgresBackend, PostgresDriver};
pub use error::{DbError, DbResult};
pub use traits::{Database, Driver, Transaction, VersionStore};
pub use transaction::with_transaction;
pub use version_table::VERSION_TABLE;
