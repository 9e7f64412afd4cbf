//! Driver registry

use crate::duckdb::DuckDbDriver;
use crate::error::{DbError, DbResult};
use crate::traits::{Database, Driver};
use tm_core::ConnectionTarget;

/// Names of the drivers compiled into this build
pub fn available() -> Vec<&'static str> {
    let mut names = vec!["duckdb"];
    if cfg!(feature = "postgres") {
        names.push("postgres");
    }
    if cfg!(feature = "mysql") {
        names.push("mysql");
    }
    names
}

/// Look up a driver by name
pub fn load(name: &str) -> DbResult<&'static dyn Driver> {
    match name {
        "duckdb" => Ok(&DuckDbDriver),
        #[cfg(feature = "postgres")]
        "postgres" => Ok(&crate::postgres::PostgresDriver),
        #[cfg(feature = "mysql")]
        "mysql" => Ok(&crate::mysql::MySqlDriver),
        other => Err(DbError::UnknownDriver(other.to_string())),
    }
}

/// Open a connection to `target` with `driver`
pub fn connect(driver: &dyn Driver, target: &ConnectionTarget) -> DbResult<Box<dyn Database>> {
    let dsn = match target {
        ConnectionTarget::Dsn(dsn) => dsn.clone(),
        ConnectionTarget::Params(params) => driver.connection_string(params),
    };
    log::debug!("Connecting with the {} driver", driver.name());
    driver.connect(&dsn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::ConnectionParams;

    #[test]
    fn test_load_duckdb() {
        let driver = load("duckdb").unwrap();
        assert_eq!(driver.name(), "duckdb");
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_load_postgres() {
        assert_eq!(load("postgres").unwrap().name(), "postgres");
        assert!(available().contains(&"postgres"));
    }

    #[test]
    fn test_load_unknown_driver() {
        let err = load("oracle").err().unwrap();
        assert!(matches!(err, DbError::UnknownDriver(ref name) if name == "oracle"));
        assert!(err.to_string().contains("Driver \"oracle\" not found"));
    }

    #[test]
    fn test_connect_with_params() {
        let driver = load("duckdb").unwrap();
        let target = ConnectionTarget::Params(ConnectionParams {
            name: ":memory:".to_string(),
            ..ConnectionParams::default()
        });
        let db = connect(driver, &target).unwrap();
        assert_eq!(db.db_type(), "duckdb");
    }

    #[test]
    fn test_connect_with_dsn() {
        let driver = load("duckdb").unwrap();
        let db = connect(driver, &ConnectionTarget::Dsn(":memory:".to_string())).unwrap();
        assert_eq!(db.db_type(), "duckdb");
    }
}
