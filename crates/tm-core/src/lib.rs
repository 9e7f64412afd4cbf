//! tm-core - Core library for Tidemark
//!
//! This crate provides migration script parsing, catalog discovery, command
//! values, execution plan resolution, and configuration shared by every other
//! Tidemark component. Nothing in here touches a database.

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod migration;
pub mod plan;
pub mod script;
pub mod version;

pub use catalog::Catalog;
pub use command::Command;
pub use config::{Config, ConnectionParams, ConnectionTarget, Settings};
pub use error::{CoreError, CoreResult};
pub use migration::{FsScriptSource, MemoryScriptSource, Migration, ScriptSource, ScriptState};
pub use plan::{resolve, Direction, ExecutionPlan, Position};
pub use script::{Marker, Script, ScriptError};
pub use version::Version;
