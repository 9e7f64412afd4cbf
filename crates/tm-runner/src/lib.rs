//! tm-runner - Migration execution for Tidemark
//!
//! This crate walks a resolved execution plan, loading each migration's
//! script just before it runs and applying it together with the new current
//! version in a single transaction.

pub mod error;
pub mod runner;

pub use error::{RunError, RunResult};
pub use runner::{RunReport, Runner};
