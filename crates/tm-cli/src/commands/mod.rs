//! CLI command implementations

pub(crate) mod common;
pub(crate) mod help;
pub(crate) mod migrate;
