//! Parsed user requests and their argument parsers.

use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use std::fmt;
use std::num::NonZeroUsize;

/// What the user asked Tidemark to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply up to `count` pending migrations, or all of them
    StepUp(Option<NonZeroUsize>),
    /// Revert up to `count` applied migrations, or all of them
    StepDown(Option<NonZeroUsize>),
    /// Move forward or backward until `target` is the current version
    GotoVersion(Version),
    /// Print usage
    Help,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::StepUp(None) => write!(f, "up"),
            Command::StepUp(Some(n)) => write!(f, "up {n}"),
            Command::StepDown(None) => write!(f, "down"),
            Command::StepDown(Some(n)) => write!(f, "down {n}"),
            Command::GotoVersion(target) => write!(f, "goto {target}"),
            Command::Help => write!(f, "help"),
        }
    }
}

/// Parse the optional `N` of `up N` / `down N`: a positive integer.
pub fn parse_count(arg: &str) -> CoreResult<NonZeroUsize> {
    let num: i64 = arg.parse().map_err(|_| CoreError::InvalidArgument {
        message: format!("\"{arg}\" is not a valid number of migrations"),
    })?;

    if num <= 0 {
        return Err(CoreError::InvalidArgument {
            message: format!("\"{arg}\" is not a positive number"),
        });
    }

    // Counts beyond the address space are clamped like any other overshoot
    let num = usize::try_from(num).unwrap_or(usize::MAX);
    NonZeroUsize::new(num).ok_or_else(|| CoreError::InvalidArgument {
        message: format!("\"{arg}\" is not a positive number"),
    })
}

/// Parse the `VERSION` of `goto VERSION`: a non-negative integer.
pub fn parse_target(arg: &str) -> CoreResult<Version> {
    arg.parse()
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
