//! Execution plan resolution.
//!
//! The database's current version is treated as a position on the catalog's
//! version line. Every command becomes a directed sub-range of that line:
//! `up` and `down` are relative moves, `goto` an absolute one.

use crate::catalog::Catalog;
use crate::command::Command;
use crate::error::{CoreError, CoreResult};
use crate::version::Version;
use std::fmt;

/// A point on the version line.
///
/// `Origin` sits before the first migration (version 0); `At(i)` means every
/// migration up to and including catalog index `i` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    Origin,
    At(usize),
}

impl Position {
    /// Catalog index of the first migration after this position
    pub fn next_index(self) -> usize {
        match self {
            Position::Origin => 0,
            Position::At(index) => index + 1,
        }
    }
}

/// Which script of a migration is run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "UP"),
            Direction::Backward => write!(f, "DOWN"),
        }
    }
}

/// The migrations one invocation runs, and in which order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPlan {
    /// Nothing to do
    Noop,
    /// Apply `first..=last` ascending
    Forward { first: usize, last: usize },
    /// Revert `from` down to, but not including, `to`
    Backward { from: usize, to: Position },
}

impl ExecutionPlan {
    fn forward(first: usize, last: usize) -> Self {
        if first > last {
            ExecutionPlan::Noop
        } else {
            ExecutionPlan::Forward { first, last }
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            ExecutionPlan::Noop => None,
            ExecutionPlan::Forward { .. } => Some(Direction::Forward),
            ExecutionPlan::Backward { .. } => Some(Direction::Backward),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, ExecutionPlan::Noop)
    }

    /// Catalog indices in execution order
    pub fn indices(&self) -> Vec<usize> {
        match *self {
            ExecutionPlan::Noop => Vec::new(),
            ExecutionPlan::Forward { first, last } => (first..=last).collect(),
            ExecutionPlan::Backward { from, to } => (to.next_index()..=from).rev().collect(),
        }
    }

    /// Number of migrations the plan runs
    pub fn len(&self) -> usize {
        match *self {
            ExecutionPlan::Noop => 0,
            ExecutionPlan::Forward { first, last } => last - first + 1,
            ExecutionPlan::Backward { from, to } => from + 1 - to.next_index(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the plan that takes the database from `current` to where
/// `command` asks.
///
/// Counts that overshoot either end of the catalog are clamped.
pub fn resolve(command: &Command, current: Version, catalog: &Catalog) -> CoreResult<ExecutionPlan> {
    let position = catalog
        .position(current)
        .ok_or(CoreError::CurrentVersionNotFound(current))?;

    let plan = match *command {
        Command::StepUp(count) => {
            let Some(last) = catalog.last_index() else {
                return Ok(ExecutionPlan::Noop);
            };
            let first = position.next_index();
            let end = match count {
                Some(n) => first.saturating_add(n.get() - 1).min(last),
                None => last,
            };
            ExecutionPlan::forward(first, end)
        }
        Command::StepDown(count) => match position {
            Position::Origin => ExecutionPlan::Noop,
            Position::At(from) => {
                let to = match count {
                    Some(n) if n.get() <= from => Position::At(from - n.get()),
                    _ => Position::Origin,
                };
                ExecutionPlan::Backward { from, to }
            }
        },
        Command::GotoVersion(target) => {
            let target_position = catalog
                .position(target)
                .ok_or(CoreError::TargetVersionNotFound(target))?;

            match (position, target_position) {
                (cur, tar) if cur == tar => ExecutionPlan::Noop,
                (cur, Position::At(last)) if cur < Position::At(last) => {
                    ExecutionPlan::forward(cur.next_index(), last)
                }
                (Position::At(from), to) => ExecutionPlan::Backward { from, to },
                // Origin is below every position other than itself
                (Position::Origin, _) => ExecutionPlan::Noop,
            }
        }
        Command::Help => ExecutionPlan::Noop,
    };

    log::debug!("Resolved `{command}` at version {current} to {plan:?}");
    Ok(plan)
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
