//! Migration execution

use crate::error::{RunError, RunResult};
use tm_core::{
    resolve, Catalog, Command, Direction, ExecutionPlan, Migration, Position, ScriptSource,
    Version,
};
use tm_db::{with_transaction, Database, VersionStore};

type Observer<'a> = Box<dyn FnMut(Direction, &Migration) + 'a>;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Direction of the plan, `None` when nothing ran
    pub direction: Option<Direction>,

    /// Versions of the migrations run, in execution order
    pub applied: Vec<Version>,

    /// Current version recorded once the run finished
    pub final_version: Version,
}

/// Applies execution plans against one database connection.
///
/// Migrations run strictly one after another. Each gets its own transaction
/// holding both its script and the version update, so the recorded version
/// always names the last migration that fully committed.
pub struct Runner<'a> {
    db: &'a mut dyn Database,
    store: &'a dyn VersionStore,
    source: &'a dyn ScriptSource,
    observer: Option<Observer<'a>>,
}

impl<'a> Runner<'a> {
    /// Create a new runner
    pub fn new(
        db: &'a mut dyn Database,
        store: &'a dyn VersionStore,
        source: &'a dyn ScriptSource,
    ) -> Self {
        Self {
            db,
            store,
            source,
            observer: None,
        }
    }

    /// Call `observer` before each migration starts
    pub fn on_step(mut self, observer: impl FnMut(Direction, &Migration) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Read the recorded version in its own transaction
    pub fn current_version(&mut self) -> RunResult<Version> {
        let store = self.store;
        with_transaction(&mut *self.db, |tx| store.load_current_version(tx))
            .map_err(RunError::CurrentVersion)
    }

    /// Read the current version, resolve `command` against `catalog`, and
    /// execute the resulting plan
    pub fn run(&mut self, command: &Command, catalog: &mut Catalog) -> RunResult<RunReport> {
        let current = self.current_version()?;
        log::debug!("Database {} at version {current}", self.db.db_type());
        let plan = resolve(command, current, catalog)?;
        self.execute(&plan, catalog, current)
    }

    /// Execute `plan`, stopping at the first failure.
    ///
    /// Migrations committed before a failure stay applied.
    pub fn execute(
        &mut self,
        plan: &ExecutionPlan,
        catalog: &mut Catalog,
        current: Version,
    ) -> RunResult<RunReport> {
        let mut report = RunReport {
            direction: plan.direction(),
            applied: Vec::with_capacity(plan.len()),
            final_version: current,
        };

        let Some(direction) = plan.direction() else {
            log::info!("Already at version {current}, nothing to do");
            return Ok(report);
        };

        // Reject the whole plan before anything runs if it does not fit
        let len = catalog.len();
        let out_of_range = |index| RunError::PlanOutOfRange { index, len };
        let indices = plan.indices();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(out_of_range(index));
        }

        for index in indices {
            let persist = version_after(catalog, direction, index).ok_or_else(|| out_of_range(index))?;
            let migration = catalog.get_mut(index).ok_or_else(|| out_of_range(index))?;

            self.apply(migration, direction, persist)?;
            report.applied.push(migration.version());
            report.final_version = persist;
        }

        log::info!(
            "Applied {} migration(s), now at version {}",
            report.applied.len(),
            report.final_version
        );
        Ok(report)
    }

    fn apply(
        &mut self,
        migration: &mut Migration,
        direction: Direction,
        persist: Version,
    ) -> RunResult<()> {
        if let Some(observer) = self.observer.as_mut() {
            observer(direction, migration);
        }
        log::info!("{direction} {}", migration.name());

        let loaded = migration.load(self.source).map(|_| ());
        loaded.map_err(|source| RunError::Load {
            name: migration.name().to_string(),
            source,
        })?;

        let sql = migration.body(direction).unwrap_or_default();
        let store = self.store;
        with_transaction(&mut *self.db, |tx| {
            if sql.trim().is_empty() {
                log::debug!("Empty {direction} script, only recording version {persist}");
            } else {
                tx.execute_batch(sql)?;
            }
            store.save_current_version(tx, persist)
        })
        .map_err(|source| RunError::Apply {
            name: migration.name().to_string(),
            source,
        })
    }
}

/// Version recorded once the migration at `index` has run in `direction`.
///
/// Applying a migration records its own version. Reverting one records the
/// version of the migration before it, or 0 at the start of the catalog, so
/// the recorded version always names the last applied migration. `None` when
/// `index` is not in the catalog.
fn version_after(catalog: &Catalog, direction: Direction, index: usize) -> Option<Version> {
    match direction {
        Direction::Forward => catalog.version_at(Position::At(index)),
        Direction::Backward => catalog
            .get(index)
            .and_then(|_| match index.checked_sub(1) {
                Some(previous) => catalog.version_at(Position::At(previous)),
                None => Some(Version::ZERO),
            }),
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
