use super::*;
use std::path::Path;
use tm_core::{CoreError, MemoryScriptSource};
use tm_db::{DuckDbBackend, DuckDbDriver};

const USERS: &str = "\
-- @up
CREATE TABLE users (id INTEGER);
-- @down
DROP TABLE users;
";

const POSTS: &str = "\
-- @up
CREATE TABLE posts (id INTEGER);
-- @down
DROP TABLE posts;
";

const TAGS: &str = "\
-- @up
CREATE TABLE tags (id INTEGER);
-- @down
DROP TABLE tags;
";

fn catalog_of(names: &[&str]) -> Catalog {
    Catalog::from_names(Path::new("migrations"), names.iter().copied()).unwrap()
}

fn three_migrations() -> (Catalog, MemoryScriptSource) {
    let mut source = MemoryScriptSource::new();
    source
        .insert("1_users.sql", USERS)
        .insert("2_posts.sql", POSTS)
        .insert("3_tags.sql", TAGS);
    (
        catalog_of(&["1_users.sql", "2_posts.sql", "3_tags.sql"]),
        source,
    )
}

fn v(n: u64) -> Version {
    Version::new(n).unwrap()
}

fn run(
    db: &mut DuckDbBackend,
    source: &MemoryScriptSource,
    catalog: &mut Catalog,
    command: Command,
) -> RunResult<RunReport> {
    Runner::new(db, &DuckDbDriver, source).run(&command, catalog)
}

fn current(db: &mut DuckDbBackend) -> Version {
    let source = MemoryScriptSource::new();
    let version = Runner::new(db, &DuckDbDriver, &source)
        .current_version()
        .unwrap();
    version
}

fn table_exists(db: &DuckDbBackend, table: &str) -> bool {
    let count: i64 = db
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

fn up(n: usize) -> Command {
    Command::StepUp(std::num::NonZeroUsize::new(n))
}

fn down(n: usize) -> Command {
    Command::StepDown(std::num::NonZeroUsize::new(n))
}

#[test]
fn test_up_all_from_fresh_database() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();

    let report = run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    assert_eq!(report.direction, Some(Direction::Forward));
    assert_eq!(report.applied, vec![v(1), v(2), v(3)]);
    assert_eq!(report.final_version, v(3));
    assert_eq!(current(&mut db), v(3));
    assert!(table_exists(&db, "users"));
    assert!(table_exists(&db, "posts"));
    assert!(table_exists(&db, "tags"));
}

#[test]
fn test_up_with_count_stops_early() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();

    let report = run(&mut db, &source, &mut catalog, up(2)).unwrap();

    assert_eq!(report.applied, vec![v(1), v(2)]);
    assert_eq!(current(&mut db), v(2));
    assert!(table_exists(&db, "posts"));
    assert!(!table_exists(&db, "tags"));
}

#[test]
fn test_down_one_records_previous_version() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    let report = run(&mut db, &source, &mut catalog, down(1)).unwrap();

    assert_eq!(report.direction, Some(Direction::Backward));
    assert_eq!(report.applied, vec![v(3)]);
    assert_eq!(report.final_version, v(2));
    assert_eq!(current(&mut db), v(2));
    assert!(!table_exists(&db, "tags"));
    assert!(table_exists(&db, "posts"));
}

#[test]
fn test_down_all_returns_to_zero() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    let report = run(&mut db, &source, &mut catalog, Command::StepDown(None)).unwrap();

    assert_eq!(report.applied, vec![v(3), v(2), v(1)]);
    assert_eq!(report.final_version, Version::ZERO);
    assert_eq!(current(&mut db), Version::ZERO);
    assert!(!table_exists(&db, "users"));
}

#[test]
fn test_goto_moves_both_ways() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();

    let forward = run(&mut db, &source, &mut catalog, Command::GotoVersion(v(2))).unwrap();
    assert_eq!(forward.applied, vec![v(1), v(2)]);
    assert_eq!(current(&mut db), v(2));

    let backward = run(
        &mut db,
        &source,
        &mut catalog,
        Command::GotoVersion(Version::ZERO),
    )
    .unwrap();
    assert_eq!(backward.applied, vec![v(2), v(1)]);
    assert_eq!(current(&mut db), Version::ZERO);
}

#[test]
fn test_goto_current_version_runs_nothing() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    run(&mut db, &source, &mut catalog, up(2)).unwrap();

    let report = run(&mut db, &source, &mut catalog, Command::GotoVersion(v(2))).unwrap();

    assert_eq!(report.direction, None);
    assert!(report.applied.is_empty());
    assert_eq!(report.final_version, v(2));
}

#[test]
fn test_up_when_fully_applied_is_noop() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    let report = run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    assert!(report.applied.is_empty());
    assert_eq!(report.final_version, v(3));
}

#[test]
fn test_missing_down_marker_fails_before_running() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let mut source = MemoryScriptSource::new();
    source.insert("7_init", "-- @up\nCREATE TABLE users (id INTEGER);\n");
    let mut catalog = catalog_of(&["7_init"]);

    let err = run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap_err();

    assert!(matches!(err, RunError::Load { .. }));
    assert_eq!(err.migration_name(), Some("7_init"));
    let RunError::Load { source, .. } = &err else {
        unreachable!()
    };
    assert!(std::error::Error::source(source)
        .unwrap()
        .to_string()
        .contains("missing required down marker"));
    assert_eq!(current(&mut db), Version::ZERO);
    assert!(!table_exists(&db, "users"));
}

#[test]
fn test_failure_midway_keeps_earlier_migrations() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let mut source = MemoryScriptSource::new();
    source
        .insert("1_users.sql", USERS)
        .insert(
            "2_broken.sql",
            "-- @up\nCREATE TABLE half (id INTEGER);\nINSERT INTO missing_table VALUES (1);\n-- @down\nDROP TABLE half;\n",
        )
        .insert("3_tags.sql", TAGS);
    let mut catalog = catalog_of(&["1_users.sql", "2_broken.sql", "3_tags.sql"]);

    let err = run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap_err();

    assert!(matches!(err, RunError::Apply { .. }));
    assert_eq!(err.migration_name(), Some("2_broken.sql"));
    assert_eq!(current(&mut db), v(1));
    assert!(table_exists(&db, "users"));
    assert!(!table_exists(&db, "half"));
    assert!(!table_exists(&db, "tags"));
    // Never reached, so never loaded
    assert!(!catalog.get(2).unwrap().is_loaded());
}

#[test]
fn test_unknown_current_version_is_rejected() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    let mut shorter = catalog_of(&["1_users.sql", "2_posts.sql"]);
    let err = run(&mut db, &source, &mut shorter, down(1)).unwrap_err();

    assert!(matches!(
        err,
        RunError::Resolve(CoreError::CurrentVersionNotFound(found)) if found == v(3)
    ));
}

#[test]
fn test_observer_sees_each_step_in_order() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    let mut seen = Vec::new();

    {
        let mut runner = Runner::new(&mut db, &DuckDbDriver, &source)
            .on_step(|direction, migration| seen.push(format!("{direction} {}", migration.name())));
        runner.run(&Command::StepUp(None), &mut catalog).unwrap();
        runner.run(&down(2), &mut catalog).unwrap();
    }

    assert_eq!(
        seen,
        vec![
            "UP 1_users.sql",
            "UP 2_posts.sql",
            "UP 3_tags.sql",
            "DOWN 3_tags.sql",
            "DOWN 2_posts.sql",
        ]
    );
}

#[test]
fn test_empty_down_body_still_records_version() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let mut source = MemoryScriptSource::new();
    source
        .insert("1_users.sql", USERS)
        .insert("2_seed.sql", "-- @up\nINSERT INTO users VALUES (1);\n-- @down\n");
    let mut catalog = catalog_of(&["1_users.sql", "2_seed.sql"]);
    run(&mut db, &source, &mut catalog, Command::StepUp(None)).unwrap();

    let report = run(&mut db, &source, &mut catalog, down(1)).unwrap();

    assert_eq!(report.applied, vec![v(2)]);
    assert_eq!(current(&mut db), v(1));
}

#[test]
fn test_execute_noop_plan_reports_current() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();

    let report = Runner::new(&mut db, &DuckDbDriver, &source)
        .execute(&ExecutionPlan::Noop, &mut catalog, v(2))
        .unwrap();

    assert_eq!(
        report,
        RunReport {
            direction: None,
            applied: Vec::new(),
            final_version: v(2),
        }
    );
}

#[test]
fn test_version_after_backward_uses_previous_migration() {
    let catalog = catalog_of(&["10_a.sql", "20_b.sql", "30_c.sql"]);

    assert_eq!(version_after(&catalog, Direction::Forward, 1), Some(v(20)));
    assert_eq!(version_after(&catalog, Direction::Backward, 2), Some(v(20)));
    assert_eq!(version_after(&catalog, Direction::Backward, 1), Some(v(10)));
    assert_eq!(version_after(&catalog, Direction::Backward, 0), Some(Version::ZERO));
    assert_eq!(version_after(&catalog, Direction::Forward, 3), None);
    assert_eq!(version_after(&catalog, Direction::Backward, 3), None);
}

#[test]
fn test_plan_from_larger_catalog_is_rejected_before_running() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    let plan = ExecutionPlan::Forward { first: 0, last: 4 };

    let err = Runner::new(&mut db, &DuckDbDriver, &source)
        .execute(&plan, &mut catalog, Version::ZERO)
        .unwrap_err();

    assert!(matches!(err, RunError::PlanOutOfRange { index: 3, len: 3 }));
    assert_eq!(err.migration_name(), None);
    assert!(!table_exists(&db, "users"));
    assert!(catalog.iter().all(|m| !m.is_loaded()));
}

#[test]
fn test_backward_plan_past_catalog_end_is_rejected() {
    let mut db = DuckDbBackend::in_memory().unwrap();
    let (mut catalog, source) = three_migrations();
    let plan = ExecutionPlan::Backward {
        from: 7,
        to: Position::Origin,
    };

    let err = Runner::new(&mut db, &DuckDbDriver, &source)
        .execute(&plan, &mut catalog, v(3))
        .unwrap_err();

    assert!(matches!(err, RunError::PlanOutOfRange { index: 7, len: 3 }));
}
