use super::*;
use clap::error::ErrorKind;
use clap::CommandFactory;
use serial_test::serial;

const DB_VARS: &[&str] = &[
    "DB_DRIVER",
    "DB_CONN",
    "DB_USER",
    "DB_PASS",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "MIGRATIONS",
];

fn clear_db_env() {
    for var in DB_VARS {
        std::env::remove_var(var);
    }
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("tidemark").chain(args.iter().copied())).unwrap()
}

fn parse_err(args: &[&str]) -> clap::Error {
    Cli::try_parse_from(std::iter::once("tidemark").chain(args.iter().copied())).unwrap_err()
}

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_up_without_count_applies_all() {
    let cli = parse(&["up"]);
    assert_eq!(cli.command.to_command(), Command::StepUp(None));
}

#[test]
fn test_down_with_count() {
    let cli = parse(&["down", "2"]);
    assert_eq!(
        cli.command.to_command(),
        Command::StepDown(NonZeroUsize::new(2))
    );
}

#[test]
fn test_goto_zero_is_a_valid_target() {
    let cli = parse(&["goto", "0"]);
    assert_eq!(cli.command.to_command(), Command::GotoVersion(Version::ZERO));
}

#[test]
fn test_help_subcommand() {
    let cli = parse(&["help"]);
    assert!(matches!(cli.command, Commands::Help));
    assert_eq!(cli.command.to_command(), Command::Help);
}

#[test]
fn test_zero_count_is_rejected() {
    let err = parse_err(&["up", "0"]);
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("is not a positive number"));
}

#[test]
fn test_non_numeric_count_is_rejected() {
    let err = parse_err(&["down", "many"]);
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_non_numeric_target_is_rejected() {
    let err = parse_err(&["goto", "x7"]);
    assert!(err.to_string().contains("is not a valid target"));
}

#[test]
fn test_goto_requires_version() {
    let err = parse_err(&["goto"]);
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_unknown_command_is_rejected() {
    let err = parse_err(&["sideways"]);
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}

#[test]
fn test_port_zero_is_rejected() {
    let err = parse_err(&["--port", "0", "up"]);
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["up", "-v", "--driver", "duckdb", "--name", "app.duckdb"]);
    assert!(cli.global.verbose);
    assert_eq!(cli.global.driver.as_deref(), Some("duckdb"));
    assert_eq!(cli.global.name.as_deref(), Some("app.duckdb"));
}

#[test]
fn test_long_help_lists_environment_and_drivers() {
    let help = Cli::command().render_long_help().to_string();
    assert!(help.contains("DB_DRIVER"));
    assert!(help.contains("MIGRATIONS"));
    assert!(help.contains("duckdb, postgres, mysql"));
    assert!(help.contains("goto"));
}

// These tests modify environment variables and must run serially

#[test]
#[serial]
fn test_env_vars_fill_database_flags() {
    clear_db_env();
    std::env::set_var("DB_DRIVER", "postgres");
    std::env::set_var("DB_HOST", "db.internal");
    std::env::set_var("DB_PORT", "6543");
    std::env::set_var("MIGRATIONS", "./migrations");

    let cli = parse(&["up"]);
    clear_db_env();

    assert_eq!(cli.global.driver.as_deref(), Some("postgres"));
    assert_eq!(cli.global.host.as_deref(), Some("db.internal"));
    assert_eq!(cli.global.port, Some(6543));
    assert_eq!(cli.global.migrations, Some(PathBuf::from("./migrations")));
}

#[test]
#[serial]
fn test_flags_override_env_vars() {
    clear_db_env();
    std::env::set_var("DB_DRIVER", "postgres");

    let cli = parse(&["--driver", "mysql", "up"]);
    clear_db_env();

    assert_eq!(cli.global.driver.as_deref(), Some("mysql"));
}
