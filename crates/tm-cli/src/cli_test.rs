use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_down_count_defaults_to_one() {
    let cli = Cli::parse_from(["tm", "down"]);
    match cli.command {
        Commands::Down(args) => assert_eq!(args.count, 1),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from(["tm", "status", "-p", "proj", "--target", "x.duckdb"]);
    assert_eq!(cli.global.project_dir, "proj");
    assert_eq!(cli.global.target.as_deref(), Some("x.duckdb"));
}

#[test]
fn test_create_joins_description_words() {
    let cli = Cli::parse_from(["tm", "create", "add", "users", "--idempotent"]);
    match cli.command {
        Commands::Create(args) => {
            assert_eq!(args.description, vec!["add", "users"]);
            assert!(args.idempotent);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_verbose_and_quiet_conflict() {
    assert!(Cli::try_parse_from(["tm", "-v", "-q", "up"]).is_err());
}
