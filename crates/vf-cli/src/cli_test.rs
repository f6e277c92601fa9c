use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["vf", "run"]).unwrap();
    match cli.command {
        Commands::Run(args) => {
            assert!(!args.dry);
            assert_eq!(args.output, OutputFormat::Text);
            assert!(args.selection.items().is_empty());
        }
        other => panic!("expected run, got {:?}", other),
    }
    assert_eq!(cli.global.project_dir, ".");
    assert!(!cli.global.verbose);
}

#[test]
fn test_run_selection_combines_positional_and_select() {
    let cli = Cli::try_parse_from([
        "vf",
        "run",
        "orders.sql",
        "--select",
        "customers, ,revenue",
        "--dry",
    ])
    .unwrap();
    match cli.command {
        Commands::Run(args) => {
            assert!(args.dry);
            assert_eq!(
                args.selection.items(),
                vec!["orders.sql", "customers", "revenue"]
            );
        }
        other => panic!("expected run, got {:?}", other),
    }
}

#[test]
fn test_dry_run_alias() {
    let cli = Cli::try_parse_from(["vf", "run", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Commands::Run(RunArgs { dry: true, .. })));
}

#[test]
fn test_global_args_after_subcommand() {
    let cli =
        Cli::try_parse_from(["vf", "deps", "--project-dir", "proj", "-v", "-o", "json"]).unwrap();
    assert_eq!(cli.global.project_dir, "proj");
    assert!(cli.global.verbose);
    assert!(matches!(
        cli.command,
        Commands::Deps(DepsArgs {
            output: OutputFormat::Json,
            ..
        })
    ));
}

#[test]
fn test_unknown_output_format_rejected() {
    assert!(Cli::try_parse_from(["vf", "validate", "--output", "yaml"]).is_err());
}
