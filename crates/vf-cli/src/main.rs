//! Viewforge CLI - deploy templated SQL views in dependency order

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{compile, deps, run, validate};

/// Install the logger: `warn` by default, `debug` with `--verbose`,
/// `RUST_LOG` overrides both
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Compile(args) => compile::execute(args, &cli.global).await,
        cli::Commands::Deps(args) => deps::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {:#}", err);
                1
            }
        };
        std::process::exit(code);
    }
}
