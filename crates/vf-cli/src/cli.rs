//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Viewforge - deploy templated SQL views in dependency order
#[derive(Parser, Debug)]
#[command(name = "vf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging, compiled SQL in dry runs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path (default: <project-dir>/viewforge.yml)
    #[arg(short, long, global = true, env = "VIEWFORGE_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile, validate and deploy views in dependency order
    Run(RunArgs),

    /// Compile templates into the compiled directory without deploying
    Compile(CompileArgs),

    /// Show the dependency graph and deployment order
    Deps(DepsArgs),

    /// Check that every ref() points at an existing view
    Validate(ValidateArgs),
}

/// View selection shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// View files or names to process (default: all views)
    #[arg(value_name = "VIEW")]
    pub views: Vec<String>,

    /// Comma-separated view files or names, combined with VIEW arguments
    #[arg(short, long)]
    pub select: Option<String>,
}

impl SelectArgs {
    /// Positional views followed by the `--select` items, blanks removed
    pub fn items(&self) -> Vec<String> {
        self.views
            .iter()
            .map(String::as_str)
            .chain(self.select.iter().flat_map(|s| s.split(',')))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub selection: SelectArgs,

    /// Report what would be deployed without contacting the warehouse
    #[arg(long, alias = "dry-run")]
    pub dry: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub selection: SelectArgs,

    /// Override output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub selection: SelectArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub selection: SelectArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text and tables
    Text,
    /// JSON document on stdout
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
