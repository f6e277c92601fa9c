//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use vf_core::{Config, Selection, ViewFile};
use vf_deploy::{DeployError, DeploymentPlanner};

use crate::cli::{GlobalArgs, SelectArgs};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Per-view status shown in result tables and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RunStatus {
    Success,
    Error,
    Skipped,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Error => write!(f, "error"),
            RunStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// A loaded project: its root directory and parsed configuration
#[derive(Debug)]
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
}

/// Load the project named by the global CLI arguments.
///
/// `--config` wins over the config file in the project directory;
/// `--verbose` switches on `deployment.verbose` for this invocation.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project configuration")?;

    if global.verbose {
        config.deployment.verbose = true;
    }

    Ok(Project { root, config })
}

/// Turn the command line selection into a discovery selection
pub(crate) fn selection(args: &SelectArgs) -> Selection {
    Selection::from_items(args.items())
}

/// Target and available view files for an inspection command, or `None`
/// (after telling the user) when the selection is empty
pub(crate) fn discover_views(
    planner: &DeploymentPlanner<'_>,
    selection: &Selection,
) -> Result<Option<(Vec<ViewFile>, Vec<ViewFile>)>> {
    match planner.discover(selection) {
        Ok(found) => Ok(Some(found)),
        Err(DeployError::NoViews) => {
            eprintln!("No SQL files found to analyze");
            Ok(None)
        }
        Err(e) => Err(e).context("View discovery failed"),
    }
}

/// Common envelope for JSON command output.
///
/// Most commands produce a timestamp, elapsed time, success/failure counts,
/// and a vec of per-item results.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CommandResults<T: Serialize> {
    pub timestamp: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<T>,
}

impl<T: Serialize> CommandResults<T> {
    /// Build the envelope, stamping the current time
    pub(crate) fn new(
        start: Instant,
        success_count: usize,
        failure_count: usize,
        results: Vec<T>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            success_count,
            failure_count,
            results,
        }
    }
}

/// Print `data` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
///
/// For each column, returns the maximum width across the header and all
/// row values so that data aligns when printed with left-padding.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Format a table as lines: header, dash separator, then each row.
/// Columns are separated by two spaces.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let pad_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(pad_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Print a formatted table to stdout.
///
/// # Examples
///
/// ```ignore
/// print_table(
///     &["VIEW", "STATUS"],
///     &[vec!["orders".into(), "success".into()]],
/// );
/// // VIEW    STATUS
/// // ------  -------
/// // orders  success
/// ```
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{}", line);
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
