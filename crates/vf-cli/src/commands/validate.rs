//! Validate command implementation: check ref() targets

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use vf_core::{available_names, validate_references, FsSourceProvider};
use vf_deploy::DeploymentPlanner;

use crate::cli::{GlobalArgs, OutputFormat, ValidateArgs};
use crate::commands::common::{
    discover_views, load_project, print_json, selection, CommandResults, ExitCode,
};

/// Validation result for one view
#[derive(Debug, Serialize)]
struct ViewValidation {
    name: String,
    valid: bool,
    errors: Vec<String>,
}

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let start = Instant::now();
    let project = load_project(global)?;
    let planner = DeploymentPlanner::new(&project.root, &project.config, &FsSourceProvider)
        .context("Failed to prepare validation")?;

    let Some((targets, available)) = discover_views(&planner, &selection(&args.selection))? else {
        return Ok(());
    };

    let names = available_names(&available);
    let results: Vec<ViewValidation> = targets
        .iter()
        .map(|file| {
            let errors =
                validate_references(std::slice::from_ref(file), &names, &FsSourceProvider);
            ViewValidation {
                name: file.name.to_string(),
                valid: errors.is_empty(),
                errors,
            }
        })
        .collect();

    let invalid = results.iter().filter(|r| !r.valid).count();

    match args.output {
        OutputFormat::Json => {
            let valid = results.len() - invalid;
            print_json(&CommandResults::new(start, valid, invalid, results))?;
        }
        OutputFormat::Text => {
            println!(
                "Validating references in {} views ({} available)\n",
                targets.len(),
                available.len()
            );
            if invalid == 0 {
                println!("✓ All references are valid");
            } else {
                println!("Validation errors found:");
                for error in results.iter().flat_map(|r| &r.errors) {
                    println!("  ✗ {}", error);
                }
            }
        }
    }

    if invalid > 0 {
        return Err(ExitCode(1).into());
    }

    Ok(())
}
