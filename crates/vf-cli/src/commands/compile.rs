//! Compile command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;
use vf_core::{FsSourceProvider, ViewName};
use vf_deploy::DeploymentPlanner;
use vf_jinja::CompiledOutput;

use crate::cli::{CompileArgs, GlobalArgs};
use crate::commands::common::{discover_views, load_project, selection, ExitCode};

/// Execute the compile command
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let config = &project.config;

    // Compiled output is always written here, whatever save_compiled says
    let output_dir = args
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.compiled_dir_absolute(&project.root));
    let output = CompiledOutput::new(&output_dir, config.views_dir_absolute(&project.root));

    let planner = DeploymentPlanner::new(&project.root, config, &FsSourceProvider)
        .context("Failed to prepare compilation")?
        .with_output(Some(output));

    let Some((targets, available)) = discover_views(&planner, &selection(&args.selection))? else {
        return Ok(());
    };

    let mut registry = planner.pre_register(&available);
    let graph = planner.graph(&available);
    let order: Vec<ViewName> = match planner.order(&graph, &targets) {
        Ok(order) => order,
        Err(e) => {
            eprintln!("Dependency error: {}", e);
            targets.iter().map(|f| f.name.clone()).collect()
        }
    };

    println!("Compiling {} views...\n", order.len());

    let mut compiled = 0;
    let mut failed = 0;
    for name in &order {
        let Some(file) = targets.iter().find(|f| &f.name == name) else {
            continue;
        };
        match planner.compile_view(file, &mut registry) {
            Ok((view, _)) => {
                compiled += 1;
                println!("  ✓ {} -> {}", view.name, view.full_name);
            }
            Err(e) => {
                failed += 1;
                println!("  ✗ {}: {}", name, e);
            }
        }
    }

    println!();
    println!("Compiled {}/{} views", compiled, order.len());
    println!("  Output directory: {}", output_dir.display());

    if failed > 0 {
        return Err(ExitCode(1).into());
    }

    Ok(())
}
