//! Deps command implementation: dependency graph and deployment order

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use vf_core::{DependencyGraph, FsSourceProvider, ViewFile, ViewName};
use vf_deploy::{DeployError, DeploymentPlanner};

use crate::cli::{DepsArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{discover_views, load_project, print_json, print_table, selection};

/// One view in the dependency listing
#[derive(Debug, Serialize)]
struct DepsEntry {
    name: String,
    depends_on: Vec<String>,
    dependents: Vec<String>,
}

/// JSON document for `vf deps --output json`
#[derive(Debug, Serialize)]
struct DepsOutput {
    timestamp: DateTime<Utc>,
    views: Vec<DepsEntry>,
    order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<Vec<String>>,
}

/// Execute the deps command
pub async fn execute(args: &DepsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let planner = DeploymentPlanner::new(&project.root, &project.config, &FsSourceProvider)
        .context("Failed to prepare dependency analysis")?;

    let Some((targets, available)) = discover_views(&planner, &selection(&args.selection))? else {
        return Ok(());
    };

    let graph = planner.graph(&available);
    let entries = graph_entries(&graph, &targets);

    // On a cycle, fall back to discovery order for display
    let (order, cycle) = match planner.order(&graph, &targets) {
        Ok(order) => (order, None),
        Err(DeployError::Cycle { nodes }) => {
            let fallback: Vec<ViewName> = targets.iter().map(|f| f.name.clone()).collect();
            (fallback, Some(nodes))
        }
        Err(e) => return Err(e).context("Failed to order views"),
    };
    let order: Vec<String> = order.iter().map(ToString::to_string).collect();

    match args.output {
        OutputFormat::Json => print_json(&DepsOutput {
            timestamp: Utc::now(),
            views: entries,
            order,
            cycle,
        })?,
        OutputFormat::Text => {
            if let Some(nodes) = &cycle {
                eprintln!(
                    "Dependency error: circular dependencies detected involving: {}",
                    nodes.join(", ")
                );
                eprintln!("Showing discovery order instead\n");
            }
            print_text(&entries, &order);
        }
    }

    Ok(())
}

fn graph_entries(graph: &DependencyGraph, targets: &[ViewFile]) -> Vec<DepsEntry> {
    targets
        .iter()
        .filter_map(|file| {
            let depends_on = graph.dependencies(&file.name)?;
            Some(DepsEntry {
                name: file.name.to_string(),
                depends_on: depends_on.to_vec(),
                dependents: graph
                    .dependents(&file.name)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
        })
        .collect()
}

fn join_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn print_text(entries: &[DepsEntry], order: &[String]) {
    println!("Dependency graph:\n");
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.name.clone(),
                join_or_dash(&e.depends_on),
                join_or_dash(&e.dependents),
            ]
        })
        .collect();
    print_table(&["VIEW", "DEPENDS ON", "USED BY"], &rows);

    println!("\nDeployment order:");
    for (i, view) in order.iter().enumerate() {
        println!("  {}. {}", i + 1, view);
    }
}
