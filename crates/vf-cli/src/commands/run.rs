//! Run command implementation: plan, then deploy views in dependency order

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use vf_core::{FsSourceProvider, ViewDefinition};
use vf_db::{create_warehouse, Warehouse};
use vf_deploy::{
    DeploymentExecutor, DeploymentPlan, DeploymentPlanner, DeploymentReport, ExecutionEvent,
    Outcome, ViewStatus,
};

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{
    load_project, print_json, print_table, selection, CommandResults, ExitCode, RunStatus,
};

/// Per-view entry in run output
#[derive(Debug, Clone, Serialize)]
struct ViewRunResult {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    duration_secs: f64,
}

/// JSON document for `vf run --output json`
#[derive(Debug, Serialize)]
struct RunOutput {
    dry_run: bool,
    order: Vec<String>,
    warnings: Vec<String>,
    outcome: Outcome,
    #[serde(flatten)]
    results: CommandResults<ViewRunResult>,
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let start = Instant::now();
    let project = load_project(global)?;
    let dry_run = args.dry || project.config.deployment.dry_run;
    let verbose = project.config.deployment.verbose;
    let json = args.output == OutputFormat::Json;

    let planner = DeploymentPlanner::new(&project.root, &project.config, &FsSourceProvider)
        .context("Failed to prepare deployment")?;
    let plan = planner
        .plan(&selection(&args.selection))
        .context("Deployment aborted")?;

    for failure in &plan.failures {
        eprintln!(
            "Parse error in {}: {}",
            failure.path.display(),
            failure.error
        );
    }

    if plan.is_empty() {
        eprintln!("No valid view files found (each must compile to a CREATE VIEW statement)");
        return Err(ExitCode(1).into());
    }

    let warehouse: Option<Box<dyn Warehouse>> = if dry_run {
        None
    } else {
        Some(
            create_warehouse(&project.config.warehouse, &project.root)
                .context("Failed to connect to warehouse")?,
        )
    };

    let executor = match warehouse.as_deref() {
        Some(warehouse) => DeploymentExecutor::new(warehouse),
        None => DeploymentExecutor::dry_run(),
    }
    .with_strict(project.config.deployment.strict);

    if !json {
        let mode = if dry_run { " (dry run)" } else { "" };
        println!(
            "Deploying {} views to {}{}\n",
            plan.len(),
            project.config.warehouse.warehouse_type,
            mode
        );
    }

    executor.prepare_schemas(&plan).await;
    let report = executor
        .run(&plan, |event| {
            if !json {
                print_event(&event, verbose);
            }
        })
        .await;

    let results = collect_results(&plan, &report);

    if json {
        let failure_count = results
            .iter()
            .filter(|r| r.status != RunStatus::Success)
            .count();
        let output = RunOutput {
            dry_run,
            order: plan.order.iter().map(|n| n.to_string()).collect(),
            warnings: plan.warnings.clone(),
            outcome: report.summary.outcome(),
            results: CommandResults::new(
                start,
                report.summary.succeeded,
                failure_count,
                results,
            ),
        };
        print_json(&output)?;
    } else {
        print_results(&results);
        print_summary(&plan, &report);
    }

    if report.summary.is_failure() {
        return Err(ExitCode(1).into());
    }

    Ok(())
}

fn print_event(event: &ExecutionEvent<'_>, verbose: bool) {
    match event {
        ExecutionEvent::Started {
            index,
            total,
            view,
            dry_run,
        } => {
            let action = if *dry_run {
                "Dry-run checking"
            } else {
                "Deploying"
            };
            println!("[{}/{}] {} {}...", index, total, action, view.name);
            if *dry_run {
                print_dry_run_details(view, verbose);
            }
        }
        ExecutionEvent::Finished { outcome, .. } => match outcome.status {
            ViewStatus::Success => {}
            ViewStatus::Failed => println!(
                "  ✗ {}",
                outcome.error.as_deref().unwrap_or("unknown error")
            ),
            ViewStatus::Skipped => println!("  - {} skipped", outcome.name),
        },
    }
}

fn print_dry_run_details(view: &ViewDefinition, verbose: bool) {
    println!("  Catalog:   {}", view.catalog().as_deref().unwrap_or("default"));
    println!("  Schema:    {}", view.schema().as_deref().unwrap_or("default"));
    println!("  Full name: {}", view.full_name);
    if verbose {
        let sql = view.pretty_sql.as_deref().unwrap_or(&view.compiled_content);
        println!("  SQL:");
        for line in sql.lines() {
            println!("    {}", line);
        }
    }
}

/// Executed views in order, then views dropped with a parse error
fn collect_results(plan: &DeploymentPlan, report: &DeploymentReport) -> Vec<ViewRunResult> {
    let executed = report.results.iter().map(|outcome| ViewRunResult {
        name: outcome.name.to_string(),
        full_name: Some(outcome.full_name.clone()),
        status: match outcome.status {
            ViewStatus::Success => RunStatus::Success,
            ViewStatus::Failed => RunStatus::Error,
            ViewStatus::Skipped => RunStatus::Skipped,
        },
        error: outcome.error.clone(),
        duration_secs: outcome.duration.as_secs_f64(),
    });

    let unparsed = plan.failures.iter().map(|failure| ViewRunResult {
        name: failure.name.to_string(),
        full_name: None,
        status: RunStatus::Error,
        error: Some(format!("parse error: {}", failure.error)),
        duration_secs: 0.0,
    });

    executed.chain(unparsed).collect()
}

fn print_results(results: &[ViewRunResult]) {
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.full_name.clone().unwrap_or_else(|| "-".to_string()),
                r.status.to_string(),
                format!("{:.2}s", r.duration_secs),
            ]
        })
        .collect();

    println!();
    print_table(&["VIEW", "FULL NAME", "STATUS", "TIME"], &rows);
    println!();
}

fn print_summary(plan: &DeploymentPlan, report: &DeploymentReport) {
    let summary = &report.summary;
    let verb = if summary.dry_run { "validated" } else { "deployed" };

    match summary.outcome() {
        Outcome::AllSucceeded => {
            println!("Successfully {} all {} views", verb, summary.total);
        }
        Outcome::Partial => {
            println!(
                "Partially {}: {}/{} views succeeded",
                verb, summary.succeeded, summary.total
            );
            println!("{} views failed", summary.failed);
            if summary.skipped > 0 {
                println!("{} views skipped", summary.skipped);
            }
        }
        Outcome::AllFailed => {
            println!("All {} views failed", summary.total);
        }
    }

    if !plan.failures.is_empty() {
        println!("{} views excluded with parse errors", plan.failures.len());
    }
    println!("Finished in {:.2}s", summary.duration.as_secs_f64());
}
