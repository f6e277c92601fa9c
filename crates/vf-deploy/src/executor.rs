//! Sequential execution of a deployment plan

use crate::planner::DeploymentPlan;
use crate::report::{DeploymentSummary, ViewOutcome, ViewStatus};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use vf_core::ViewDefinition;
use vf_db::Warehouse;

/// Progress notifications emitted while a plan runs
#[derive(Debug)]
pub enum ExecutionEvent<'a> {
    /// A view is about to be sent to the warehouse (or dry-run checked)
    Started {
        index: usize,
        total: usize,
        view: &'a ViewDefinition,
        dry_run: bool,
    },
    /// A view finished, failed or was skipped
    Finished {
        index: usize,
        total: usize,
        outcome: &'a ViewOutcome,
    },
}

/// Per-view outcomes and their summary
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    /// Outcomes in execution order
    pub results: Vec<ViewOutcome>,

    /// Aggregated counts
    pub summary: DeploymentSummary,
}

/// Runs compiled views one at a time, in plan order.
///
/// Each statement completes before the next is sent, since a view may select
/// from one created earlier in the same run.
pub struct DeploymentExecutor<'a> {
    warehouse: Option<&'a dyn Warehouse>,
    dry_run: bool,
    strict: bool,
}

impl<'a> DeploymentExecutor<'a> {
    /// Execute against a warehouse
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self {
            warehouse: Some(warehouse),
            dry_run: false,
            strict: false,
        }
    }

    /// Report the plan without a warehouse connection
    pub fn dry_run() -> Self {
        Self {
            warehouse: None,
            dry_run: true,
            strict: false,
        }
    }

    /// Toggle dry-run mode. A dry run never contacts the warehouse.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip the remaining views after the first failure
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether this executor only reports
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Create every schema the plan's views are declared in.
    ///
    /// Failures are logged; the view executions that need the schema will
    /// report the real error.
    pub async fn prepare_schemas(&self, plan: &DeploymentPlan) {
        if self.dry_run {
            return;
        }
        let Some(warehouse) = self.warehouse else {
            return;
        };

        let schemas: BTreeSet<(Option<String>, String)> = plan
            .views
            .iter()
            .filter_map(|view| view.schema().map(|schema| (view.catalog(), schema)))
            .collect();

        for (catalog, schema) in &schemas {
            if let Err(e) = warehouse
                .create_schema_if_not_exists(catalog.as_deref(), schema)
                .await
            {
                log::warn!("Could not create schema {}: {}", schema, e);
            }
        }
    }

    /// Execute every view in the plan, reporting progress to `observer`
    pub async fn run<F>(&self, plan: &DeploymentPlan, mut observer: F) -> DeploymentReport
    where
        F: FnMut(ExecutionEvent<'_>),
    {
        let start = Instant::now();
        let total = plan.views.len();
        let mut results: Vec<ViewOutcome> = Vec::with_capacity(total);
        let mut halted = false;

        for (i, view) in plan.views.iter().enumerate() {
            let index = i + 1;

            let outcome = if halted {
                ViewOutcome::skipped(view)
            } else {
                observer(ExecutionEvent::Started {
                    index,
                    total,
                    view,
                    dry_run: self.dry_run,
                });
                self.execute_view(view).await
            };

            if outcome.status == ViewStatus::Failed && self.strict {
                log::warn!(
                    "Stopping after failure of {} (strict mode)",
                    outcome.name
                );
                halted = true;
            }

            observer(ExecutionEvent::Finished {
                index,
                total,
                outcome: &outcome,
            });
            results.push(outcome);
        }

        let summary = DeploymentSummary::from_results(&results, self.dry_run, start.elapsed());
        DeploymentReport { results, summary }
    }

    async fn execute_view(&self, view: &ViewDefinition) -> ViewOutcome {
        let start = Instant::now();

        if self.dry_run {
            return ViewOutcome::success(view, start.elapsed());
        }

        let Some(warehouse) = self.warehouse else {
            return ViewOutcome::failed(
                view,
                "No warehouse connection".to_string(),
                start.elapsed(),
            );
        };

        match warehouse.execute(&view.compiled_content).await {
            Ok(()) => ViewOutcome::success(view, start.elapsed()),
            Err(e) => {
                log::debug!("Execution of {} failed: {}", view.name, e);
                ViewOutcome::failed(view, e.to_string(), start.elapsed())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
