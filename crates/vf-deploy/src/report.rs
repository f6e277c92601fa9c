//! Per-view outcomes and the deployment summary

use serde::Serialize;
use std::time::Duration;
use vf_core::{ViewDefinition, ViewName};

/// Execution status of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    /// Executed (or dry-run checked) successfully
    Success,
    /// The warehouse rejected the statement
    Failed,
    /// Not attempted because an earlier view failed in strict mode
    Skipped,
}

impl std::fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewStatus::Success => write!(f, "success"),
            ViewStatus::Failed => write!(f, "failed"),
            ViewStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of executing one view
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutcome {
    /// View name
    pub name: ViewName,

    /// Fully-qualified name the statement creates
    pub full_name: String,

    /// Execution status
    pub status: ViewStatus,

    /// Error message if execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Execution time
    #[serde(skip)]
    pub duration: Duration,
}

impl ViewOutcome {
    /// Create a successful outcome
    pub fn success(view: &ViewDefinition, duration: Duration) -> Self {
        Self {
            name: view.name.clone(),
            full_name: view.full_name.clone(),
            status: ViewStatus::Success,
            error: None,
            duration,
        }
    }

    /// Create a failed outcome
    pub fn failed(view: &ViewDefinition, error: String, duration: Duration) -> Self {
        Self {
            name: view.name.clone(),
            full_name: view.full_name.clone(),
            status: ViewStatus::Failed,
            error: Some(error),
            duration,
        }
    }

    /// Create a skipped outcome
    pub fn skipped(view: &ViewDefinition) -> Self {
        Self {
            name: view.name.clone(),
            full_name: view.full_name.clone(),
            status: ViewStatus::Skipped,
            error: None,
            duration: Duration::ZERO,
        }
    }
}

/// Overall result of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every view succeeded
    AllSucceeded,
    /// Some views succeeded, some did not
    Partial,
    /// No view succeeded
    AllFailed,
}

/// Summary of a deployment run
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentSummary {
    /// Views in the execution list
    pub total: usize,

    /// Views that succeeded
    pub succeeded: usize,

    /// Views that failed
    pub failed: usize,

    /// Views skipped after a strict-mode failure
    pub skipped: usize,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Total execution time
    #[serde(skip)]
    pub duration: Duration,
}

impl DeploymentSummary {
    /// Create a summary from view outcomes
    pub fn from_results(results: &[ViewOutcome], dry_run: bool, duration: Duration) -> Self {
        let count = |status: ViewStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            total: results.len(),
            succeeded: count(ViewStatus::Success),
            failed: count(ViewStatus::Failed),
            skipped: count(ViewStatus::Skipped),
            dry_run,
            duration,
        }
    }

    /// Classify the run
    pub fn outcome(&self) -> Outcome {
        if self.succeeded == self.total {
            Outcome::AllSucceeded
        } else if self.succeeded > 0 {
            Outcome::Partial
        } else {
            Outcome::AllFailed
        }
    }

    /// Whether the run counts as failed: nothing succeeded outside a dry run
    pub fn is_failure(&self) -> bool {
        self.total > 0 && self.succeeded == 0 && !self.dry_run
    }
}
