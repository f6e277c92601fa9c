//! vf-deploy - Deployment planning and execution for Viewforge
//!
//! A deployment is planned in one synchronous pass (discover, pre-register,
//! order, validate, compile) and then executed view by view in dependency
//! order. Cycles and dangling references stop the run before any SQL is
//! sent; compilation and execution failures are collected per view.

pub mod error;
pub mod executor;
pub mod planner;
pub mod report;

pub use error::{DeployError, DeployResult};
pub use executor::{DeploymentExecutor, DeploymentReport, ExecutionEvent};
pub use planner::{DeploymentPlan, DeploymentPlanner, PlanFailure};
pub use report::{DeploymentSummary, Outcome, ViewOutcome, ViewStatus};
