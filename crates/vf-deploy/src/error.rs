//! Error types for vf-deploy

use thiserror::Error;
use vf_core::CoreError;
use vf_sql::SqlError;

/// Errors that stop a deployment before any SQL is executed
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration, discovery or dependency-cycle failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No SQL parser for the configured warehouse
    #[error(transparent)]
    Sql(#[from] SqlError),

    /// No view files selected (P001)
    #[error("[P001] No SQL view files found to deploy")]
    NoViews,

    /// Dependency cycle among the views being deployed (P003)
    #[error("[P003] Circular dependencies detected involving: {}. Refusing to deploy", nodes.join(", "))]
    Cycle { nodes: Vec<String> },

    /// Dangling references (P002)
    #[error("[P002] Template validation failed with {} error(s):\n  {}", errors.len(), errors.join("\n  "))]
    Validation { errors: Vec<String> },
}

impl DeployError {
    /// Lift a core error, promoting cycles to [`DeployError::Cycle`]
    pub fn from_ordering(err: CoreError) -> Self {
        match err {
            CoreError::CircularDependency { nodes } => DeployError::Cycle { nodes },
            other => DeployError::Core(other),
        }
    }
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;
