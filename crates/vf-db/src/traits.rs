//! Warehouse trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Executes finished SQL against a data warehouse.
///
/// Each call completes (submit and wait) before returning, so a view created
/// by one call is visible to the next. Implementations must be Send + Sync
/// for async operation.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a single statement
    async fn execute(&self, sql: &str) -> DbResult<()>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, catalog: Option<&str>, schema: &str)
        -> DbResult<()>;

    /// Warehouse type identifier for logging
    fn warehouse_type(&self) -> &'static str;
}
