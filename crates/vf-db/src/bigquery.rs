//! BigQuery warehouse placeholder
//!
//! Projects targeting BigQuery can be compiled, validated and dry-run
//! locally. Executing against BigQuery is not implemented.

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use async_trait::async_trait;

/// BigQuery warehouse backend (placeholder)
#[derive(Debug, Clone)]
pub struct BigQueryWarehouse {
    project: String,
    location: Option<String>,
}

impl BigQueryWarehouse {
    /// Create a placeholder for a BigQuery project
    pub fn new(project: impl Into<String>, location: Option<String>) -> Self {
        Self {
            project: project.into(),
            location,
        }
    }

    fn not_implemented<T>(&self, feature: &str) -> DbResult<T> {
        Err(DbError::NotImplemented {
            backend: format!(
                "bigquery (project {}{})",
                self.project,
                self.location
                    .as_deref()
                    .map(|l| format!(", location {}", l))
                    .unwrap_or_default()
            ),
            feature: feature.to_string(),
        })
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    async fn execute(&self, _sql: &str) -> DbResult<()> {
        self.not_implemented("execute")
    }

    async fn create_schema_if_not_exists(
        &self,
        _catalog: Option<&str>,
        _schema: &str,
    ) -> DbResult<()> {
        self.not_implemented("create_schema_if_not_exists")
    }

    fn warehouse_type(&self) -> &'static str {
        "bigquery"
    }
}
