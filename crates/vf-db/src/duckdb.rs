//! DuckDB warehouse backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Warehouse;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use vf_core::sql_utils::quote_ident;

/// DuckDB warehouse backend
pub struct DuckDbWarehouse {
    conn: Mutex<Connection>,
}

impl DuckDbWarehouse {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(sql, []).map_err(DbError::from)?;
        Ok(())
    }
}

#[async_trait]
impl Warehouse for DuckDbWarehouse {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        self.execute_sync(sql)
    }

    async fn create_schema_if_not_exists(
        &self,
        catalog: Option<&str>,
        schema: &str,
    ) -> DbResult<()> {
        let qualified = match catalog {
            Some(catalog) => format!("{}.{}", quote_ident(catalog), quote_ident(schema)),
            None => quote_ident(schema),
        };
        self.execute_sync(&format!("CREATE SCHEMA IF NOT EXISTS {}", qualified))
    }

    fn warehouse_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
