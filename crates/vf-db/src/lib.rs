//! vf-db - Warehouse abstraction layer for Viewforge
//!
//! This crate provides the `Warehouse` trait, a DuckDB implementation and a
//! BigQuery placeholder.

pub mod bigquery;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use bigquery::BigQueryWarehouse;
pub use duckdb::DuckDbWarehouse;
pub use error::{DbError, DbResult};
pub use traits::Warehouse;

use std::path::Path;
use vf_core::{WarehouseConfig, WarehouseType};

/// Open the warehouse described by `config`.
///
/// Relative DuckDB paths are resolved against `root`.
pub fn create_warehouse(config: &WarehouseConfig, root: &Path) -> DbResult<Box<dyn Warehouse>> {
    match config.warehouse_type {
        WarehouseType::DuckDb => {
            let warehouse = if config.path == ":memory:" {
                DuckDbWarehouse::in_memory()?
            } else {
                DuckDbWarehouse::from_path(&root.join(&config.path))?
            };
            Ok(Box::new(warehouse))
        }
        WarehouseType::BigQuery => Ok(Box::new(BigQueryWarehouse::new(
            config.catalog.clone(),
            config.location.clone(),
        ))),
    }
}
