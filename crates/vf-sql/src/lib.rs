//! vf-sql - SQL parsing layer for Viewforge
//!
//! This crate wraps sqlparser-rs with DuckDB and BigQuery dialects and
//! classifies compiled SQL as a single create-view statement.

pub mod dialect;
pub mod error;
pub mod parser;
pub mod view;

pub use dialect::{BigQueryDialect, DuckDbDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
pub use view::CreateViewStatement;
