//! Error types for vf-sql

use thiserror::Error;

/// SQL parsing and classification errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Statement is not a create-view statement (S003)
    #[error("[S003] Expected a CREATE VIEW statement, found {0}")]
    NotAView(String),

    /// More than one statement where one was expected (S004)
    #[error("[S004] Expected a single statement, found {0}")]
    MultipleStatements(usize),

    /// Unknown dialect name (S005)
    #[error("[S005] Unknown SQL dialect '{0}'. Supported: duckdb, bigquery")]
    UnknownDialect(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
