//! SQL parser wrapper

use crate::dialect::{BigQueryDialect, DuckDbDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: Box::new(DuckDbDialect::new()),
        }
    }

    /// Create a new parser with BigQuery dialect
    pub fn bigquery() -> Self {
        Self {
            dialect: Box::new(BigQueryDialect::new()),
        }
    }

    /// Create a parser from dialect name
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        match name.to_lowercase().as_str() {
            "duckdb" => Ok(Self::duckdb()),
            "bigquery" => Ok(Self::bigquery()),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL that must hold exactly one statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let mut stmts = self.parse(sql)?;
        match stmts.len() {
            0 => Err(SqlError::EmptySql),
            1 => Ok(stmts.remove(0)),
            n => Err(SqlError::MultipleStatements(n)),
        }
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Get the dialect
    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::duckdb()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
