//! SQL dialect abstraction

use sqlparser::ast::Statement;
use sqlparser::dialect::{
    BigQueryDialect as SqlParserBigQuery, Dialect, DuckDbDialect as SqlParserDuckDb,
};
use sqlparser::parser::{Parser, ParserError};

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(parse_error)
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Convert a sqlparser error, keeping the reported location
pub(crate) fn parse_error(err: ParserError) -> SqlError {
    let message = err.to_string();
    let (line, column) = parse_location_from_error(&message);
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// Parse line and column from sqlparser error message.
///
/// `ParserError` is a string wrapper with no structured location data, so
/// "Line: N, Column: M" is extracted from the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

/// DuckDB SQL dialect
pub struct DuckDbDialect {
    dialect: SqlParserDuckDb,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserDuckDb {},
        }
    }
}

impl Default for DuckDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}

/// BigQuery SQL dialect
pub struct BigQueryDialect {
    dialect: SqlParserBigQuery,
}

impl BigQueryDialect {
    /// Create a new BigQuery dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserBigQuery {},
        }
    }
}

impl Default for BigQueryDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for BigQueryDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "bigquery"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
