//! Create-view statement classification

use crate::dialect::parse_error;
use crate::error::{SqlError, SqlResult};
use crate::parser::SqlParser;
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;

/// A compiled SQL text that is a single, well-formed create-view statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateViewStatement {
    /// Declared qualified name, rendered as written (quoting preserved)
    pub name: String,

    /// Whether the statement is `CREATE OR REPLACE`
    pub or_replace: bool,

    /// Whether the statement carries `IF NOT EXISTS`
    pub if_not_exists: bool,

    /// Pretty-printed statement
    pub pretty: String,
}

/// Human-readable name for a statement variant
fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Query(_) => "SELECT",
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::Drop { .. } => "DROP",
        _ => "another statement type",
    }
}

impl SqlParser {
    /// Check that `sql` is exactly one create-view statement and return its
    /// declared name.
    pub fn classify_view(&self, sql: &str) -> SqlResult<CreateViewStatement> {
        let stmt = self.parse_single(sql)?;
        if !matches!(stmt, Statement::CreateView { .. }) {
            return Err(SqlError::NotAView(statement_kind(&stmt).to_string()));
        }

        let mut view = self.declared_view_name(sql)?;
        view.pretty = format!("{:#}", stmt);
        Ok(view)
    }

    /// Read the name following `CREATE [OR REPLACE] [modifiers] VIEW
    /// [IF NOT EXISTS]` straight from the token stream. `pretty` is left empty.
    fn declared_view_name(&self, sql: &str) -> SqlResult<CreateViewStatement> {
        let mut parser = Parser::new(self.dialect().parser_dialect())
            .try_with_sql(sql.trim())
            .map_err(parse_error)?;

        if !parser.parse_keyword(Keyword::CREATE) {
            return Err(SqlError::NotAView("a statement not starting with CREATE".into()));
        }
        let or_replace = parser.parse_keywords(&[Keyword::OR, Keyword::REPLACE]);
        while parser
            .parse_one_of_keywords(&[
                Keyword::TEMP,
                Keyword::TEMPORARY,
                Keyword::MATERIALIZED,
            ])
            .is_some()
        {}
        if !parser.parse_keyword(Keyword::VIEW) {
            return Err(SqlError::NotAView("CREATE without VIEW".into()));
        }
        let if_not_exists = parser.parse_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);

        // BigQuery allows unquoted hyphens in view names (my-project.dataset.view)
        let allow_unquoted_hyphen = self.dialect_name() == "bigquery";
        let name = parser
            .parse_object_name(allow_unquoted_hyphen)
            .map_err(parse_error)?;
        Ok(CreateViewStatement {
            name: name.to_string(),
            or_replace,
            if_not_exists,
            pretty: String::new(),
        })
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
