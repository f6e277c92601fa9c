//! SQL identifier utilities
//!
//! Quoting for synthesized names, and splitting of declared (possibly quoted)
//! qualified names into their `catalog.schema.view` components.

/// Quote a SQL identifier with double quotes, doubling embedded quotes.
///
/// # Examples
/// ```
/// use vf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially qualified name (e.g. `schema.table`) part by part.
///
/// # Examples
/// ```
/// use vf_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("staging.orders"), r#""staging"."orders""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a qualified name into its unquoted parts.
///
/// Backtick, double-quote and single-quote wrappers are removed, and a single
/// quoted segment containing dots (BigQuery's `` `project.dataset.view` ``
/// form) is split on those dots.
///
/// # Examples
/// ```
/// use vf_core::sql_utils::split_name_parts;
/// assert_eq!(split_name_parts("`p.d.v`"), vec!["p", "d", "v"]);
/// assert_eq!(split_name_parts(r#""main"."orders""#), vec!["main", "orders"]);
/// ```
pub fn split_name_parts(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in name.trim().chars() {
        match (quote, c) {
            (None, '`' | '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (_, '.') => parts.push(std::mem::take(&mut current)),
            (_, c) => current.push(c),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Components of a qualified view name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameParts {
    /// Catalog (BigQuery project), when given
    pub catalog: Option<String>,
    /// Schema (BigQuery dataset), when given
    pub schema: Option<String>,
    /// Object name
    pub name: String,
}

/// Split a qualified name into catalog, schema and object name.
///
/// Names with more than three parts keep the leading parts joined in the
/// catalog.
pub fn name_parts(full_name: &str) -> NameParts {
    let mut parts = split_name_parts(full_name);
    let name = parts.pop().unwrap_or_default();
    let schema = parts.pop();
    let catalog = (!parts.is_empty()).then(|| parts.join("."));
    NameParts {
        catalog,
        schema,
        name,
    }
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
