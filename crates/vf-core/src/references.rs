//! `ref()` marker extraction from raw SQL templates
//!
//! This is a purely textual pass: it never invokes the template engine, so it
//! can run over every file before any single file is compiled.

use std::sync::OnceLock;

/// Matches `{{ ref('name') }}` / `{{ ref("name") }}` with optional whitespace
/// and `{{-` / `-}}` trim markers. The quotes must match.
fn ref_pattern() -> &'static regex::Regex {
    static REF_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    REF_PATTERN.get_or_init(|| {
        regex::Regex::new(
            r#"\{\{-?\s*ref\s*\(\s*(?:'([^'"\n]+)'|"([^'"\n]+)")\s*\)\s*-?\}\}"#,
        )
        .expect("valid regex literal")
    })
}

/// Extract referenced view names from SQL template text.
///
/// Returns names in order of appearance, duplicates included. Malformed
/// markers (unterminated braces, missing quotes, `ref()` without an argument)
/// are skipped.
pub fn extract_references(sql: &str) -> Vec<String> {
    ref_pattern()
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
#[path = "references_test.rs"]
mod tests;
