//! Run-scoped registry mapping view names to fully-qualified identifiers
//!
//! The registry is populated by a fast textual first pass over every
//! available view before any template is compiled, so `ref()` calls can
//! resolve forward references and views outside the deployed subset.

use crate::config::Config;
use crate::view::{SourceProvider, ViewFile};
use crate::view_name::ViewName;
use std::collections::HashMap;
use std::sync::OnceLock;

const CREATE_VIEW_HEAD: &str = r"(?i)\bCREATE\s+(?:OR\s+REPLACE\s+)?(?:TEMP(?:ORARY)?\s+)?(?:MATERIALIZED\s+)?VIEW\s+(?:IF\s+NOT\s+EXISTS\s+)?";
const NAME_PART: &str = r#"(?:`[^`]+`|"[^"]+"|[A-Za-z0-9_\-$]+)"#;

fn create_view_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(CREATE_VIEW_HEAD).expect("valid regex literal"))
}

fn declared_name_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r"{head}({part}(?:\s*\.\s*{part})*)",
            head = CREATE_VIEW_HEAD,
            part = NAME_PART
        );
        regex::Regex::new(&pattern).expect("valid regex literal")
    })
}

/// Whether SQL text contains a create-view statement
pub fn contains_create_view(sql: &str) -> bool {
    create_view_pattern().is_match(sql)
}

/// Extract the qualified name declared by the first create-view statement,
/// exactly as written (quotes kept, whitespace around dots removed).
pub fn declared_view_name(sql: &str) -> Option<String> {
    declared_name_pattern().captures(sql).and_then(|caps| {
        caps.get(1).map(|m| {
            m.as_str()
                .split('.')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(".")
        })
    })
}

/// Mapping from view name to fully-qualified warehouse identifier.
///
/// Later registrations for the same name overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    entries: HashMap<ViewName, String>,
}

impl ViewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view, returning the previously registered name if any
    pub fn register(&mut self, name: ViewName, full_name: impl Into<String>) -> Option<String> {
        self.entries.insert(name, full_name.into())
    }

    /// Look up the registered full name for a view
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check whether a view is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered views
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(view name, full name)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&ViewName, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// First-pass registration of one view from its raw text.
    ///
    /// Uses the name declared by a create-view statement when present,
    /// otherwise the configured default `catalog.schema.view`.
    pub fn register_source(&mut self, name: &ViewName, raw_sql: &str, config: &Config) -> String {
        let full_name = if contains_create_view(raw_sql) {
            declared_view_name(raw_sql).unwrap_or_else(|| {
                let fallback = config.default_full_name(name);
                log::warn!(
                    "Could not read the declared name of view '{}', registering default {}",
                    name,
                    fallback
                );
                fallback
            })
        } else {
            config.default_full_name(name)
        };
        self.register(name.clone(), full_name.clone());
        full_name
    }

    /// Run the first pass over a set of view files.
    ///
    /// Unreadable files are logged and skipped.
    pub fn pre_register(
        &mut self,
        files: &[ViewFile],
        sources: &dyn SourceProvider,
        config: &Config,
    ) {
        for file in files {
            match sources.read_source(&file.path) {
                Ok(raw) => {
                    let full_name = self.register_source(&file.name, &raw, config);
                    log::debug!("Registered view {} as {}", file.name, full_name);
                }
                Err(e) => {
                    log::warn!(
                        "Could not register view from {}: {}",
                        file.path.display(),
                        e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
