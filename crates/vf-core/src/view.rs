//! View source files and compiled view definitions

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::name_parts;
use crate::view_name::ViewName;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A discovered SQL source file and the view name derived from it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewFile {
    /// Logical view name (file stem)
    pub name: ViewName,

    /// Path to the SQL source
    pub path: PathBuf,
}

impl ViewFile {
    /// Create a view file from a path, deriving the name from its stem
    pub fn from_path(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let name = ViewName::from_path(&path).ok_or_else(|| CoreError::EmptyName {
            context: format!("view file name '{}'", path.display()),
        })?;
        Ok(Self { name, path })
    }
}

/// A fully compiled view, ready for execution.
///
/// Built during the second (compilation) pass and discarded after the run.
#[derive(Debug, Clone, Serialize)]
pub struct ViewDefinition {
    /// Logical view name (file stem)
    pub name: ViewName,

    /// Fully-qualified warehouse identifier as declared in the compiled SQL
    pub full_name: String,

    /// Source file
    pub path: PathBuf,

    /// Original template text
    pub raw_content: String,

    /// Rendered SQL, `ref()` calls resolved and optionally wrapped
    pub compiled_content: String,

    /// Pretty-printed form of `compiled_content`, when the dialect parser
    /// could render one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_sql: Option<String>,
}

impl ViewDefinition {
    /// Catalog component of the full name, if qualified
    pub fn catalog(&self) -> Option<String> {
        name_parts(&self.full_name).catalog
    }

    /// Schema component of the full name, if qualified
    pub fn schema(&self) -> Option<String> {
        name_parts(&self.full_name).schema
    }
}

/// Reads raw view text for the planner.
///
/// The filesystem implementation is [`FsSourceProvider`]; tests and embedders
/// can supply sources from memory with [`InMemorySources`].
pub trait SourceProvider {
    /// Read the raw SQL text of a view source
    fn read_source(&self, path: &Path) -> CoreResult<String>;
}

/// Reads view sources from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceProvider;

impl SourceProvider for FsSourceProvider {
    fn read_source(&self, path: &Path) -> CoreResult<String> {
        std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// View sources held in memory, keyed by path
#[derive(Debug, Clone, Default)]
pub struct InMemorySources {
    files: HashMap<PathBuf, String>,
}

impl InMemorySources {
    /// Create an empty source set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a source and return its view file
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> ViewFile {
        let path = path.into();
        self.files.insert(path.clone(), content.into());
        ViewFile {
            name: ViewName::from_path(&path).unwrap_or_else(|| ViewName::new("unnamed")),
            path,
        }
    }
}

impl SourceProvider for InMemorySources {
    fn read_source(&self, path: &Path) -> CoreResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such source"),
            })
    }
}
