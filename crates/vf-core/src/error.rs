//! Error types for vf-core

use thiserror::Error;

/// Core error type for Viewforge
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Views directory does not exist (full-scan discovery)
    #[error("[E004] Views directory {path} does not exist")]
    ViewsDirNotFound { path: String },

    /// E005: View file not found
    #[error("[E005] View not found: {name}")]
    ViewNotFound { name: String },

    /// E006: Invalid include/exclude glob pattern
    #[error("[E006] Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// E007: Circular dependency detected
    #[error("[E007] Circular dependencies detected involving: {}", nodes.join(", "))]
    CircularDependency { nodes: Vec<String> },

    /// E008: Empty name where a view name is required
    #[error("[E008] Empty name in {context}")]
    EmptyName { context: String },

    /// E009: Two view files resolve to the same view name
    #[error("[E009] Duplicate view name '{name}' in {path1} and {path2}")]
    DuplicateViewName {
        name: String,
        path1: String,
        path2: String,
    },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
