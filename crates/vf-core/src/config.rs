//! Configuration types and parsing for viewforge.yml

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::{quote_ident, quote_qualified};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["viewforge.yml", "viewforge.yaml"];

/// Main project configuration from viewforge.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target warehouse and default naming
    #[serde(alias = "bigquery")]
    pub warehouse: WarehouseConfig,

    /// Where view sources live and which files are picked up
    #[serde(default)]
    pub sql: SqlConfig,

    /// Deployment behaviour
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Variables available in templates through `var()`
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,
}

/// Warehouse type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseType {
    /// DuckDB (default, local warehouse)
    #[default]
    DuckDb,
    /// Google BigQuery
    BigQuery,
}

impl std::fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseType::DuckDb => write!(f, "duckdb"),
            WarehouseType::BigQuery => write!(f, "bigquery"),
        }
    }
}

impl WarehouseType {
    /// SQL dialect name used to classify compiled SQL for this warehouse
    pub fn dialect_name(&self) -> &'static str {
        match self {
            WarehouseType::DuckDb => "duckdb",
            WarehouseType::BigQuery => "bigquery",
        }
    }

    /// Render a fully-qualified `catalog.schema.view` identifier in this
    /// warehouse's quoting style.
    pub fn format_full_name(&self, catalog: &str, schema: &str, view: &str) -> String {
        match self {
            WarehouseType::BigQuery => format!("`{}.{}.{}`", catalog, schema, view),
            WarehouseType::DuckDb => format!(
                "{}.{}",
                quote_qualified(&format!("{}.{}", catalog, schema)),
                quote_ident(view)
            ),
        }
    }
}

/// Warehouse connection and naming defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Warehouse type (duckdb or bigquery)
    #[serde(rename = "type", default)]
    pub warehouse_type: WarehouseType,

    /// Default catalog (BigQuery project, DuckDB database)
    #[serde(alias = "project_id")]
    pub catalog: String,

    /// Default schema (BigQuery dataset)
    #[serde(alias = "dataset_id")]
    pub schema: String,

    /// Warehouse location, informational only
    #[serde(default)]
    pub location: Option<String>,

    /// Database path for DuckDB (file path or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// SQL source layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlConfig {
    /// Directory containing view SQL files
    #[serde(default = "default_views_directory")]
    pub views_directory: String,

    /// Directory that mirrors `views_directory` with compiled output
    #[serde(default = "default_compiled_directory")]
    pub compiled_directory: String,

    /// Glob patterns (matched recursively) selecting view files
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Glob patterns removing files from the selection
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            views_directory: default_views_directory(),
            compiled_directory: default_compiled_directory(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Deployment behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Report what would be executed without contacting the warehouse
    #[serde(default)]
    pub dry_run: bool,

    /// Print compiled SQL and extra detail
    #[serde(default)]
    pub verbose: bool,

    /// Persist compiled SQL under `sql.compiled_directory`
    #[serde(default = "default_true")]
    pub save_compiled: bool,

    /// Wrap bare queries in `CREATE OR REPLACE VIEW`
    #[serde(default = "default_true")]
    pub auto_wrap: bool,

    /// Abort the remaining executions after the first failure
    #[serde(default)]
    pub strict: bool,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            save_compiled: true,
            auto_wrap: true,
            strict: false,
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_true() -> bool {
    true
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_views_directory() -> String {
    "sql/views".to_string()
}

fn default_compiled_directory() -> String {
    "compiled/views".to_string()
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.sql".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["*.backup.sql".to_string()]
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        if content.trim().is_empty() {
            return Err(CoreError::ConfigParseError {
                message: "configuration file is empty".to_string(),
            });
        }
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for viewforge.yml or viewforge.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let required = [
            ("warehouse.catalog", &self.warehouse.catalog),
            ("warehouse.schema", &self.warehouse.schema),
            ("sql.views_directory", &self.sql.views_directory),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} cannot be empty", field),
                });
            }
        }

        if self.sql.include_patterns.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one sql.include_patterns entry must be specified".to_string(),
            });
        }

        Ok(())
    }

    /// Get a variable value by name
    pub fn get_var(&self, name: &str) -> Option<&serde_yaml::Value> {
        self.vars.get(name)
    }

    /// Get the absolute views directory relative to a project root
    pub fn views_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.sql.views_directory)
    }

    /// Get the absolute compiled-output directory relative to a project root
    pub fn compiled_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.sql.compiled_directory)
    }

    /// Default fully-qualified name for a view: `catalog.schema.view`
    pub fn default_full_name(&self, view: &str) -> String {
        self.warehouse.warehouse_type.format_full_name(
            &self.warehouse.catalog,
            &self.warehouse.schema,
            view,
        )
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
