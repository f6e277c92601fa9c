//! vf-core - Core library for Viewforge
//!
//! This crate provides configuration parsing, view discovery, `ref()`
//! extraction, the run-scoped view registry, dependency graph ordering and
//! reference validation shared across all Viewforge components.

pub mod config;
pub mod dag;
pub mod discovery;
pub mod error;
mod newtype_string;
pub mod references;
pub mod registry;
pub mod sql_utils;
pub mod validator;
pub mod view;
pub mod view_name;

pub use config::{Config, DeploymentConfig, SqlConfig, WarehouseConfig, WarehouseType};
pub use dag::DependencyGraph;
pub use discovery::{available_views, discover, ensure_unique_names, Selection};
pub use error::{CoreError, CoreResult};
pub use references::extract_references;
pub use registry::{contains_create_view, declared_view_name, ViewRegistry};
pub use validator::{available_names, validate_references};
pub use view::{FsSourceProvider, InMemorySources, SourceProvider, ViewDefinition, ViewFile};
pub use view_name::ViewName;
