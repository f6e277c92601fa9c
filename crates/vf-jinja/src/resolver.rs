//! `ref()` resolution against the view registry

use std::sync::{Arc, Mutex};
use vf_core::{Config, ViewRegistry, WarehouseType};

/// Captured warnings from unresolved ref() calls
pub(crate) type WarningCapture = Arc<Mutex<Vec<String>>>;

/// Resolves view names to fully-qualified warehouse identifiers.
///
/// Holds a snapshot of the registry taken when the resolver is built, so
/// it can be moved into a template function.
#[derive(Debug, Clone)]
pub struct RefResolver {
    registry: Arc<ViewRegistry>,
    warehouse_type: WarehouseType,
    default_catalog: String,
    default_schema: String,
    warnings: WarningCapture,
}

impl RefResolver {
    /// Create a resolver over a registry snapshot
    pub fn new(config: &Config, registry: ViewRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            warehouse_type: config.warehouse.warehouse_type,
            default_catalog: config.warehouse.catalog.clone(),
            default_schema: config.warehouse.schema.clone(),
            warnings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolve a view name.
    ///
    /// 1. A catalog override yields `catalog.default_schema.view`, bypassing
    ///    the registry.
    /// 2. A registered view yields its registered name verbatim.
    /// 3. Anything else yields `default_catalog.default_schema.view` and
    ///    records a warning.
    pub fn resolve(&self, view: &str, catalog_override: Option<&str>) -> String {
        if let Some(catalog) = catalog_override {
            return self
                .warehouse_type
                .format_full_name(catalog, &self.default_schema, view);
        }

        if let Some(full_name) = self.registry.get(view) {
            return full_name.to_string();
        }

        let fallback =
            self.warehouse_type
                .format_full_name(&self.default_catalog, &self.default_schema, view);
        let message = format!(
            "Referenced view '{}' not found in registry, using default: {}",
            view, fallback
        );
        log::warn!("{}", message);
        match self.warnings.lock() {
            Ok(mut warnings) => warnings.push(message),
            Err(e) => log::warn!("ref() warning capture poisoned: {}", e),
        }
        fallback
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}
