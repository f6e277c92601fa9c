//! Template compilation: ref() resolution, auto-wrapping and compiled output

use crate::environment::JinjaEnvironment;
use crate::error::JinjaResult;
use crate::resolver::RefResolver;
use std::path::{Path, PathBuf};
use vf_core::{contains_create_view, Config, ViewRegistry};

/// Result of compiling one view template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledView {
    /// Final SQL
    pub sql: String,

    /// Whether a `CREATE OR REPLACE VIEW` wrapper was added
    pub wrapped: bool,

    /// Warnings raised by unresolved `ref()` calls
    pub warnings: Vec<String>,
}

/// Compiles view templates against a registry snapshot
pub struct TemplateCompiler<'a> {
    env: JinjaEnvironment<'a>,
    config: Config,
    auto_wrap: bool,
}

impl TemplateCompiler<'_> {
    /// Create a compiler with the project's vars and deployment settings
    pub fn new(config: &Config) -> Self {
        Self {
            env: JinjaEnvironment::new(&config.vars),
            config: config.clone(),
            auto_wrap: config.deployment.auto_wrap,
        }
    }

    /// Override the configured auto-wrap setting
    pub fn with_auto_wrap(mut self, auto_wrap: bool) -> Self {
        self.auto_wrap = auto_wrap;
        self
    }

    /// Resolver over a snapshot of `registry`
    pub fn resolver(&self, registry: &ViewRegistry) -> RefResolver {
        RefResolver::new(&self.config, registry.clone())
    }

    /// Compile a view template.
    ///
    /// Every `ref()` is resolved through the registry. When the rendered
    /// text has no create-view statement and auto-wrap is on, it is wrapped
    /// as `CREATE OR REPLACE VIEW <default name> AS\n<text>`. Template errors
    /// fail the whole compilation.
    pub fn compile(
        &self,
        raw_sql: &str,
        view_name: &str,
        registry: &ViewRegistry,
    ) -> JinjaResult<CompiledView> {
        let resolver = self.resolver(registry);
        let rendered = self.env.render_with_refs(raw_sql, resolver.clone())?;

        let (sql, wrapped) = if self.auto_wrap && !contains_create_view(&rendered) {
            (
                format!(
                    "CREATE OR REPLACE VIEW {} AS\n{}",
                    self.config.default_full_name(view_name),
                    rendered
                ),
                true,
            )
        } else {
            (rendered, false)
        };

        Ok(CompiledView {
            sql,
            wrapped,
            warnings: resolver.warnings(),
        })
    }
}

/// Writes compiled SQL into a tree mirroring the views directory
#[derive(Debug, Clone)]
pub struct CompiledOutput {
    compiled_dir: PathBuf,
    views_dir: PathBuf,
}

impl CompiledOutput {
    /// Create an output writer
    pub fn new(compiled_dir: impl Into<PathBuf>, views_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiled_dir: compiled_dir.into(),
            views_dir: views_dir.into(),
        }
    }

    /// Writer for a project, or `None` when `deployment.save_compiled` is off
    pub fn from_config(config: &Config, root: &Path) -> Option<Self> {
        config.deployment.save_compiled.then(|| {
            Self::new(
                config.compiled_dir_absolute(root),
                config.views_dir_absolute(root),
            )
        })
    }

    /// Output path for a source: its path relative to the views directory,
    /// or just its file name when it lives elsewhere
    pub fn output_path(&self, source: &Path) -> PathBuf {
        match source.strip_prefix(&self.views_dir) {
            Ok(relative) => self.compiled_dir.join(relative),
            Err(_) => self
                .compiled_dir
                .join(source.file_name().unwrap_or(source.as_os_str())),
        }
    }

    /// Write compiled SQL with a generated-file header.
    ///
    /// Failures are logged and reported as `None`; they never fail the
    /// compilation.
    pub fn write(&self, source: &Path, sql: &str) -> Option<PathBuf> {
        let output_path = self.output_path(source);
        let contents = format!(
            "-- Compiled SQL from: {}\n-- Generated by Viewforge\n-- DO NOT EDIT: This file is auto-generated\n\n{}",
            source.display(),
            sql
        );

        let result = match output_path.parent() {
            Some(parent) => std::fs::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|()| std::fs::write(&output_path, contents));

        match result {
            Ok(()) => {
                log::debug!("Saved compiled SQL: {}", output_path.display());
                Some(output_path)
            }
            Err(e) => {
                log::warn!(
                    "Could not save compiled SQL for {}: {}",
                    source.display(),
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod tests;
