//! Deployment planning: discover, pre-register, order, validate, compile

use crate::error::{DeployError, DeployResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use vf_core::discovery::scan_views;
use vf_core::{
    available_names, available_views, discover, ensure_unique_names, validate_references, Config,
    CoreError, DependencyGraph, Selection, SourceProvider, ViewDefinition, ViewFile, ViewName,
    ViewRegistry,
};
use vf_jinja::{CompiledOutput, TemplateCompiler};
use vf_sql::SqlParser;

/// A view that was selected but could not be compiled into a create-view
/// statement. It is left out of the execution list.
#[derive(Debug, Clone, Serialize)]
pub struct PlanFailure {
    /// View name
    pub name: ViewName,

    /// Source file
    pub path: PathBuf,

    /// Template or classification error
    pub error: String,
}

/// Ordered, validated and compiled views ready for execution
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentPlan {
    /// Compiled views in dependency order
    pub views: Vec<ViewDefinition>,

    /// Views dropped from the plan with a parse error
    pub failures: Vec<PlanFailure>,

    /// Dependency order of every selected view, including failed ones
    pub order: Vec<ViewName>,

    /// Unresolved-reference warnings raised during compilation
    pub warnings: Vec<String>,
}

impl DeploymentPlan {
    /// Number of views that will be executed
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no view survived compilation
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Builds a [`DeploymentPlan`] for a project.
///
/// The registry is populated from every available view before any single
/// view is compiled, so references outside the selected subset still
/// resolve to their declared names.
pub struct DeploymentPlanner<'a> {
    root: PathBuf,
    config: &'a Config,
    sources: &'a dyn SourceProvider,
    parser: SqlParser,
    compiler: TemplateCompiler<'a>,
    output: Option<CompiledOutput>,
}

impl<'a> DeploymentPlanner<'a> {
    /// Create a planner for the project rooted at `root`
    pub fn new(
        root: impl Into<PathBuf>,
        config: &'a Config,
        sources: &'a dyn SourceProvider,
    ) -> DeployResult<Self> {
        let root = root.into();
        let parser = SqlParser::from_dialect_name(config.warehouse.warehouse_type.dialect_name())?;
        let output = CompiledOutput::from_config(config, &root);
        Ok(Self {
            root,
            config,
            sources,
            parser,
            compiler: TemplateCompiler::new(config),
            output,
        })
    }

    /// Disable (or replace) compiled-output persistence
    pub fn with_output(mut self, output: Option<CompiledOutput>) -> Self {
        self.output = output;
        self
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the selection to target files and the full set of views
    /// references may point at.
    ///
    /// A full scan is fatal when the views directory is missing. For an
    /// explicit selection the targets alone are used in that case. Two
    /// available files with the same view name abort discovery.
    pub fn discover(&self, selection: &Selection) -> DeployResult<(Vec<ViewFile>, Vec<ViewFile>)> {
        let targets = discover(&self.root, self.config, selection)?;
        if targets.is_empty() {
            return Err(DeployError::NoViews);
        }

        let available = match selection {
            Selection::All => targets.clone(),
            Selection::Explicit(_) => match scan_views(&self.root, self.config) {
                Ok(all) => available_views(&all, &targets),
                Err(e @ CoreError::DuplicateViewName { .. }) => return Err(e.into()),
                Err(e) => {
                    log::warn!("Validating against the selected views only: {}", e);
                    targets.clone()
                }
            },
        };
        ensure_unique_names(&available)?;

        Ok((targets, available))
    }

    /// First pass: register every available view under its declared or
    /// default name
    pub fn pre_register(&self, available: &[ViewFile]) -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        registry.pre_register(available, self.sources, self.config);
        log::debug!("Pre-registered {} views", registry.len());
        registry
    }

    /// Dependency graph over the available views
    pub fn graph(&self, available: &[ViewFile]) -> DependencyGraph {
        DependencyGraph::from_sources(available, self.sources)
    }

    /// Topological order of the targets. A cycle anywhere in the graph
    /// aborts the deployment.
    pub fn order(&self, graph: &DependencyGraph, targets: &[ViewFile]) -> DeployResult<Vec<ViewName>> {
        let names: Vec<ViewName> = targets.iter().map(|f| f.name.clone()).collect();
        graph.order_for(&names).map_err(DeployError::from_ordering)
    }

    /// All-or-nothing reference check of the targets against the available
    /// views
    pub fn validate(&self, targets: &[ViewFile], available: &[ViewFile]) -> DeployResult<()> {
        let errors = validate_references(targets, &available_names(available), self.sources);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DeployError::Validation { errors })
        }
    }

    /// Second pass for one view: render, persist, classify, re-register.
    ///
    /// Returns the definition and any unresolved-reference warnings, or the
    /// message recorded as its parse error.
    pub fn compile_view(
        &self,
        file: &ViewFile,
        registry: &mut ViewRegistry,
    ) -> Result<(ViewDefinition, Vec<String>), String> {
        let raw = self
            .sources
            .read_source(&file.path)
            .map_err(|e| e.to_string())?;

        let compiled = self
            .compiler
            .compile(&raw, &file.name, registry)
            .map_err(|e| e.to_string())?;

        if let Some(output) = &self.output {
            output.write(&file.path, &compiled.sql);
        }

        let statement = self
            .parser
            .classify_view(&compiled.sql)
            .map_err(|e| e.to_string())?;

        registry.register(file.name.clone(), statement.name.clone());

        Ok((
            ViewDefinition {
                name: file.name.clone(),
                full_name: statement.name,
                path: file.path.clone(),
                raw_content: raw,
                compiled_content: compiled.sql,
                pretty_sql: Some(statement.pretty),
            },
            compiled.warnings,
        ))
    }

    /// Run every planning stage.
    ///
    /// Cycles and dangling references abort with an error before anything is
    /// compiled. Per-view compilation failures are collected in
    /// [`DeploymentPlan::failures`] and do not stop the others.
    pub fn plan(&self, selection: &Selection) -> DeployResult<DeploymentPlan> {
        let (targets, available) = self.discover(selection)?;
        log::debug!(
            "Discovered {} target views ({} available)",
            targets.len(),
            available.len()
        );

        let mut registry = self.pre_register(&available);
        let graph = self.graph(&available);
        let order = self.order(&graph, &targets)?;
        self.validate(&targets, &available)?;

        let mut plan = DeploymentPlan {
            views: Vec::with_capacity(order.len()),
            failures: Vec::new(),
            order,
            warnings: Vec::new(),
        };

        for name in &plan.order {
            let Some(file) = targets.iter().find(|f| &f.name == name) else {
                continue;
            };

            match self.compile_view(file, &mut registry) {
                Ok((view, warnings)) => {
                    plan.warnings.extend(warnings);
                    plan.views.push(view);
                }
                Err(error) => {
                    log::debug!("Parse error in {}: {}", file.path.display(), error);
                    plan.failures.push(PlanFailure {
                        name: file.name.clone(),
                        path: file.path.clone(),
                        error,
                    });
                }
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
