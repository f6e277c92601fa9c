//! Dependency graph building and topological sorting

use crate::error::{CoreError, CoreResult};
use crate::references::extract_references;
use crate::view::{SourceProvider, ViewFile};
use crate::view_name::ViewName;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Mapping from view name to the view names it references.
///
/// Keys keep their insertion order, which decides the order among views
/// that become ready in the same sorting round. Referenced names need not
/// be keys: dangling references are a validation concern, and the sorter
/// treats them as already satisfied.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<(ViewName, Vec<String>)>,
    index: HashMap<ViewName, usize>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a view with its references.
    ///
    /// Re-inserting a view replaces its references but keeps its position.
    pub fn insert(&mut self, name: ViewName, dependencies: Vec<String>) {
        match self.index.get(&name) {
            Some(&pos) => self.nodes[pos].1 = dependencies,
            None => {
                self.index.insert(name.clone(), self.nodes.len());
                self.nodes.push((name, dependencies));
            }
        }
    }

    /// Build a graph from view files, extracting `ref()` markers from each.
    ///
    /// Files that cannot be read are logged and left out of the graph.
    pub fn from_sources(files: &[ViewFile], sources: &dyn SourceProvider) -> Self {
        let mut graph = Self::new();
        for file in files {
            match sources.read_source(&file.path) {
                Ok(raw) => graph.insert(file.name.clone(), extract_references(&raw)),
                Err(e) => log::warn!(
                    "Skipping {} in dependency graph: {}",
                    file.path.display(),
                    e
                ),
            }
        }
        graph
    }

    /// Number of views in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no views
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a view is a key of the graph
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// References of a view, as extracted (duplicates kept)
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&pos| self.nodes[pos].1.as_slice())
    }

    /// Views that reference `name`, in insertion order
    pub fn dependents(&self, name: &str) -> Vec<ViewName> {
        self.nodes
            .iter()
            .filter(|(_, deps)| deps.iter().any(|d| d == name))
            .map(|(view, _)| view.clone())
            .collect()
    }

    /// Iterate over `(view, references)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ViewName, &[String])> {
        self.nodes.iter().map(|(name, deps)| (name, deps.as_slice()))
    }

    /// Views in insertion (discovery) order, ignoring dependencies.
    ///
    /// Only suitable for display when [`topological_order`](Self::topological_order)
    /// has failed.
    pub fn discovery_order(&self) -> Vec<ViewName> {
        self.nodes.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Build the petgraph representation: node `i` is the `i`th inserted
    /// view, and an edge runs from each dependency to its dependent.
    fn to_petgraph(&self) -> DiGraph<ViewName, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), 0);
        for (name, _) in &self.nodes {
            graph.add_node(name.clone());
        }
        for (pos, (_, deps)) in self.nodes.iter().enumerate() {
            for dep in deps {
                if let Some(&dep_pos) = self.index.get(dep.as_str()) {
                    // update_edge: repeated refs to the same view add one edge
                    graph.update_edge(NodeIndex::new(dep_pos), NodeIndex::new(pos), ());
                }
            }
        }
        graph
    }

    /// Order all views so dependencies precede dependents.
    ///
    /// Each round takes every view with no unresolved dependencies, in
    /// insertion order. When views remain but none is ready, fails with
    /// [`CoreError::CircularDependency`] naming every unresolved view.
    pub fn topological_order(&self) -> CoreResult<Vec<ViewName>> {
        let graph = self.to_petgraph();
        let mut in_degree: Vec<usize> = graph
            .node_indices()
            .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut remaining: Vec<NodeIndex> = graph.node_indices().collect();
        let mut order = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let (ready, blocked): (Vec<NodeIndex>, Vec<NodeIndex>) = remaining
                .into_iter()
                .partition(|idx| in_degree[idx.index()] == 0);

            if ready.is_empty() {
                return Err(CoreError::CircularDependency {
                    nodes: blocked.iter().map(|&idx| graph[idx].to_string()).collect(),
                });
            }

            for idx in ready {
                for dependent in graph.neighbors_directed(idx, Direction::Outgoing) {
                    in_degree[dependent.index()] -= 1;
                }
                order.push(graph[idx].clone());
            }
            remaining = blocked;
        }

        Ok(order)
    }

    /// Topological order of the whole graph, restricted to `targets`.
    ///
    /// The graph is sorted in full, so a cycle anywhere fails even if no
    /// target is part of it. Targets that are not keys are dropped.
    pub fn order_for(&self, targets: &[ViewName]) -> CoreResult<Vec<ViewName>> {
        let wanted: HashSet<&str> = targets.iter().map(ViewName::as_str).collect();
        Ok(self
            .topological_order()?
            .into_iter()
            .filter(|name| wanted.contains(name.as_str()))
            .collect())
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
