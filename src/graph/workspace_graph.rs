//! Workspace dependency graph implementation using petgraph.
//!
//! Provides a directed graph over the workspace's own projects. Edges
//! point from a dependent project to the workspace project it declares a
//! dependency on; names outside the workspace and names in a project's
//! cyclic set contribute no edges.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use crate::parser::DependencyKind;
use crate::workspace::WorkspaceConfig;

/// One entry of the serialized graph: who this project depends on, and who
/// depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphEntry {
    /// Workspace projects this project declares a dependency on.
    pub dependencies: Vec<String>,
    /// Workspace projects that declare a dependency on this project.
    pub dependents: Vec<String>,
}

/// A directed graph of workspace-internal dependency relationships.
///
/// Nodes are package names; edges point from the dependent project to its
/// dependency. Node creation order is preserved, so serialization walks
/// entries in first-touch order.
///
/// # Example
///
/// ```rust
/// use depkeep::graph::WorkspaceGraph;
///
/// let mut graph = WorkspaceGraph::new();
/// graph.add_edge("app-web", "app-core");
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.dependencies_of("app-web"), ["app-core"]);
/// assert_eq!(graph.dependents_of("app-core"), ["app-web"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkspaceGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl WorkspaceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph for a loaded workspace.
    ///
    /// For every project, each regular and dev dependency whose name is a
    /// workspace project - and is not in this project's cyclic set -
    /// contributes one edge.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        let mut graph = Self::new();

        for project in config.projects() {
            graph.ensure_node(&project.package_name);

            for kind in [DependencyKind::Regular, DependencyKind::Dev] {
                let Some(table) = project.package_json.table(kind) else {
                    continue;
                };
                for name in table.keys() {
                    if config.is_project(name)
                        && !project.cyclic_dependency_projects.contains(name)
                    {
                        graph.add_edge(&project.package_name, name);
                    }
                }
            }
        }

        graph
    }

    /// Adds an edge from a dependent project to its dependency, creating
    /// missing nodes on the way.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        self.graph.add_edge(from_idx, to_idx, ());
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.node_indices.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        idx
    }

    /// Number of projects in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency relationships in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Workspace projects the named project depends on, in edge-addition
    /// order.
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.neighbor_names(name, Direction::Outgoing)
    }

    /// Workspace projects depending on the named project, in edge-addition
    /// order.
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        self.neighbor_names(name, Direction::Incoming)
    }

    fn neighbor_names(&self, name: &str, direction: Direction) -> Vec<String> {
        let Some(idx) = self.node_indices.get(name) else {
            return Vec::new();
        };
        // petgraph iterates neighbors most-recent-first; flip back to
        // addition order.
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(*idx, direction)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect();
        names.reverse();
        names
    }

    /// All graph entries in first-touch order, ready for serialization.
    pub fn entries(&self) -> Vec<(String, GraphEntry)> {
        self.graph
            .node_indices()
            .map(|idx| {
                let name = self.graph[idx].clone();
                let entry = GraphEntry {
                    dependencies: self.dependencies_of(&name),
                    dependents: self.dependents_of(&name),
                };
                (name, entry)
            })
            .collect()
    }
}
