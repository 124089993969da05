//! Graph module for workspace dependency modeling.
//!
//! This module provides the [`WorkspaceGraph`] struct for building the
//! workspace-internal dependency/dependents graph over a directed graph
//! structure.
//!
//! # Example
//!
//! ```rust
//! use depkeep::graph::WorkspaceGraph;
//!
//! let mut graph = WorkspaceGraph::new();
//! graph.add_edge("app-web", "app-core");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod workspace_graph;

pub use workspace_graph::{GraphEntry, WorkspaceGraph};
