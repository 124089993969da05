//! `depkeep graph` - print the workspace-internal dependency graph.

use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::graph::WorkspaceGraph;
use crate::workspace::WorkspaceConfig;

pub fn run(start_dir: &Path) -> Result<()> {
    let config = WorkspaceConfig::load_from_default_location(start_dir)?;
    let graph = WorkspaceGraph::from_config(&config);

    let mut output = Map::new();
    for (name, entry) in graph.entries() {
        output.insert(name, serde_json::to_value(entry)?);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}
