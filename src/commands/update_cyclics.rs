//! `depkeep update-cyclics` - refresh version pins for cyclic dependencies.
//!
//! Cyclic dependencies are deliberately unmanaged by the workspace, so
//! their pins drift. This command resolves the latest published version of
//! every cyclic name and rewrites the pin wherever a manifest declares one
//! (regular or dev kind). Every write completes before the command returns.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;

use crate::parser::{DependencyKind, ManifestEditor};
use crate::registry::RegistryClient;
use crate::workspace::WorkspaceConfig;

pub fn run(start_dir: &Path, registry_url: &str, concurrency: usize) -> Result<()> {
    let config = WorkspaceConfig::load_from_default_location(start_dir)?;

    let cyclic_names = collect_cyclic_names(&config);
    let client = RegistryClient::new(registry_url)?;
    let versions = client.latest_versions(&cyclic_names, concurrency)?;

    apply_versions(&config, &versions)
}

/// Union of cyclic dependency names across all projects, first seen first.
fn collect_cyclic_names(config: &WorkspaceConfig) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for project in config.projects() {
        for name in &project.cyclic_dependency_projects {
            if seen.insert(name.as_str()) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Rewrites each project's cyclic pins to the resolved versions, saving
/// only manifests that actually changed.
fn apply_versions(
    config: &WorkspaceConfig,
    versions: &HashMap<String, String>,
) -> Result<()> {
    for project in config.projects() {
        let mut editor = ManifestEditor::load(project.manifest_path())?;

        for name in &project.cyclic_dependency_projects {
            let Some(version) = versions.get(name) else {
                continue;
            };
            for kind in [DependencyKind::Regular, DependencyKind::Dev] {
                if editor.get_version(kind, name).is_some() {
                    editor.set_version(kind, name, version);
                }
            }
        }

        editor.save_if_modified()?;
    }

    Ok(())
}
