//! `depkeep update-scoped` - bulk-update pins for scoped dependencies.
//!
//! Collects every declared dependency name matching one of the given
//! prefixes, resolves the latest published version for each, and rewrites
//! any pin that differs. Manifests are saved one by one; all writes land
//! before the command returns.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Result;

use crate::parser::{DependencyKind, ManifestEditor};
use crate::registry::RegistryClient;
use crate::workspace::{WorkspaceConfig, WorkspaceProject};

pub fn run(
    start_dir: &Path,
    prefixes: &[String],
    registry_url: &str,
    concurrency: usize,
) -> Result<()> {
    let config = WorkspaceConfig::load_from_default_location(start_dir)?;

    let names = collect_matching_names(&config, prefixes);
    let client = RegistryClient::new(registry_url)?;
    let versions = client.latest_versions(&names, concurrency)?;

    for project in config.projects() {
        if update_project(project, &versions)? {
            println!("Updating {}", project.project_folder.display());
        }
    }

    Ok(())
}

/// Dependency names (regular and dev kinds, all projects) matching any
/// prefix, first seen first.
fn collect_matching_names(config: &WorkspaceConfig, prefixes: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for project in config.projects() {
        for kind in [DependencyKind::Regular, DependencyKind::Dev] {
            let Some(table) = project.package_json.table(kind) else {
                continue;
            };
            for name in table.keys() {
                if prefixes.iter().any(|prefix| name.starts_with(prefix))
                    && seen.insert(name.as_str())
                {
                    names.push(name.clone());
                }
            }
        }
    }

    names
}

/// Rewrites one project's pins to the resolved versions; returns true if
/// the manifest changed and was written.
fn update_project(
    project: &WorkspaceProject,
    versions: &HashMap<String, String>,
) -> Result<bool> {
    let mut editor = ManifestEditor::load(project.manifest_path())?;

    for kind in [DependencyKind::Regular, DependencyKind::Dev] {
        let Some(table) = project.package_json.table(kind) else {
            continue;
        };
        for name in table.keys() {
            if let Some(version) = versions.get(name) {
                editor.set_version(kind, name, version);
            }
        }
    }

    Ok(editor.save_if_modified()?)
}
