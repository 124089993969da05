//! `depkeep update-versions` - sync workspace-internal dependency pins.
//!
//! Every pin pointing at a workspace project is rewritten to that
//! project's current manifest version, except for names the dependent
//! project lists as cyclic.

use std::path::Path;

use anyhow::Result;

use crate::parser::{DependencyKind, ManifestEditor};
use crate::workspace::WorkspaceConfig;

pub fn run(start_dir: &Path) -> Result<()> {
    let config = WorkspaceConfig::load_from_default_location(start_dir)?;

    for project in config.projects() {
        let mut editor = ManifestEditor::load(project.manifest_path())?;

        for kind in [DependencyKind::Regular, DependencyKind::Dev] {
            let Some(table) = project.package_json.table(kind) else {
                continue;
            };
            for name in table.keys() {
                if project.cyclic_dependency_projects.contains(name) {
                    continue;
                }
                let Some(version) = config
                    .project(name)
                    .and_then(|target| target.package_json.version.as_deref())
                else {
                    continue;
                };
                editor.set_version(kind, name, version);
            }
        }

        editor.save_if_modified()?;
    }

    Ok(())
}
