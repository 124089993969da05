//! `depkeep trim` - report and strip unused dependencies per project.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::reconcile::{self, print_section};
use crate::scanner::{scan_project, ImportPatterns};
use crate::workspace::WorkspaceConfig;

pub fn run(start_dir: &Path) -> Result<()> {
    let config = WorkspaceConfig::load_from_default_location(start_dir)?;
    let patterns = ImportPatterns::new();
    let mut stdout = io::stdout();

    for project in config.projects() {
        writeln!(
            stdout,
            "{}",
            format!("=== Project: {} ===", project.package_name).bold()
        )?;

        let usage = scan_project(&project.project_folder, &patterns)?;
        let result = reconcile::reconcile(&project.package_json, &usage);

        print_section(&mut stdout, "Unused dependencies", &result.unused_dependencies)?;
        print_section(
            &mut stdout,
            "Undeclared dependencies",
            &result.undeclared_dependencies,
        )?;

        reconcile::write_report(&project.project_folder, &result)?;

        if !result.unused_dependencies.is_empty()
            && reconcile::trim_manifest(&project.project_folder, &result.unused_dependencies)?
        {
            info!(
                "trimmed {} entries from {}",
                result.unused_dependencies.len(),
                project.package_name
            );
        }

        writeln!(stdout)?;
    }

    Ok(())
}
