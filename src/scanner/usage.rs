//! Project source scanning.
//!
//! Builds the usage set for one project: every external package name its
//! candidate source files reference, plus the ambient type packages listed
//! in the project's tsconfig. Candidate files are the script/markup
//! variants at the project root and under the conventional `src/` and
//! `lib/` folders; files elsewhere are not scanned.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;
use walkdir::WalkDir;

use crate::parser::strip_line_comments;

use super::patterns::ImportPatterns;

/// Extensions of scannable source files.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx"];

/// Conventional source folders scanned recursively.
const SOURCE_DIRS: &[&str] = &["src", "lib"];

/// Errors that abort a project scan.
///
/// Unreadable source files are not an error (they are skipped with a
/// warning); only a broken type-configuration file is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// tsconfig.json exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    TsconfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// tsconfig.json exists but is not valid JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    TsconfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Package names a project's source demonstrably references, in discovery
/// order and without duplicates.
#[derive(Debug, Clone, Default)]
pub struct UsageSet {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl UsageSet {
    /// Creates an empty usage set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a package name; returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        self.names.push(name);
        true
    }

    /// Returns true if the name was discovered.
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Iterates names in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of discovered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scans one project and returns its usage set.
///
/// A candidate file that cannot be read is skipped with a console warning;
/// the scan continues with the remaining files.
pub fn scan_project(
    project_folder: &Path,
    patterns: &ImportPatterns,
) -> Result<UsageSet, ScanError> {
    let mut usage = UsageSet::new();

    let files = candidate_files(project_folder);
    debug!(
        "scanning {} candidate files in {}",
        files.len(),
        project_folder.display()
    );

    for file in files {
        let contents = match fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(error) => {
                eprintln!(
                    "Skipping file due to error ({}): {}",
                    error,
                    file.display()
                );
                continue;
            }
        };

        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            for specifier in patterns.specifiers_in_line(line) {
                if let Some(package) = patterns.package_name_of(&specifier) {
                    usage.insert(package);
                }
            }
        }
    }

    for name in configured_types(project_folder)? {
        usage.insert(name.clone());
        usage.insert(format!("@types/{name}"));
    }

    Ok(usage)
}

/// Enumerates scannable files: source-extension files directly in the
/// project root, then everything under `src/` and `lib/` recursively.
pub fn candidate_files(project_folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let mut root_files: Vec<PathBuf> = fs::read_dir(project_folder)
        .into_iter()
        .flatten()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_source_extension(path))
        .collect();
    root_files.sort();
    files.extend(root_files);

    for dir in SOURCE_DIRS {
        let dir_path = project_folder.join(dir);
        if !dir_path.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.into_path();
            if path.is_file() && has_source_extension(&path) {
                files.push(path);
            }
        }
    }

    files
}

/// Reads the `compilerOptions.types` list from the project's tsconfig, if
/// one exists. These names are ambient dependencies with no textual import.
fn configured_types(project_folder: &Path) -> Result<Vec<String>, ScanError> {
    let path = project_folder.join("tsconfig.json");
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| ScanError::TsconfigRead {
        path: path.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&strip_line_comments(&content)).map_err(|source| {
        ScanError::TsconfigParse { path, source }
    })?;

    Ok(value
        .get("compilerOptions")
        .and_then(|options| options.get("types"))
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default())
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
