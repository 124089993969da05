//! Workspace configuration loading.
//!
//! A workspace is described by a `workspace.json` file at the monorepo
//! root, listing every project with its folder and (optionally) the set of
//! dependency names the workspace deliberately leaves unmanaged. Loading
//! the configuration eagerly parses every project manifest, so a broken
//! manifest surfaces immediately rather than midway through a command.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::parser::{self, PackageJson, ParseError};

/// File name that marks the workspace root.
pub const WORKSPACE_FILE_NAME: &str = "workspace.json";

/// Errors that can occur while locating or loading the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No workspace.json was found in the starting folder or any parent.
    #[error("no workspace.json found in {start} or any parent folder")]
    NotFound { start: String },

    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A project's package.json could not be loaded.
    #[error("failed to load manifest for project '{name}': {source}")]
    Manifest { name: String, source: ParseError },
}

/// Raw on-disk shape of workspace.json.
#[derive(Debug, Deserialize)]
struct WorkspaceFile {
    projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    #[serde(rename = "packageName")]
    package_name: String,

    #[serde(rename = "projectFolder")]
    project_folder: PathBuf,

    #[serde(rename = "cyclicDependencyProjects", default)]
    cyclic_dependency_projects: Vec<String>,
}

/// One project of the workspace, with its manifest already loaded.
#[derive(Debug, Clone)]
pub struct WorkspaceProject {
    /// Unique package name.
    pub package_name: String,

    /// Absolute path to the project folder.
    pub project_folder: PathBuf,

    /// Dependency names excluded from the workspace-internal graph.
    pub cyclic_dependency_projects: HashSet<String>,

    /// The project's parsed manifest.
    pub package_json: PackageJson,
}

impl WorkspaceProject {
    /// Path to the project's package.json.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_folder.join("package.json")
    }
}

/// The loaded workspace configuration: an ordered project list with lookup
/// by package name.
#[derive(Debug)]
pub struct WorkspaceConfig {
    root: PathBuf,
    projects: Vec<WorkspaceProject>,
    by_name: HashMap<String, usize>,
}

impl WorkspaceConfig {
    /// Locates the workspace root by walking upward from `start` and loads
    /// the full configuration, including every project manifest.
    pub fn load_from_default_location(start: &Path) -> Result<Self, ConfigError> {
        let root = find_workspace_root(start)?;
        debug!("workspace root: {}", root.display());

        let config_path = root.join(WORKSPACE_FILE_NAME);
        let raw = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let file: WorkspaceFile = serde_json::from_str(&parser::strip_line_comments(&raw))
            .map_err(|source| ConfigError::Parse {
                path: config_path,
                source,
            })?;

        let mut projects = Vec::with_capacity(file.projects.len());
        let mut by_name = HashMap::with_capacity(file.projects.len());
        for entry in file.projects {
            let project_folder = root.join(&entry.project_folder);
            let package_json =
                parser::parse_file(&project_folder.join("package.json")).map_err(|source| {
                    ConfigError::Manifest {
                        name: entry.package_name.clone(),
                        source,
                    }
                })?;

            by_name.insert(entry.package_name.clone(), projects.len());
            projects.push(WorkspaceProject {
                package_name: entry.package_name,
                project_folder,
                cyclic_dependency_projects: entry.cyclic_dependency_projects.into_iter().collect(),
                package_json,
            });
        }
        debug!("loaded {} projects", projects.len());

        Ok(Self {
            root,
            projects,
            by_name,
        })
    }

    /// The workspace root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The ordered project list.
    pub fn projects(&self) -> &[WorkspaceProject] {
        &self.projects
    }

    /// Looks up a project by package name.
    pub fn project(&self, name: &str) -> Option<&WorkspaceProject> {
        self.by_name.get(name).map(|idx| &self.projects[*idx])
    }

    /// Returns true if the name belongs to a workspace project.
    pub fn is_project(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

fn find_workspace_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.canonicalize().map_err(|source| ConfigError::Read {
        path: start.to_path_buf(),
        source,
    })?;

    loop {
        if current.join(WORKSPACE_FILE_NAME).is_file() {
            return Ok(current);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return Err(ConfigError::NotFound {
                    start: start.display().to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        write_file(
            root,
            "workspace.json",
            r#"{
                // Workspace layout
                "projects": [
                    {
                        "packageName": "app-core",
                        "projectFolder": "packages/core"
                    },
                    {
                        "packageName": "app-web",
                        "projectFolder": "packages/web",
                        "cyclicDependencyProjects": ["app-core"]
                    }
                ]
            }"#,
        );
        write_file(
            root,
            "packages/core/package.json",
            r#"{"name": "app-core", "version": "2.1.0"}"#,
        );
        write_file(
            root,
            "packages/web/package.json",
            r#"{"name": "app-web", "version": "0.3.0", "dependencies": {"app-core": "2.0.0"}}"#,
        );

        dir
    }

    #[test]
    fn test_load_from_workspace_root() {
        let dir = fixture();
        let config = WorkspaceConfig::load_from_default_location(dir.path()).unwrap();

        assert_eq!(config.projects().len(), 2);
        assert_eq!(config.projects()[0].package_name, "app-core");
        assert_eq!(config.projects()[1].package_name, "app-web");
    }

    #[test]
    fn test_load_walks_up_from_nested_folder() {
        let dir = fixture();
        let nested = dir.path().join("packages/web");

        let config = WorkspaceConfig::load_from_default_location(&nested).unwrap();
        assert_eq!(config.projects().len(), 2);
        assert_eq!(
            config.root().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let dir = fixture();
        let config = WorkspaceConfig::load_from_default_location(dir.path()).unwrap();

        let core = config.project("app-core").unwrap();
        assert_eq!(core.package_json.version, Some("2.1.0".to_string()));
        assert!(config.is_project("app-web"));
        assert!(!config.is_project("lodash"));
        assert!(config.project("unknown").is_none());
    }

    #[test]
    fn test_cyclic_dependency_projects_parsed() {
        let dir = fixture();
        let config = WorkspaceConfig::load_from_default_location(dir.path()).unwrap();

        let web = config.project("app-web").unwrap();
        assert!(web.cyclic_dependency_projects.contains("app-core"));

        let core = config.project("app-core").unwrap();
        assert!(core.cyclic_dependency_projects.is_empty());
    }

    #[test]
    fn test_missing_workspace_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = WorkspaceConfig::load_from_default_location(dir.path());

        assert!(matches!(result.unwrap_err(), ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_broken_project_manifest_is_fatal() {
        let dir = fixture();
        write_file(dir.path(), "packages/core/package.json", "{ broken");

        let result = WorkspaceConfig::load_from_default_location(dir.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Manifest { .. }));
    }
}
