//! Shared types for manifest parsing.
//!
//! This module defines the core data structures used to represent
//! package manifests and their dependency tables.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Represents the structure of a package.json file.
///
/// This struct mirrors the npm package.json specification, capturing the
/// fields needed for dependency housekeeping. Dependency tables use
/// order-preserving maps so that declaration order in the file is the
/// order seen by every consumer.
///
/// # Example
///
/// ```
/// use depkeep::parser::PackageJson;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    /// The name of the package.
    pub name: Option<String>,

    /// The version of the package (semver format).
    pub version: Option<String>,

    /// Regular dependencies required at runtime.
    pub dependencies: Option<Map<String, Value>>,

    /// Development-only dependencies (testing, building, etc.).
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<Map<String, Value>>,

    /// Peer dependencies that the host package must provide.
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<Map<String, Value>>,

    /// Build/test script commands, keyed by script name.
    pub scripts: Option<Map<String, Value>>,
}

impl PackageJson {
    /// Returns the dependency table for the given kind, if declared.
    pub fn table(&self, kind: DependencyKind) -> Option<&Map<String, Value>> {
        match kind {
            DependencyKind::Regular => self.dependencies.as_ref(),
            DependencyKind::Dev => self.dev_dependencies.as_ref(),
            DependencyKind::Peer => self.peer_dependencies.as_ref(),
        }
    }

    /// Returns true if the package declares any dependencies.
    pub fn has_dependencies(&self) -> bool {
        DependencyKind::ALL
            .iter()
            .any(|kind| self.table(*kind).is_some_and(|t| !t.is_empty()))
    }

    /// Returns the total count of declared dependencies across all kinds.
    pub fn dependency_count(&self) -> usize {
        DependencyKind::ALL
            .iter()
            .map(|kind| self.table(*kind).map_or(0, |t| t.len()))
            .sum()
    }

    /// Iterates over the script command strings, in declaration order.
    pub fn script_commands(&self) -> impl Iterator<Item = &str> {
        self.scripts
            .iter()
            .flat_map(|scripts| scripts.values())
            .filter_map(Value::as_str)
    }
}

/// Categorizes the kind of dependency declaration in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Regular dependencies - required at runtime.
    Regular,

    /// Development dependencies - only needed during development.
    Dev,

    /// Peer dependencies - expected to be provided by the consumer.
    Peer,
}

impl DependencyKind {
    /// All dependency kinds, in manifest order.
    pub const ALL: [DependencyKind; 3] = [
        DependencyKind::Regular,
        DependencyKind::Dev,
        DependencyKind::Peer,
    ];

    /// Returns the manifest key this kind is declared under.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyKind::Regular => "dependencies",
            DependencyKind::Dev => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
        }
    }

    /// Returns a short label for the dependency kind.
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Regular => "regular",
            DependencyKind::Dev => "dev",
            DependencyKind::Peer => "peer",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}
