//! Parser and editor for npm package.json files.
//!
//! This module provides functionality to parse package.json files and to
//! edit them in place: version-pin updates and dependency removal with an
//! "only write if something actually changed" save.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::types::{DependencyKind, PackageJson};

/// Errors that can occur during package.json parsing or rewriting.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read or write the file on disk.
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The package.json structure is invalid or missing required fields.
    #[error("Invalid package.json: {0}")]
    InvalidPackage(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a package.json file from a file path.
///
/// # Arguments
///
/// * `path` - Path to the package.json file
///
/// # Returns
///
/// A `ParseResult` containing the parsed `PackageJson` or an error.
pub fn parse_file(path: &Path) -> ParseResult<PackageJson> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a package.json from a string.
///
/// # Example
///
/// ```
/// use depkeep::parser::parse_str;
///
/// let json = r#"{"name": "my-app", "version": "1.0.0"}"#;
/// let pkg = parse_str(json).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ParseResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

/// Strips `//` line comments from JSON-with-comments content.
///
/// Workspace configuration and tsconfig files tolerate line comments;
/// everything after the first `//` on a line is dropped before parsing.
pub fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if let Some(idx) = line.find("//") {
                &line[..idx]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// An in-place editor for a package.json file.
///
/// The editor keeps the full JSON document (not just the typed fields), so
/// a save preserves unrelated manifest fields and the key order of the
/// original file. Edits are tracked and [`ManifestEditor::save_if_modified`]
/// writes the file back only when at least one edit changed a value.
///
/// # Example
///
/// ```ignore
/// use depkeep::parser::{DependencyKind, ManifestEditor};
///
/// let mut editor = ManifestEditor::load("package.json")?;
/// editor.set_version(DependencyKind::Regular, "lodash", "^4.17.21");
/// editor.save_if_modified()?;
/// ```
#[derive(Debug)]
pub struct ManifestEditor {
    path: PathBuf,
    document: Value,
    modified: bool,
}

impl ManifestEditor {
    /// Loads a manifest for editing.
    pub fn load(path: impl Into<PathBuf>) -> ParseResult<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let document: Value = serde_json::from_str(&content)?;
        if !document.is_object() {
            return Err(ParseError::InvalidPackage(
                "manifest root is not a JSON object".to_string(),
            ));
        }
        Ok(Self {
            path,
            document,
            modified: false,
        })
    }

    /// Returns the version pin for a dependency, if the entry exists.
    pub fn get_version(&self, kind: DependencyKind, name: &str) -> Option<&str> {
        self.document
            .get(kind.manifest_key())?
            .get(name)?
            .as_str()
    }

    /// Sets the version pin for an existing dependency table entry.
    ///
    /// A no-op if the table is absent, or if the entry already carries the
    /// requested version (so an unchanged pin never dirties the manifest).
    pub fn set_version(&mut self, kind: DependencyKind, name: &str, version: &str) {
        let Some(table) = self
            .document
            .get_mut(kind.manifest_key())
            .and_then(Value::as_object_mut)
        else {
            return;
        };

        if table.get(name).and_then(Value::as_str) == Some(version) {
            return;
        }
        table.insert(name.to_string(), Value::String(version.to_string()));
        self.modified = true;
    }

    /// Removes a dependency entry from the given table.
    ///
    /// Returns true if an entry was actually deleted; a missing table or
    /// missing key is a no-op.
    pub fn remove_dependency(&mut self, kind: DependencyKind, name: &str) -> bool {
        let removed = self
            .document
            .get_mut(kind.manifest_key())
            .and_then(Value::as_object_mut)
            .is_some_and(|table| table.remove(name).is_some());
        if removed {
            self.modified = true;
        }
        removed
    }

    /// Returns true if any edit changed the document since load.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Writes the manifest back, but only if an edit changed it.
    ///
    /// The write rewrites the existing file in place: untouched fields and
    /// key order come through unchanged, pretty-printed with a trailing
    /// newline. Returns true if a write happened.
    pub fn save_if_modified(&mut self) -> ParseResult<bool> {
        if !self.modified {
            return Ok(false);
        }
        let mut output = serde_json::to_string_pretty(&self.document)?;
        output.push('\n');
        fs::write(&self.path, output)?;
        self.modified = false;
        Ok(true)
    }
}
