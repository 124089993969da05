//! Dependency reconciliation for depkeep.
//!
//! Compares the package names a project's source actually references (its
//! usage set) against the names declared in its manifest, producing two
//! disjoint sets: declared-but-unused and used-but-undeclared. The result
//! is persisted as a side-car report next to the project, and unused
//! entries are stripped from the manifest in place.
//!
//! Retention rules, in order:
//! - a used name also marks its `@types/<name>` companion as used;
//! - allow-listed names are never reported unused;
//! - a name appearing as a substring of any script command is never
//!   reported unused (scripts may invoke a dependency's executable
//!   without a static import).

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::parser::{DependencyKind, ManifestEditor, PackageJson, ParseResult};
use crate::scanner::UsageSet;

/// Package names exempt from unused-dependency reporting. These are
/// implicit runtime helper libraries with no textual import.
pub const ALLOWED_DEPS: &[&str] = &["tslib"];

/// File name of the per-project report artifact.
pub const REPORT_FILE_NAME: &str = "scanned-deps.log";

/// The reconciliation outcome for one project.
///
/// Both lists are in discovery order: manifest declaration order for
/// unused names, scan order for undeclared names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Declared in the manifest, never referenced by source.
    #[serde(rename = "unusedDependencies")]
    pub unused_dependencies: Vec<String>,

    /// Referenced by source, never declared in the manifest.
    #[serde(rename = "undeclaredDependencies")]
    pub undeclared_dependencies: Vec<String>,
}

impl ReconciliationResult {
    /// Returns true if nothing is unused and nothing is undeclared.
    pub fn is_clean(&self) -> bool {
        self.unused_dependencies.is_empty() && self.undeclared_dependencies.is_empty()
    }
}

/// Reconciles a project's declared dependencies against its usage set.
pub fn reconcile(manifest: &PackageJson, usage: &UsageSet) -> ReconciliationResult {
    // Declared union across the three kinds, first occurrence wins.
    let mut unused: Vec<String> = Vec::new();
    let mut declared: HashSet<&str> = HashSet::new();
    for kind in [
        DependencyKind::Dev,
        DependencyKind::Regular,
        DependencyKind::Peer,
    ] {
        if let Some(table) = manifest.table(kind) {
            for name in table.keys() {
                if declared.insert(name.as_str()) {
                    unused.push(name.clone());
                }
            }
        }
    }

    let mut undeclared: Vec<String> = Vec::new();
    for used in usage.iter() {
        if declared.contains(used) {
            let types_companion = format!("@types/{used}");
            unused.retain(|name| name != used && *name != types_companion);
        } else {
            undeclared.push(used.to_string());
        }
    }

    unused.retain(|name| !ALLOWED_DEPS.contains(&name.as_str()));
    unused.retain(|name| {
        !manifest
            .script_commands()
            .any(|command| command.contains(name.as_str()))
    });

    ReconciliationResult {
        unused_dependencies: unused,
        undeclared_dependencies: undeclared,
    }
}

/// Writes the report artifact into the project folder.
pub fn write_report(project_folder: &Path, result: &ReconciliationResult) -> io::Result<()> {
    let mut body = serde_json::to_string_pretty(result)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    body.push('\n');
    fs::write(project_folder.join(REPORT_FILE_NAME), body)
}

/// Strips every unused name from all three dependency kinds of the
/// project's manifest, loaded fresh from disk.
///
/// Returns true if the manifest was written; the write happens only when
/// at least one entry was actually deleted.
pub fn trim_manifest(project_folder: &Path, unused: &[String]) -> ParseResult<bool> {
    let mut editor = ManifestEditor::load(project_folder.join("package.json"))?;
    for name in unused {
        for kind in DependencyKind::ALL {
            editor.remove_dependency(kind, name);
        }
    }
    editor.save_if_modified()
}

/// Prints one labeled name list in the per-project console block.
pub fn print_section<W: Write>(out: &mut W, label: &str, names: &[String]) -> io::Result<()> {
    if names.is_empty() {
        writeln!(out, "{label}: NONE")
    } else {
        writeln!(out, "{label}:")?;
        for name in names {
            writeln!(out, " - {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use tempfile::TempDir;

    fn usage_of(names: &[&str]) -> UsageSet {
        let mut usage = UsageSet::new();
        for name in names {
            usage.insert(*name);
        }
        usage
    }

    #[test]
    fn test_unused_dependency_reported_and_used_kept() {
        let manifest = parse_str(
            r#"{"dependencies": {"lodash": "^4.0.0", "unused-pkg": "^1.0.0"}}"#,
        )
        .unwrap();
        let usage = usage_of(&["lodash"]);

        let result = reconcile(&manifest, &usage);
        assert_eq!(result.unused_dependencies, ["unused-pkg"]);
        assert!(result.undeclared_dependencies.is_empty());
    }

    #[test]
    fn test_undeclared_dependency_reported() {
        let manifest = parse_str(r#"{"name": "bare"}"#).unwrap();
        let usage = usage_of(&["left-pad"]);

        let result = reconcile(&manifest, &usage);
        assert!(result.unused_dependencies.is_empty());
        assert_eq!(result.undeclared_dependencies, ["left-pad"]);
    }

    #[test]
    fn test_used_and_declared_name_reported_nowhere() {
        let manifest = parse_str(r#"{"dependencies": {"lodash": "^4.0.0"}}"#).unwrap();
        let usage = usage_of(&["lodash"]);

        let result = reconcile(&manifest, &usage);
        assert!(result.is_clean());
    }

    #[test]
    fn test_types_companion_of_used_package_kept() {
        let manifest = parse_str(
            r#"{"dependencies": {"lodash": "^4.0.0", "@types/lodash": "^4.14.0"}}"#,
        )
        .unwrap();
        let usage = usage_of(&["lodash"]);

        let result = reconcile(&manifest, &usage);
        assert!(result.unused_dependencies.is_empty());
    }

    #[test]
    fn test_ambient_types_package_treated_as_used() {
        // tsconfig lists "node": the scanner inserts both "node" and
        // "@types/node" into the usage set.
        let manifest = parse_str(r#"{"devDependencies": {"@types/node": "^18.0.0"}}"#).unwrap();
        let usage = usage_of(&["node", "@types/node"]);

        let result = reconcile(&manifest, &usage);
        assert!(result.unused_dependencies.is_empty());
    }

    #[test]
    fn test_allow_list_never_unused() {
        let manifest = parse_str(r#"{"dependencies": {"tslib": "^2.0.0"}}"#).unwrap();
        let result = reconcile(&manifest, &usage_of(&[]));

        assert!(result.unused_dependencies.is_empty());
    }

    #[test]
    fn test_script_mention_retains_dependency() {
        let manifest = parse_str(
            r#"{
                "devDependencies": {"eslint": "^8.0.0", "really-unused": "^1.0.0"},
                "scripts": {"lint": "eslint src --ext .ts"}
            }"#,
        )
        .unwrap();
        let result = reconcile(&manifest, &usage_of(&[]));

        assert_eq!(result.unused_dependencies, ["really-unused"]);
    }

    #[test]
    fn test_declared_sets_disjoint_from_outputs() {
        let manifest = parse_str(
            r#"{
                "dependencies": {"used-a": "1.0.0", "unused-b": "1.0.0"},
                "devDependencies": {"used-c": "1.0.0"},
                "peerDependencies": {"unused-d": "1.0.0"}
            }"#,
        )
        .unwrap();
        let usage = usage_of(&["used-a", "used-c", "stray-e"]);

        let result = reconcile(&manifest, &usage);
        for name in &result.unused_dependencies {
            assert!(!usage.contains(name));
        }
        for name in &result.undeclared_dependencies {
            assert!(manifest
                .table(DependencyKind::Regular)
                .map_or(true, |t| !t.contains_key(name)));
        }
        assert_eq!(result.unused_dependencies, ["unused-b", "unused-d"]);
        assert_eq!(result.undeclared_dependencies, ["stray-e"]);
    }

    #[test]
    fn test_unused_order_follows_declaration_order() {
        let manifest = parse_str(
            r#"{
                "dependencies": {"z-unused": "1.0.0"},
                "devDependencies": {"a-unused": "1.0.0"}
            }"#,
        )
        .unwrap();
        let result = reconcile(&manifest, &usage_of(&[]));

        // devDependencies names are discovered before regular dependencies.
        assert_eq!(result.unused_dependencies, ["a-unused", "z-unused"]);
    }

    #[test]
    fn test_write_report_artifact() {
        let dir = TempDir::new().unwrap();
        let result = ReconciliationResult {
            unused_dependencies: vec!["unused-pkg".to_string()],
            undeclared_dependencies: vec![],
        };

        write_report(dir.path(), &result).unwrap();

        let raw = fs::read_to_string(dir.path().join(REPORT_FILE_NAME)).unwrap();
        let parsed: ReconciliationResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, result);
        assert!(raw.contains("unusedDependencies"));
        assert!(raw.contains("undeclaredDependencies"));
    }

    #[test]
    fn test_trim_manifest_removes_from_all_kinds() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "trim-me",
                "dependencies": {"gone": "1.0.0", "kept": "1.0.0"},
                "devDependencies": {"gone": "1.0.0"},
                "peerDependencies": {"gone": "1.0.0"}
            }"#,
        )
        .unwrap();

        let written = trim_manifest(dir.path(), &["gone".to_string()]).unwrap();
        assert!(written);

        let pkg = crate::parser::parse_file(&dir.path().join("package.json")).unwrap();
        assert!(!pkg.dependencies.as_ref().unwrap().contains_key("gone"));
        assert!(pkg.dependencies.as_ref().unwrap().contains_key("kept"));
        assert!(!pkg.dev_dependencies.as_ref().unwrap().contains_key("gone"));
        assert!(!pkg.peer_dependencies.as_ref().unwrap().contains_key("gone"));
    }

    #[test]
    fn test_trim_manifest_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("package.json");
        fs::write(
            &manifest_path,
            r#"{"dependencies": {"gone": "1.0.0", "kept": "1.0.0"}}"#,
        )
        .unwrap();

        assert!(trim_manifest(dir.path(), &["gone".to_string()]).unwrap());
        let after_first = fs::read_to_string(&manifest_path).unwrap();

        // Second run deletes nothing, so nothing is written.
        assert!(!trim_manifest(dir.path(), &["gone".to_string()]).unwrap());
        assert_eq!(fs::read_to_string(&manifest_path).unwrap(), after_first);
    }

    #[test]
    fn test_print_section_formats() {
        let mut out = Vec::new();
        print_section(&mut out, "Unused dependencies", &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Unused dependencies: NONE\n");

        let mut out = Vec::new();
        print_section(
            &mut out,
            "Undeclared dependencies",
            &["left-pad".to_string()],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Undeclared dependencies:\n - left-pad\n"
        );
    }
}
