//! Pattern matchers for module references in source text.
//!
//! The scanner is deliberately regex-based: it recognizes a fixed battery
//! of module-reference forms on raw lines instead of parsing syntax trees.
//! The set of recognized forms is part of the observable behavior of the
//! `trim` command, so narrowing or widening it changes results.

use regex::Regex;

/// The recognized module-reference forms, single- and double-quoted.
const SPECIFIER_PATTERNS: &[&str] = &[
    // Example: require('something')
    r"\brequire\s*\(\s*'([^']+)'\s*\)",
    r#"\brequire\s*\(\s*"([^"]+)"\s*\)"#,
    // Example: import('something')
    r"\bimport\s*\(\s*'([^']+)'\s*\)",
    r#"\bimport\s*\(\s*"([^"]+)"\s*\)"#,
    // Example: require.ensure('something')
    r"\brequire\.ensure\s*\(\s*'([^']+)'\s*\)",
    r#"\brequire\.ensure\s*\(\s*"([^"]+)"\s*\)"#,
    // Example: require.resolve('something')
    r"\brequire\.resolve\s*\(\s*'([^']+)'\s*\)",
    r#"\brequire\.resolve\s*\(\s*"([^"]+)"\s*\)"#,
    // Example: System.import('something')
    r"\bSystem\.import\s*\(\s*'([^']+)'\s*\)",
    r#"\bSystem\.import\s*\(\s*"([^"]+)"\s*\)"#,
    // Example:
    //
    // import {
    //   A, B
    // } from 'something';
    r"\bfrom\s*'([^']+)'",
    r#"\bfrom\s*"([^"]+)""#,
    // Example: import 'something';
    r"\bimport\s*'([^']+)'\s*;",
    r#"\bimport\s*"([^"]+)"\s*;"#,
    // Example:
    //
    // /// <reference types="something" />
    r#"///\s*<\s*reference\s+types\s*=\s*"([^"]+)"\s*/>"#,
];

/// Grammar of an owning package name: an optional `@scope/` prefix followed
/// by one path segment. Everything after that is a subpath.
const PACKAGE_NAME_PATTERN: &str = r"^((@[a-z0-9!_-]+/)?[a-z0-9!_-]+)/?";

/// Compiled matchers for extracting module specifiers from source lines and
/// collapsing them to owning package names.
#[derive(Debug)]
pub struct ImportPatterns {
    specifiers: Vec<Regex>,
    package_name: Regex,
}

impl ImportPatterns {
    /// Compiles the fixed pattern battery.
    pub fn new() -> Self {
        Self {
            specifiers: SPECIFIER_PATTERNS
                .iter()
                .map(|pattern| Regex::new(pattern).unwrap())
                .collect(),
            package_name: Regex::new(PACKAGE_NAME_PATTERN).unwrap(),
        }
    }

    /// Extracts every raw module specifier referenced on a line.
    ///
    /// A line can match several patterns (and one pattern several times);
    /// all captures are returned, in pattern order.
    pub fn specifiers_in_line(&self, line: &str) -> Vec<String> {
        let mut matches = Vec::new();
        for pattern in &self.specifiers {
            for captures in pattern.captures_iter(line) {
                if let Some(specifier) = captures.get(1) {
                    matches.push(specifier.as_str().to_string());
                }
            }
        }
        matches
    }

    /// Collapses a raw specifier to its owning package name.
    ///
    /// ```
    /// use depkeep::scanner::ImportPatterns;
    ///
    /// let patterns = ImportPatterns::new();
    /// assert_eq!(patterns.package_name_of("my-pkg/sub/path").as_deref(), Some("my-pkg"));
    /// assert_eq!(patterns.package_name_of("@scope/pkg").as_deref(), Some("@scope/pkg"));
    /// assert_eq!(patterns.package_name_of("./relative"), None);
    /// ```
    ///
    /// Specifiers that do not match the package-name grammar (relative
    /// paths, malformed names, an empty segment after the scope) yield
    /// `None` and are dropped by the caller.
    pub fn package_name_of(&self, specifier: &str) -> Option<String> {
        self.package_name
            .captures(specifier)
            .and_then(|captures| captures.get(1))
            .map(|name| name.as_str().to_string())
    }
}

impl Default for ImportPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifiers(line: &str) -> Vec<String> {
        ImportPatterns::new().specifiers_in_line(line)
    }

    #[test]
    fn test_require_call() {
        assert_eq!(specifiers("const x = require('lodash');"), ["lodash"]);
        assert_eq!(specifiers(r#"const x = require("lodash");"#), ["lodash"]);
        assert_eq!(specifiers("const x = require ( 'spaced' );"), ["spaced"]);
    }

    #[test]
    fn test_dynamic_import_call() {
        assert_eq!(specifiers("await import('left-pad')"), ["left-pad"]);
        assert_eq!(specifiers(r#"await import("left-pad")"#), ["left-pad"]);
    }

    #[test]
    fn test_require_ensure_and_resolve() {
        assert_eq!(specifiers("require.ensure('chunk-pkg')"), ["chunk-pkg"]);
        assert_eq!(
            specifiers("const p = require.resolve('resolver-pkg');"),
            ["resolver-pkg"]
        );
    }

    #[test]
    fn test_system_import() {
        // The plain dynamic-import pattern also fires on System.import;
        // both captures collapse to the same specifier.
        let matches = specifiers("System.import('platform-pkg')");
        assert!(matches.contains(&"platform-pkg".to_string()));
    }

    #[test]
    fn test_from_clause() {
        assert_eq!(
            specifiers("import { merge } from 'lodash';"),
            ["lodash"]
        );
        assert_eq!(specifiers("} from '@scope/pkg/helpers';"), ["@scope/pkg/helpers"]);
        assert_eq!(specifiers(r#"export * from "re-exported";"#), ["re-exported"]);
    }

    #[test]
    fn test_side_effect_import() {
        assert_eq!(specifiers("import 'polyfill-pkg';"), ["polyfill-pkg"]);
        assert_eq!(specifiers(r#"import "polyfill-pkg" ;"#), ["polyfill-pkg"]);
    }

    #[test]
    fn test_reference_types_directive() {
        assert_eq!(
            specifiers(r#"/// <reference types="node" />"#),
            ["node"]
        );
    }

    #[test]
    fn test_plain_line_has_no_matches() {
        assert!(specifiers("const total = a + b;").is_empty());
        assert!(specifiers("// just a comment").is_empty());
    }

    #[test]
    fn test_multiple_matches_on_one_line() {
        let matches = specifiers("const a = require('one'); const b = require('two');");
        assert_eq!(matches, ["one", "two"]);
    }

    #[test]
    fn test_package_name_collapse() {
        let patterns = ImportPatterns::new();

        assert_eq!(patterns.package_name_of("lodash").as_deref(), Some("lodash"));
        assert_eq!(
            patterns.package_name_of("my-package/lad/dee/dah").as_deref(),
            Some("my-package")
        );
        assert_eq!(
            patterns.package_name_of("@ms/my-package").as_deref(),
            Some("@ms/my-package")
        );
        assert_eq!(
            patterns.package_name_of("@scope/pkg/sub/path").as_deref(),
            Some("@scope/pkg")
        );
    }

    #[test]
    fn test_malformed_specifiers_dropped() {
        let patterns = ImportPatterns::new();

        assert_eq!(patterns.package_name_of("./relative/path"), None);
        assert_eq!(patterns.package_name_of("../parent"), None);
        assert_eq!(patterns.package_name_of("/absolute"), None);
        // Empty after the scope prefix: no match, dropped silently.
        assert_eq!(patterns.package_name_of("@scope/"), None);
        assert_eq!(patterns.package_name_of(""), None);
    }
}
