//! Parser module for depkeep.
//!
//! This module provides parsing and in-place editing for npm package.json
//! manifests, plus the shared manifest data model.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depkeep::parser::{self, DependencyKind};
//!
//! // Parse a package.json file
//! let pkg = parser::parse_file(Path::new("package.json")).unwrap();
//!
//! for kind in DependencyKind::ALL {
//!     if let Some(table) = pkg.table(kind) {
//!         println!("{}: {} entries", kind, table.len());
//!     }
//! }
//! ```

pub mod package_json;
pub mod types;

// Re-export commonly used types for convenience
pub use package_json::{
    parse_file, parse_str, strip_line_comments, ManifestEditor, ParseError, ParseResult,
};

pub use types::{DependencyKind, PackageJson};
