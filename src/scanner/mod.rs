//! Source scanning module for depkeep.
//!
//! This module discovers which external package names a project's source
//! files actually reference. Matching is regex-based over raw lines - the
//! recognized reference forms are a fixed battery and deliberately part of
//! the tool's observable behavior.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use depkeep::scanner::{scan_project, ImportPatterns};
//!
//! let patterns = ImportPatterns::new();
//! let usage = scan_project(Path::new("packages/core"), &patterns)?;
//! for name in usage.iter() {
//!     println!("references {name}");
//! }
//! ```

pub mod patterns;
pub mod usage;

// Re-export main types for convenience
pub use patterns::ImportPatterns;
pub use usage::{candidate_files, scan_project, ScanError, UsageSet};
