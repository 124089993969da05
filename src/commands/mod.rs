//! Subcommand implementations.
//!
//! Each command is an independent linear pipeline: load the workspace
//! configuration once, iterate projects, compute a derived fact, write
//! output. Commands share no state.

pub mod graph;
pub mod trim;
pub mod update_cyclics;
pub mod update_scoped;
pub mod update_versions;
