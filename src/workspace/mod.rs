//! Workspace configuration for depkeep.
//!
//! Every subcommand starts by loading the workspace: the ordered list of
//! projects declared in `workspace.json`, each with its parsed manifest
//! and the set of deliberately unmanaged ("cyclic") dependency names.

pub mod config;

pub use config::{
    ConfigError, WorkspaceConfig, WorkspaceProject, WORKSPACE_FILE_NAME,
};
