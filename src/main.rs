use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use depkeep::commands;
use depkeep::registry::{DEFAULT_CONCURRENCY, DEFAULT_REGISTRY_URL};

#[derive(Parser)]
#[command(name = "depkeep")]
#[command(version)]
#[command(about = "Workspace dependency housekeeping utilities for JavaScript monorepos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the workspace-internal dependency graph as JSON
    Graph {
        /// Starting folder for workspace discovery
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Report unused/undeclared dependencies per project and strip unused entries
    Trim {
        /// Starting folder for workspace discovery
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Refresh version pins for cyclic dependencies from the registry
    UpdateCyclics {
        /// Starting folder for workspace discovery
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Package registry base URL
        #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
        registry: String,

        /// Concurrent registry queries
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Sync workspace-internal dependency pins to current project versions
    UpdateVersions {
        /// Starting folder for workspace discovery
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Update pins for dependencies matching scope prefixes to the latest version
    UpdateScoped {
        /// Starting folder for workspace discovery
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Name prefix to match; repeat for several (e.g. --prefix @frame/)
        #[arg(long = "prefix", required = true)]
        prefixes: Vec<String>,

        /// Package registry base URL
        #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
        registry: String,

        /// Concurrent registry queries
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Graph { path } => commands::graph::run(&path),
        Commands::Trim { path } => commands::trim::run(&path),
        Commands::UpdateCyclics {
            path,
            registry,
            concurrency,
        } => commands::update_cyclics::run(&path, &registry, concurrency),
        Commands::UpdateVersions { path } => commands::update_versions::run(&path),
        Commands::UpdateScoped {
            path,
            prefixes,
            registry,
            concurrency,
        } => commands::update_scoped::run(&path, &prefixes, &registry, concurrency),
    }
}
