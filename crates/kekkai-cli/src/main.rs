//! kekkai CLI tool.
//!
//! Usage:
//! ```bash
//! kekkai check
//! kekkai rules --format eslint --output eslint.structure.json
//! kekkai docs
//! kekkai init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// One-way dependency flow enforcement for frontend source folders
#[derive(Parser)]
#[command(name = "kekkai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and show what each folder may not import
    Check,

    /// Print the generated import restrictions
    Rules {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Patch the dependency flow diagram into the docs file
    Docs {
        /// Skip running prettier on the patched file
        #[arg(long)]
        no_format: bool,

        /// Cache directory (default: node_modules/.cache/kekkai)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for generated rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// The rule sets as JSON.
    Json,
    /// ESLint flat-config array.
    Eslint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let project_dir = Path::new(".");
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Check => commands::check::run(project_dir, config),
        Commands::Rules { format, output } => {
            commands::rules::run(project_dir, config, format, output.as_deref())
        }
        Commands::Docs {
            no_format,
            cache_dir,
        } => commands::docs::run(project_dir, config, !no_format, cache_dir.as_deref()),
        Commands::Init { force } => commands::init::run(project_dir, force),
    }
}
