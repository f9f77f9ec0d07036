//! Rules command implementation.

use anyhow::{Context, Result};
use kekkai_core::rules::build_folder_rules;
use std::path::Path;

use crate::OutputFormat;

/// Runs the rules command.
pub fn run(
    project_dir: &Path,
    config_path: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = crate::config_resolver::load(project_dir, config_path)?;
    let rendered = super::output::render(&build_folder_rules(&config), format)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
