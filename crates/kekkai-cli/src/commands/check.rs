//! Check command implementation.

use anyhow::Result;
use kekkai_core::rules::build_folder_rules;
use std::path::Path;

/// Runs the check command.
pub fn run(project_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = crate::config_resolver::load(project_dir, config_path)?;
    let folder_rules = build_folder_rules(&config);

    tracing::info!(
        "Configuration OK: {} folders, {} edges",
        folder_rules.len(),
        config.dependency_flow.edges().len()
    );

    for line in super::output::disallowed_lines(&folder_rules) {
        println!("{line}");
    }

    Ok(())
}
