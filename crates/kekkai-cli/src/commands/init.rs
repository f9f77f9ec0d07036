//! Init command implementation.

use anyhow::{bail, Context, Result};
use kekkai_core::loader::CONFIG_FILE_NAME;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"{
  "appAlias": "@",
  "dependencyFlow": [
    ["pages", "layouts"],
    ["layouts", "containers"],
    ["containers", "contexts", { "selfOnly": true, "label": "Only Provider" }],
    ["containers", "components"],
    ["components", "hooks"],
    ["hooks", "contexts", { "selfOnly": true, "label": "Only Context" }],
    ["contexts", "services"],
    ["components", "utils"],
    ["services", "utils"]
  ],
  "lintFiles": "src/{folder}/**/*.{ts,tsx}",
  "overrideRules": {},
  "packageImportRules": [],
  "docs": {
    "file": "README.md",
    "markerTag": "DEPENDENCY_FLOW"
  }
}
"#;

/// Runs the init command.
pub fn run(project_dir: &Path, force: bool) -> Result<()> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to describe your folder dependency flow");
    println!("  2. Run: kekkai check");
    println!("  3. Add DEPENDENCY_FLOW:START / DEPENDENCY_FLOW:END markers to README.md");
    println!("  4. Run: kekkai docs");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kekkai_core::loader::{load_str, ConfigFormat};
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = load_str(DEFAULT_CONFIG, ConfigFormat::Json).unwrap();
        assert!(config.docs.is_some());
        assert_eq!(config.folders().len(), 8);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{}").unwrap();

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        run(tmp.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
