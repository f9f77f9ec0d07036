//! Configuration file resolution.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/structure.config.json`
//! 3. `{project}/structure.config.toml`
//! 4. Not found → error suggesting `kekkai init`

use anyhow::{bail, Context, Result};
use kekkai_core::loader::{self, LoadError, CONFIG_FILE_NAME, TOML_CONFIG_FILE_NAME};
use kekkai_core::StructureConfig;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// No config file exists.
    NotFound,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) => Some(p),
            Self::NotFound => None,
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &[CONFIG_FILE_NAME, TOML_CONFIG_FILE_NAME];

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    // 1. Explicit path from --config flag
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // 2. Project-level config
    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    ConfigSource::NotFound
}

/// Resolves and loads the configuration.
///
/// Validation errors are printed as a diagnostic report before returning.
///
/// # Errors
///
/// Returns an error if no config is found or it fails to load.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<StructureConfig> {
    let source = resolve(project_dir, explicit);
    let Some(path) = source.path() else {
        bail!(
            "No {CONFIG_FILE_NAME} found in {}. Run `kekkai init` to create one.",
            project_dir.display()
        );
    };

    match loader::load_file(path) {
        Ok(config) => Ok(config),
        Err(LoadError::Invalid(e)) => {
            eprintln!("{:?}", miette::Report::new(e));
            bail!("Invalid configuration: {}", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config: {}", path.display())),
    }
}
