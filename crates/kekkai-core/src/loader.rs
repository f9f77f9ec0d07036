//! Reading `structure.config` files from disk.
//!
//! JSON is the primary format; a `.toml` file is parsed into the same
//! untyped value and validated identically.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::model::StructureConfig;
use crate::validate::{validate, ConfigError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "structure.config.json";

/// Alternate configuration file name.
pub const TOML_CONFIG_FILE_NAME: &str = "structure.config.toml";

/// Errors when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("{path} not found")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// JSON syntax error.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Path that failed.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// TOML syntax error.
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        /// Path that failed.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },

    /// The file parsed but its content is not a valid configuration.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Source format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `structure.config.json`
    Json,
    /// `structure.config.toml`
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension; anything but `.toml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, unreadable, malformed, or
/// fails validation.
pub fn load_file(path: &Path) -> Result<StructureConfig, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    tracing::debug!("Loading configuration from {}", path.display());
    let raw = parse_raw(&content, ConfigFormat::from_path(path), path)?;
    Ok(validate(&raw)?)
}

/// Parses and validates configuration text.
///
/// # Errors
///
/// Returns [`LoadError`] on syntax or validation errors.
pub fn load_str(content: &str, format: ConfigFormat) -> Result<StructureConfig, LoadError> {
    let raw = parse_raw(content, format, Path::new("<inline>"))?;
    Ok(validate(&raw)?)
}

fn parse_raw(content: &str, format: ConfigFormat, path: &Path) -> Result<Value, LoadError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Json {
            path: path.to_path_buf(),
            source: e,
        }),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| LoadError::Toml {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const JSON_CONFIG: &str = r#"{
        "appAlias": "~app",
        "dependencyFlow": [["pages", "components"], ["components", "utils"]],
        "lintFiles": ["src/{folder}/**/*.ts", "src/{folder}/**/*.tsx"]
    }"#;

    const TOML_CONFIG: &str = r#"
appAlias = "~app"
lintFiles = "src/{folder}/**/*.ts"
dependencyFlow = [
  ["pages", "components"],
  ["components", "hooks", { selfOnly = true, label = "state" }],
]

[[packageImportRules]]
name = "react-dom"
allowedInFolders = ["pages"]
"#;

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load_file(&tmp.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn loads_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, JSON_CONFIG).unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.folders().as_slice(), ["pages", "components", "utils"]);
        assert_eq!(config.lint_files.len(), 2);
    }

    #[test]
    fn loads_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(TOML_CONFIG_FILE_NAME);
        fs::write(&path, TOML_CONFIG).unwrap();

        let config = load_file(&path).unwrap();
        let edges = config.dependency_flow.edges();
        assert_eq!(edges.len(), 2);
        assert!(edges[1].options.self_only);
        assert_eq!(edges[1].options.label.as_deref(), Some("state"));
        assert_eq!(config.package_import_rules[0].name, "react-dom");
    }

    #[test]
    fn reports_json_syntax_errors() {
        let err = load_str("{ not json", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn surfaces_validation_errors() {
        let err = load_str(r#"{ "appAlias": " " }"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(ConfigError::AppAlias)));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("structure.config.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("structure.config.json")),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("structure.config")),
            ConfigFormat::Json
        );
    }
}
