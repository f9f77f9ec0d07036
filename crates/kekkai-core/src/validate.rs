//! Validation of an untyped configuration value into a [`StructureConfig`].
//!
//! Checks run in a fixed order and stop at the first violation. Nothing is
//! mutated and nothing is read from disk here; see [`crate::loader`] for that.

use std::collections::BTreeMap;
use std::path::PathBuf;

use miette::Diagnostic;
use serde_json::{Map, Value};

use crate::model::{
    DocsOptions, EdgeOptions, FlowEdge, FlowGraph, FolderSet, ModuleLayout, PackageImportRule,
    StructureConfig,
};

/// Placeholder every `lintFiles` entry must contain.
pub const FOLDER_PLACEHOLDER: &str = "{folder}";

/// A configuration value that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// The top-level value is not an object.
    #[error("configuration must be a JSON object")]
    #[diagnostic(code(kekkai::config::root))]
    NotAnObject,

    /// `appAlias` is missing, not a string, or blank.
    #[error("appAlias is required and must be a non-empty string")]
    #[diagnostic(code(kekkai::config::app_alias), help("e.g. \"appAlias\": \"~app\""))]
    AppAlias,

    /// `dependencyFlow` is missing or not an array.
    #[error("dependencyFlow must be an array")]
    #[diagnostic(code(kekkai::config::dependency_flow))]
    FlowNotArray,

    /// A flow element is not a `[from, to, options?]` tuple.
    #[error("dependencyFlow[{index}] must be a tuple [from, to, options?]")]
    #[diagnostic(code(kekkai::config::dependency_flow))]
    EdgeNotTuple {
        /// Position in `dependencyFlow`.
        index: usize,
    },

    /// One of the first two tuple elements is not a non-empty string.
    #[error("dependencyFlow[{index}][{position}] must be a non-empty string")]
    #[diagnostic(code(kekkai::config::dependency_flow))]
    EdgeEndpoint {
        /// Position in `dependencyFlow`.
        index: usize,
        /// 0 for `from`, 1 for `to`.
        position: usize,
    },

    /// The third tuple element is present but not an object.
    #[error("dependencyFlow[{index}][2] must be an options object if provided")]
    #[diagnostic(code(kekkai::config::dependency_flow))]
    EdgeOptionsNotObject {
        /// Position in `dependencyFlow`.
        index: usize,
    },

    /// A known edge option has the wrong type.
    #[error("dependencyFlow[{index}][2].{key} must be a {expected}")]
    #[diagnostic(code(kekkai::config::dependency_flow))]
    EdgeOptionType {
        /// Position in `dependencyFlow`.
        index: usize,
        /// Option key.
        key: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// `docs` is present but `file` or `markerTag` is missing or blank.
    #[error("docs.{field} is required and must be a non-empty string when docs is provided")]
    #[diagnostic(code(kekkai::config::docs))]
    DocsField {
        /// Offending field.
        field: &'static str,
    },

    /// `docs.content` is present but not a string.
    #[error("docs.content must be a string")]
    #[diagnostic(code(kekkai::config::docs))]
    DocsContent,

    /// `overrideRules` is present but not an object.
    #[error("overrideRules must be an object keyed by folder")]
    #[diagnostic(code(kekkai::config::override_rules))]
    OverrideRulesNotObject,

    /// An `overrideRules` key is not a folder of the dependency flow.
    #[error("overrideRules.{folder} is not a folder of dependencyFlow")]
    #[diagnostic(
        code(kekkai::config::override_rules),
        help("override keys must appear as an endpoint in dependencyFlow")
    )]
    OverrideUnknownFolder {
        /// The unknown key.
        folder: String,
    },

    /// An `overrideRules` value is not an object.
    #[error("overrideRules.{folder} must be an object")]
    #[diagnostic(code(kekkai::config::override_rules))]
    OverrideNotObject {
        /// The folder whose value is wrong.
        folder: String,
    },

    /// `packageImportRules` is present but not an array.
    #[error("packageImportRules must be an array")]
    #[diagnostic(code(kekkai::config::package_import_rules))]
    PackageRulesNotArray,

    /// A package rule has no usable `name`.
    #[error("packageImportRules[{index}].name must be a non-empty string")]
    #[diagnostic(code(kekkai::config::package_import_rules))]
    PackageName {
        /// Position in `packageImportRules`.
        index: usize,
    },

    /// `importNames` is not an array of non-empty strings.
    #[error("packageImportRules[{index}].importNames must be an array of non-empty strings")]
    #[diagnostic(code(kekkai::config::package_import_rules))]
    PackageImportNames {
        /// Position in `packageImportRules`.
        index: usize,
    },

    /// `allowedInFolders` is missing, not an array, or empty.
    #[error("packageImportRules[{index}].allowedInFolders must be a non-empty array")]
    #[diagnostic(code(kekkai::config::package_import_rules))]
    PackageAllowedFolders {
        /// Position in `packageImportRules`.
        index: usize,
    },

    /// `allowedInFolders` names a folder outside the dependency flow.
    #[error("packageImportRules[{index}].allowedInFolders contains unknown folder {folder}")]
    #[diagnostic(
        code(kekkai::config::package_import_rules),
        help("allowed folders must appear as an endpoint in dependencyFlow")
    )]
    PackageUnknownFolder {
        /// Position in `packageImportRules`.
        index: usize,
        /// The offending entry, rendered as JSON.
        folder: String,
    },

    /// `lintFiles` is neither a string nor an array of strings.
    #[error("lintFiles must be a string or an array of strings")]
    #[diagnostic(code(kekkai::config::lint_files))]
    LintFilesType,

    /// `lintFiles` is an empty array.
    #[error("lintFiles must not be empty")]
    #[diagnostic(code(kekkai::config::lint_files))]
    LintFilesEmpty,

    /// A `lintFiles` entry is blank or lacks the placeholder.
    #[error("lintFiles[{index}] must be a non-empty string containing {{folder}}")]
    #[diagnostic(code(kekkai::config::lint_files))]
    LintFilePlaceholder {
        /// Position in `lintFiles`.
        index: usize,
    },

    /// `moduleLayout` is not one of the known layouts.
    #[error("moduleLayout must be \"folder\" or \"flat\", got {value}")]
    #[diagnostic(code(kekkai::config::module_layout))]
    UnknownModuleLayout {
        /// The offending value, rendered as JSON.
        value: String,
    },
}

/// Validates a raw configuration value.
///
/// `dependencyFlowchart` is accepted in place of `dependencyFlow`.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found.
pub fn validate(raw: &Value) -> Result<StructureConfig, ConfigError> {
    let raw = raw.as_object().ok_or(ConfigError::NotAnObject)?;

    let app_alias = non_blank(raw.get("appAlias"))
        .ok_or(ConfigError::AppAlias)?
        .to_string();

    let flow_value =
        present(raw.get("dependencyFlow")).or_else(|| present(raw.get("dependencyFlowchart")));
    let dependency_flow = validate_flow(flow_value)?;
    let folders = dependency_flow.folders();

    let docs = present(raw.get("docs")).map(validate_docs).transpose()?;
    let override_rules = present(raw.get("overrideRules"))
        .map(|v| validate_overrides(v, &folders))
        .transpose()?
        .unwrap_or_default();
    let package_import_rules = present(raw.get("packageImportRules"))
        .map(|v| validate_package_rules(v, &folders))
        .transpose()?
        .unwrap_or_default();
    let lint_files = validate_lint_files(raw.get("lintFiles"))?;
    let module_layout = validate_module_layout(raw.get("moduleLayout"))?;

    tracing::debug!(
        folders = folders.len(),
        edges = dependency_flow.edges().len(),
        "configuration validated"
    );

    Ok(StructureConfig {
        app_alias,
        dependency_flow,
        docs,
        lint_files,
        module_layout,
        override_rules,
        package_import_rules,
    })
}

/// Treats JSON `null` the same as a missing key.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn validate_flow(value: Option<&Value>) -> Result<FlowGraph, ConfigError> {
    let items = value
        .and_then(Value::as_array)
        .ok_or(ConfigError::FlowNotArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_edge(index, item))
        .collect()
}

fn validate_edge(index: usize, item: &Value) -> Result<FlowEdge, ConfigError> {
    let tuple = item
        .as_array()
        .filter(|t| t.len() >= 2)
        .ok_or(ConfigError::EdgeNotTuple { index })?;

    let from = non_blank(tuple.first()).ok_or(ConfigError::EdgeEndpoint { index, position: 0 })?;
    let to = non_blank(tuple.get(1)).ok_or(ConfigError::EdgeEndpoint { index, position: 1 })?;

    let options = match present(tuple.get(2)) {
        None => EdgeOptions::default(),
        Some(Value::Object(map)) => validate_edge_options(index, map)?,
        Some(_) => return Err(ConfigError::EdgeOptionsNotObject { index }),
    };

    Ok(FlowEdge {
        from: from.to_string(),
        to: to.to_string(),
        options,
    })
}

fn validate_edge_options(
    index: usize,
    map: &Map<String, Value>,
) -> Result<EdgeOptions, ConfigError> {
    let text = |key: &'static str| -> Result<Option<String>, ConfigError> {
        match present(map.get(key)) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ConfigError::EdgeOptionType {
                index,
                key,
                expected: "string",
            }),
        }
    };

    let self_only = match present(map.get("selfOnly")) {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(ConfigError::EdgeOptionType {
                index,
                key: "selfOnly",
                expected: "boolean",
            })
        }
    };

    Ok(EdgeOptions {
        label: text("label")?,
        description: text("description")?,
        self_only,
    })
}

fn validate_docs(value: &Value) -> Result<DocsOptions, ConfigError> {
    let file = non_blank(value.get("file")).ok_or(ConfigError::DocsField { field: "file" })?;
    let marker_tag = non_blank(value.get("markerTag")).ok_or(ConfigError::DocsField {
        field: "markerTag",
    })?;

    let content = match present(value.get("content")) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(ConfigError::DocsContent),
    };

    Ok(DocsOptions {
        file: PathBuf::from(file),
        marker_tag: marker_tag.to_string(),
        content,
    })
}

fn validate_overrides(
    value: &Value,
    folders: &FolderSet,
) -> Result<BTreeMap<String, Map<String, Value>>, ConfigError> {
    let entries = value.as_object().ok_or(ConfigError::OverrideRulesNotObject)?;

    if let Some(folder) = entries.keys().find(|k| !folders.contains(k.as_str())) {
        return Err(ConfigError::OverrideUnknownFolder {
            folder: folder.clone(),
        });
    }

    let mut overrides = BTreeMap::new();
    for (folder, rules) in entries {
        match rules {
            Value::Null => {}
            Value::Object(map) => {
                overrides.insert(folder.clone(), map.clone());
            }
            _ => {
                return Err(ConfigError::OverrideNotObject {
                    folder: folder.clone(),
                })
            }
        }
    }
    Ok(overrides)
}

fn validate_package_rules(
    value: &Value,
    folders: &FolderSet,
) -> Result<Vec<PackageImportRule>, ConfigError> {
    let items = value.as_array().ok_or(ConfigError::PackageRulesNotArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, rule)| validate_package_rule(index, rule, folders))
        .collect()
}

fn validate_package_rule(
    index: usize,
    rule: &Value,
    folders: &FolderSet,
) -> Result<PackageImportRule, ConfigError> {
    let name = non_blank(rule.get("name")).ok_or(ConfigError::PackageName { index })?;

    let import_names = match present(rule.get("importNames")) {
        None => None,
        Some(Value::Array(names)) if names.is_empty() => None,
        Some(Value::Array(names)) => Some(
            names
                .iter()
                .map(|n| {
                    non_blank(Some(n))
                        .map(str::to_string)
                        .ok_or(ConfigError::PackageImportNames { index })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(_) => return Err(ConfigError::PackageImportNames { index }),
    };

    let allowed = rule
        .get("allowedInFolders")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or(ConfigError::PackageAllowedFolders { index })?;

    let allowed_in_folders = allowed
        .iter()
        .map(|f| match f.as_str() {
            Some(folder) if folders.contains(folder) => Ok(folder.to_string()),
            _ => Err(ConfigError::PackageUnknownFolder {
                index,
                folder: f.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PackageImportRule {
        name: name.to_string(),
        import_names,
        allowed_in_folders,
    })
}

fn validate_lint_files(value: Option<&Value>) -> Result<Vec<String>, ConfigError> {
    let patterns: Vec<&Value> = match value {
        Some(single) if single.is_string() => vec![single],
        Some(Value::Array(items)) => items.iter().collect(),
        _ => return Err(ConfigError::LintFilesType),
    };

    if patterns.is_empty() {
        return Err(ConfigError::LintFilesEmpty);
    }

    patterns
        .into_iter()
        .enumerate()
        .map(|(index, pattern)| {
            non_blank(Some(pattern))
                .filter(|p| p.contains(FOLDER_PLACEHOLDER))
                .map(str::to_string)
                .ok_or(ConfigError::LintFilePlaceholder { index })
        })
        .collect()
}

fn validate_module_layout(value: Option<&Value>) -> Result<ModuleLayout, ConfigError> {
    match present(value) {
        None => Ok(ModuleLayout::default()),
        Some(v) => match v.as_str() {
            Some("folder") => Ok(ModuleLayout::Folder),
            Some("flat") => Ok(ModuleLayout::Flat),
            _ => Err(ConfigError::UnknownModuleLayout {
                value: v.to_string(),
            }),
        },
    }
}
