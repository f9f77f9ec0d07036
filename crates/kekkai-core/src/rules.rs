//! Per-folder import restrictions.
//!
//! A [`RuleSet`] is linter-agnostic: glob patterns and package paths, each
//! with a message. [`crate::eslint`] turns a list of [`FolderRules`] into
//! ESLint's `no-restricted-imports` shape.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{ModuleLayout, PackageImportRule, StructureConfig};
use crate::validate::FOLDER_PLACEHOLDER;

const REDUNDANT_SEGMENTS_MESSAGE: &str =
    "Redundant relative path segments (././, ./../) are not allowed. They bypass structural import rules.";

const UPWARD_IMPORT_MESSAGE: &str =
    "Do not import from upper-level directories. Use the project alias to follow the dependency flow.";

const SAME_LAYER_MESSAGE: &str =
    "Do not import modules from the same layer. Extract shared logic into a lower-level folder if needed.";

const FOLDER_FLOW_MESSAGE: &str =
    "This import violates the folder dependency rule. Only import from allowed lower-level folders.";

/// Groups of import globs rejected with one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRestriction {
    /// Import-specifier globs.
    pub group: Vec<String>,
    /// Message shown on violation.
    pub message: String,
}

impl PatternRestriction {
    fn new(group: Vec<String>, message: &str) -> Self {
        Self {
            group,
            message: message.to_string(),
        }
    }
}

/// A package (or some of its named exports) rejected in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRestriction {
    /// Package specifier.
    pub name: String,
    /// Named exports; `None` rejects the whole package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_names: Option<Vec<String>>,
    /// Message shown on violation.
    pub message: String,
}

impl PathRestriction {
    fn forbid(rule: &PackageImportRule) -> Self {
        let message = match &rule.import_names {
            Some(names) if !names.is_empty() => format!(
                "Do not import {} from \"{}\" in this layer.",
                names.join(", "),
                rule.name
            ),
            _ => format!("Do not import \"{}\" in this layer.", rule.name),
        };
        Self {
            name: rule.name.clone(),
            import_names: rule.import_names.clone().filter(|n| !n.is_empty()),
            message,
        }
    }

    /// Returns `true` if only specific named exports are rejected.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.import_names.is_some()
    }
}

/// Import restrictions for one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    /// Pattern-based restrictions.
    pub patterns: Vec<PatternRestriction>,
    /// Package-based restrictions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathRestriction>,
}

/// Everything generated for one folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderRules {
    /// The folder.
    pub folder: String,
    /// Lint-file globs with `{folder}` substituted.
    pub files: Vec<String>,
    /// Folders this folder may not import from.
    pub disallowed: Vec<String>,
    /// Import restrictions.
    pub rules: RuleSet,
    /// Extra linter rules from `overrideRules`.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub overrides: Map<String, Value>,
}

/// Builds the import restrictions for `folder`.
///
/// `disallowed` is the output of [`crate::disallowed_imports`] for the same
/// folder; no folder-flow pattern is emitted when it is empty.
#[must_use]
pub fn build_rules(
    folder: &str,
    disallowed: &[String],
    package_rules: &[PackageImportRule],
    app_alias: &str,
    layout: ModuleLayout,
) -> RuleSet {
    let mut patterns = vec![
        PatternRestriction::new(
            vec!["./../**".to_string(), "././**".to_string()],
            REDUNDANT_SEGMENTS_MESSAGE,
        ),
        PatternRestriction::new(
            vec![layout.upward_import_glob().to_string()],
            UPWARD_IMPORT_MESSAGE,
        ),
        PatternRestriction::new(vec![alias_glob(app_alias, folder)], SAME_LAYER_MESSAGE),
    ];

    if !disallowed.is_empty() {
        patterns.push(PatternRestriction::new(
            disallowed.iter().map(|f| alias_glob(app_alias, f)).collect(),
            FOLDER_FLOW_MESSAGE,
        ));
    }

    let paths = package_rules
        .iter()
        .filter(|rule| !rule.allows(folder))
        .map(PathRestriction::forbid)
        .collect();

    RuleSet { patterns, paths }
}

/// Builds [`FolderRules`] for every folder of the config, in folder order.
#[must_use]
pub fn build_folder_rules(config: &StructureConfig) -> Vec<FolderRules> {
    let folders = config.folders();

    folders
        .iter()
        .map(|folder| {
            let disallowed = config.dependency_flow.disallowed_imports(&folders, folder);
            let rules = build_rules(
                folder,
                &disallowed,
                &config.package_import_rules,
                &config.app_alias,
                config.module_layout,
            );
            FolderRules {
                folder: folder.to_string(),
                files: lint_files_for(folder, &config.lint_files),
                disallowed,
                rules,
                overrides: config
                    .override_rules
                    .get(folder)
                    .cloned()
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Substitutes `folder` into every lint-file pattern.
#[must_use]
pub fn lint_files_for(folder: &str, lint_files: &[String]) -> Vec<String> {
    lint_files
        .iter()
        .map(|pattern| pattern.replace(FOLDER_PLACEHOLDER, folder))
        .collect()
}

fn alias_glob(app_alias: &str, folder: &str) -> String {
    format!("{}/{folder}/**", app_alias.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react_dom() -> PackageImportRule {
        PackageImportRule {
            name: "react-dom".into(),
            import_names: None,
            allowed_in_folders: vec!["pages".into()],
        }
    }

    #[test]
    fn always_emits_structural_patterns() {
        let rules = build_rules("utils", &[], &[], "~app", ModuleLayout::Folder);
        assert_eq!(rules.patterns.len(), 3);
        assert_eq!(rules.patterns[0].group, ["./../**", "././**"]);
        assert_eq!(rules.patterns[1].group, ["../*/**"]);
        assert_eq!(rules.patterns[2].group, ["~app/utils/**"]);
        assert!(rules.paths.is_empty());
    }

    #[test]
    fn flat_layout_rejects_any_parent_import() {
        let rules = build_rules("utils", &[], &[], "~app", ModuleLayout::Flat);
        assert_eq!(rules.patterns[1].group, ["../**"]);
    }

    #[test]
    fn disallowed_folders_share_one_pattern() {
        let disallowed = vec!["pages".to_string(), "layouts".to_string()];
        let rules = build_rules("hooks", &disallowed, &[], "~app", ModuleLayout::Folder);
        assert_eq!(rules.patterns.len(), 4);
        assert_eq!(rules.patterns[3].group, ["~app/pages/**", "~app/layouts/**"]);
        assert_eq!(rules.patterns[3].message, FOLDER_FLOW_MESSAGE);
    }

    #[test]
    fn trailing_slash_in_alias_is_ignored() {
        let rules = build_rules("hooks", &[], &[], "@/", ModuleLayout::Folder);
        assert_eq!(rules.patterns[2].group, ["@/hooks/**"]);
    }

    #[test]
    fn package_rule_forbids_outside_allowed_folders() {
        let rules = build_rules("hooks", &[], &[react_dom()], "~app", ModuleLayout::Folder);
        assert_eq!(rules.paths.len(), 1);
        assert_eq!(rules.paths[0].name, "react-dom");
        assert!(!rules.paths[0].is_partial());
        assert_eq!(rules.paths[0].message, "Do not import \"react-dom\" in this layer.");
    }

    #[test]
    fn package_rule_allows_listed_folder() {
        let rules = build_rules("pages", &[], &[react_dom()], "~app", ModuleLayout::Folder);
        assert!(rules.paths.is_empty());
    }

    #[test]
    fn named_imports_get_a_specific_message() {
        let rule = PackageImportRule {
            name: "react".into(),
            import_names: Some(vec!["useContext".into(), "createContext".into()]),
            allowed_in_folders: vec!["contexts".into()],
        };
        let rules = build_rules("hooks", &[], &[rule], "~app", ModuleLayout::Folder);
        let path = &rules.paths[0];
        assert!(path.is_partial());
        assert_eq!(
            path.message,
            "Do not import useContext, createContext from \"react\" in this layer."
        );
    }

    #[test]
    fn lint_files_substitute_every_placeholder() {
        let files = lint_files_for(
            "components",
            &[
                "src/{folder}/**/*.ts".to_string(),
                "src/{folder}/**/*.tsx".to_string(),
            ],
        );
        assert_eq!(files, ["src/components/**/*.ts", "src/components/**/*.tsx"]);

        let files = lint_files_for("services", &["src/{folder}/**/{folder}.*.ts".to_string()]);
        assert_eq!(files, ["src/services/**/services.*.ts"]);
    }
}
