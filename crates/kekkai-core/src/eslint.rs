//! ESLint flat-config emission.

use serde_json::{json, Map, Value};

use crate::rules::FolderRules;

/// Rule name the generated restrictions are attached to.
pub const RESTRICTED_IMPORTS_RULE: &str = "no-restricted-imports";

/// One flat-config object for a folder.
///
/// `overrideRules` entries come first; `no-restricted-imports` is always
/// written last and replaces any override of the same name.
#[must_use]
pub fn config_object(folder: &FolderRules) -> Value {
    let mut options = Map::new();
    options.insert("patterns".into(), json!(folder.rules.patterns));
    if !folder.rules.paths.is_empty() {
        options.insert("paths".into(), json!(folder.rules.paths));
    }

    let mut rules = folder.overrides.clone();
    if rules.remove(RESTRICTED_IMPORTS_RULE).is_some() {
        tracing::warn!(
            folder = %folder.folder,
            "overrideRules.{RESTRICTED_IMPORTS_RULE} is replaced by the generated rule"
        );
    }
    rules.insert(
        RESTRICTED_IMPORTS_RULE.into(),
        json!(["error", Value::Object(options)]),
    );

    json!({
        "files": folder.files,
        "rules": Value::Object(rules),
    })
}

/// The full flat-config array, one object per folder.
#[must_use]
pub fn flat_config(folders: &[FolderRules]) -> Value {
    Value::Array(folders.iter().map(config_object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_str, ConfigFormat};
    use crate::rules::build_folder_rules;

    const CONFIG: &str = r#"{
        "appAlias": "~app",
        "dependencyFlow": [["pages", "hooks"], ["hooks", "utils"]],
        "lintFiles": "src/{folder}/**/*.ts",
        "overrideRules": {
            "pages": { "no-console": "off", "no-restricted-imports": "off" }
        },
        "packageImportRules": [{ "name": "react-dom", "allowedInFolders": ["pages"] }]
    }"#;

    fn config() -> Value {
        let config = load_str(CONFIG, ConfigFormat::Json).unwrap();
        flat_config(&build_folder_rules(&config))
    }

    #[test]
    fn emits_one_object_per_folder() {
        let config = config();
        let objects = config.as_array().unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[0]["files"], json!(["src/pages/**/*.ts"]));
        assert_eq!(objects[2]["files"], json!(["src/utils/**/*.ts"]));
    }

    #[test]
    fn overrides_cannot_replace_generated_rule() {
        let config = config();
        let rules = config[0]["rules"].as_object().unwrap();
        assert_eq!(rules["no-console"], json!("off"));
        assert_eq!(rules[RESTRICTED_IMPORTS_RULE][0], json!("error"));
        assert_eq!(rules.keys().last().map(String::as_str), Some(RESTRICTED_IMPORTS_RULE));
    }

    #[test]
    fn paths_are_omitted_when_empty() {
        let config = config();
        let pages = &config[0]["rules"][RESTRICTED_IMPORTS_RULE][1];
        assert!(pages.get("paths").is_none());

        let hooks = &config[1]["rules"][RESTRICTED_IMPORTS_RULE][1];
        assert_eq!(hooks["paths"][0]["name"], json!("react-dom"));
        assert!(hooks["paths"][0].get("importNames").is_none());
    }

    #[test]
    fn disallowed_folders_become_alias_globs() {
        let config = config();
        let utils = &config[2]["rules"][RESTRICTED_IMPORTS_RULE][1]["patterns"];
        assert_eq!(utils[3]["group"], json!(["~app/pages/**", "~app/hooks/**"]));
    }
}
