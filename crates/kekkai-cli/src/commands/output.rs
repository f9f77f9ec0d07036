//! Shared output formatting for generated rules.

use anyhow::Result;
use kekkai_core::{eslint, FolderRules};

use crate::OutputFormat;

/// Render folder rules in the specified format.
pub fn render(folder_rules: &[FolderRules], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(folder_rules)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(folder_rules)?),
        OutputFormat::Eslint => Ok(serde_json::to_string_pretty(&eslint::flat_config(
            folder_rules,
        ))?),
    }
}

/// One `folder: a, b` line per folder, padded to the longest name.
pub fn disallowed_lines(folder_rules: &[FolderRules]) -> Vec<String> {
    let width = folder_rules
        .iter()
        .map(|r| r.folder.len())
        .max()
        .unwrap_or(0);

    folder_rules
        .iter()
        .map(|r| {
            let disallowed = if r.disallowed.is_empty() {
                "(none)".to_string()
            } else {
                r.disallowed.join(", ")
            };
            format!("{:<width$}  ✗ {}", r.folder, disallowed)
        })
        .collect()
}

fn render_text(folder_rules: &[FolderRules]) -> String {
    let mut out = Vec::new();

    for rules in folder_rules {
        out.push(format!("{} ({})", rules.folder, rules.files.join(", ")));
        for pattern in &rules.rules.patterns {
            out.push(format!("  deny {}", pattern.group.join(" ")));
            out.push(format!("    {}", pattern.message));
        }
        for path in &rules.rules.paths {
            match &path.import_names {
                Some(names) => {
                    out.push(format!("  deny {} {{ {} }}", path.name, names.join(", ")));
                }
                None => out.push(format!("  deny {}", path.name)),
            }
        }
        if !rules.overrides.is_empty() {
            let names: Vec<&str> = rules.overrides.keys().map(String::as_str).collect();
            out.push(format!("  overrides: {}", names.join(", ")));
        }
        out.push(String::new());
    }

    out.join("\n").trim_end().to_string()
}
