//! Folder extraction and reachability over a dependency flow.
//!
//! A folder may import from every folder reachable through non-`selfOnly`
//! edges. A `selfOnly` edge is honored only when its `from` endpoint is the
//! folder being queried; it grants the direct target and nothing behind it.

use std::collections::HashSet;

use crate::model::{FlowGraph, FolderSet};

/// Collects every edge endpoint, first-seen order, duplicates collapsed.
#[must_use]
pub fn extract_folders(flow: &FlowGraph) -> FolderSet {
    let mut folders = FolderSet::default();
    for edge in flow.edges() {
        folders.insert(&edge.from);
        folders.insert(&edge.to);
    }
    folders
}

/// Folders in `folders` that `root` may not import from.
///
/// The result keeps the order of `folders` and never contains `root`.
/// Cycles are fine: each folder is expanded at most once per call.
#[must_use]
pub fn disallowed_imports(flow: &FlowGraph, folders: &FolderSet, root: &str) -> Vec<String> {
    let allowed = allowed_imports(flow, root);
    let disallowed: Vec<String> = folders
        .iter()
        .filter(|f| *f != root && !allowed.contains(*f))
        .map(str::to_string)
        .collect();

    tracing::debug!(
        folder = root,
        allowed = allowed.len(),
        disallowed = disallowed.len(),
        "resolved folder reachability"
    );

    disallowed
}

/// Folders `root` may import from, excluding `root` unless a cycle leads back.
fn allowed_imports<'a>(flow: &'a FlowGraph, root: &'a str) -> HashSet<&'a str> {
    let mut allowed: HashSet<&str> = HashSet::new();
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut pending: Vec<&str> = Vec::new();

    // First hop: every edge out of the root counts, selfOnly included.
    for edge in flow.edges().iter().filter(|e| e.from == root) {
        allowed.insert(&edge.to);
        if !edge.options.self_only {
            pending.push(&edge.to);
        }
    }

    // The root's own edges were handled above.
    expanded.insert(root);

    while let Some(folder) = pending.pop() {
        if !expanded.insert(folder) {
            continue;
        }
        for edge in flow.edges().iter().filter(|e| e.from == folder) {
            if edge.options.self_only {
                continue;
            }
            allowed.insert(&edge.to);
            pending.push(&edge.to);
        }
    }

    allowed
}
