//! Validated data model for dependency flows.
//!
//! Values of these types are only produced by [`crate::validate`] (or built
//! directly in tests); nothing here re-checks the invariants the validator
//! already enforced.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;

/// Optional annotations attached to a [`FlowEdge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeOptions {
    /// Short label drawn on the diagram arrow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-text description. Used as the diagram label when `label` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The edge is only usable by its own `from` folder and is never
    /// followed transitively.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub self_only: bool,
}

impl EdgeOptions {
    /// Returns `true` if no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.description.is_none() && !self.self_only
    }

    /// The text to draw on the diagram arrow, if any.
    #[must_use]
    pub fn diagram_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or(self.description.as_deref())
            .filter(|l| !l.trim().is_empty())
    }
}

/// A directed "may import from" edge between two folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    /// Importing folder.
    pub from: String,
    /// Folder being imported.
    pub to: String,
    /// Edge annotations.
    pub options: EdgeOptions,
}

impl FlowEdge {
    /// Creates an edge without options.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            options: EdgeOptions::default(),
        }
    }

    /// Marks the edge as `selfOnly`.
    #[must_use]
    pub fn self_only(mut self) -> Self {
        self.options.self_only = true;
        self
    }

    /// Sets the diagram label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }
}

/// Serialized in the config's own tuple shape: `[from, to]` or
/// `[from, to, {options}]`.
impl Serialize for FlowEdge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.options.is_empty() { 2 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.from)?;
        seq.serialize_element(&self.to)?;
        if len == 3 {
            seq.serialize_element(&self.options)?;
        }
        seq.end()
    }
}

/// An ordered list of flow edges. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlowGraph(Vec<FlowEdge>);

impl FlowGraph {
    /// Creates a graph from edges.
    #[must_use]
    pub fn new(edges: Vec<FlowEdge>) -> Self {
        Self(edges)
    }

    /// Returns the edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[FlowEdge] {
        &self.0
    }

    /// Returns `true` if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every folder named by an edge endpoint.
    #[must_use]
    pub fn folders(&self) -> FolderSet {
        crate::flow::extract_folders(self)
    }

    /// Folders that `root` must not import from.
    #[must_use]
    pub fn disallowed_imports(&self, folders: &FolderSet, root: &str) -> Vec<String> {
        crate::flow::disallowed_imports(self, folders, root)
    }

    /// Edges sorted by `(from, to)`, keeping insertion order for ties.
    ///
    /// Used wherever a representation must not depend on edge order.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<&FlowEdge> {
        let mut edges: Vec<&FlowEdge> = self.0.iter().collect();
        edges.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));
        edges
    }
}

impl FromIterator<FlowEdge> for FlowGraph {
    fn from_iter<I: IntoIterator<Item = FlowEdge>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Distinct folder names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FolderSet {
    ordered: Vec<String>,
    #[serde(skip)]
    index: HashSet<String>,
}

impl FolderSet {
    /// Adds a folder; returns `false` if it was already present.
    pub fn insert(&mut self, folder: &str) -> bool {
        if self.index.contains(folder) {
            return false;
        }
        self.index.insert(folder.to_string());
        self.ordered.push(folder.to_string());
        true
    }

    /// Returns `true` if the folder is a member.
    #[must_use]
    pub fn contains(&self, folder: &str) -> bool {
        self.index.contains(folder)
    }

    /// Iterates folders in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns `true` if there are no folders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Folders as a slice, in first-seen order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }
}

/// Restricts a package to a subset of folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageImportRule {
    /// Package specifier, e.g. `"react-dom"`.
    pub name: String,
    /// Named exports the restriction is limited to. `None` means the whole
    /// package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_names: Option<Vec<String>>,
    /// Folders that may import the package. Never empty.
    pub allowed_in_folders: Vec<String>,
}

impl PackageImportRule {
    /// Returns `true` if `folder` may import this package.
    #[must_use]
    pub fn allows(&self, folder: &str) -> bool {
        self.allowed_in_folders.iter().any(|f| f == folder)
    }
}

/// Where the rendered diagram is spliced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsOptions {
    /// Target file, relative to the project root.
    pub file: PathBuf,
    /// Marker name; the file must contain `<!-- TAG:START -->` and
    /// `<!-- TAG:END -->`.
    pub marker_tag: String,
    /// Text placed below the diagram. A built-in explanation is used when
    /// unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// How source modules are laid out inside a folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleLayout {
    /// Each module is a sub-folder (`components/Button/index.tsx`).
    #[default]
    Folder,
    /// Modules are files directly inside the layer folder.
    Flat,
}

impl ModuleLayout {
    /// Glob rejecting relative imports that climb out of the module.
    #[must_use]
    pub fn upward_import_glob(self) -> &'static str {
        match self {
            Self::Folder => "../*/**",
            Self::Flat => "../**",
        }
    }
}

impl fmt::Display for ModuleLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// A fully validated `structure.config`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureConfig {
    /// Import alias of the source root, e.g. `"~app"`.
    pub app_alias: String,
    /// The dependency flow.
    pub dependency_flow: FlowGraph,
    /// Docs patching target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsOptions>,
    /// Lint-file globs, each containing `{folder}`.
    pub lint_files: Vec<String>,
    /// Module layout inside each folder.
    pub module_layout: ModuleLayout,
    /// Extra linter rules per folder.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub override_rules: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
    /// Package restrictions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_import_rules: Vec<PackageImportRule>,
}

impl StructureConfig {
    /// Every folder named in the dependency flow.
    #[must_use]
    pub fn folders(&self) -> FolderSet {
        self.dependency_flow.folders()
    }
}
