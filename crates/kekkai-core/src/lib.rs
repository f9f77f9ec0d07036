//! # kekkai-core
//!
//! Derives folder-level import restrictions from a declarative
//! dependency-flow graph.
//!
//! A dependency flow is a list of `[from, to, options?]` edges stating which
//! folders (architectural layers) may import from which others. This crate
//! provides:
//!
//! - [`FlowGraph`] and friends, the validated data model
//! - [`validate`] for turning an untyped JSON value into a [`StructureConfig`]
//! - [`loader`] for reading `structure.config.json` / `.toml` from disk
//! - [`FlowGraph::folders`] and [`FlowGraph::disallowed_imports`], the
//!   reachability engine
//! - [`rules`] for assembling per-folder import restrictions
//! - [`eslint`] for emitting an ESLint flat-config array
//!
//! ## Example
//!
//! ```ignore
//! use kekkai_core::{loader, rules};
//!
//! let config = loader::load_file("structure.config.json".as_ref())?;
//! for folder in rules::build_folder_rules(&config) {
//!     println!("{}: {:?}", folder.folder, folder.disallowed);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod flow;
mod model;
mod validate;

pub mod eslint;
pub mod loader;
pub mod rules;

pub use flow::{disallowed_imports, extract_folders};
pub use model::{
    DocsOptions, EdgeOptions, FlowEdge, FlowGraph, FolderSet, ModuleLayout, PackageImportRule,
    StructureConfig,
};
pub use rules::{FolderRules, PathRestriction, PatternRestriction, RuleSet};
pub use validate::{validate, ConfigError, FOLDER_PLACEHOLDER};
