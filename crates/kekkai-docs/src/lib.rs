//! # kekkai-docs
//!
//! Renders a dependency flow as a Mermaid flowchart and splices it into a
//! documentation file between two marker comments:
//!
//! ```text
//! <!-- DEPENDENCY_FLOW:START -->
//! ...owned by kekkai, overwritten on every patch...
//! <!-- DEPENDENCY_FLOW:END -->
//! ```
//!
//! - [`render_mermaid`] renders the diagram block
//! - [`Markers`] locates the marker pair
//! - [`DocsPatcher`] performs the read-splice-write, runs the optional
//!   [`Formatter`] and records a content hash in a [`CacheStore`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod format;
pub mod marker;
pub mod mermaid;
pub mod patch;

pub use cache::{flow_hash, CacheStatus, CacheStore, DirCache, CACHE_KEY, DEFAULT_CACHE_DIR};
pub use format::{FormatError, Formatter};
pub use marker::Markers;
pub use mermaid::{render_mermaid, DEFAULT_CONTENT};
pub use patch::{DocsError, DocsPatcher, PatchReport};
