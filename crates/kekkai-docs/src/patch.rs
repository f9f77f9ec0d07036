//! Read-splice-write of the docs file.

use std::path::{Path, PathBuf};

use kekkai_core::{DocsOptions, FlowGraph};
use thiserror::Error;

use crate::cache::{self, CacheStatus, CacheStore};
use crate::format::Formatter;
use crate::marker::Markers;
use crate::mermaid::{render_mermaid, DEFAULT_CONTENT};

/// Errors that stop a patch. None of them leave a partial write behind.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The docs file could not be read.
    #[error("docs file not found or unreadable: {path}")]
    MissingFile {
        /// Resolved file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// No start marker in the file.
    #[error("start marker `{marker}` not found")]
    MissingStartMarker {
        /// Expected marker text.
        marker: String,
    },

    /// No end marker after the start marker.
    #[error("end marker `{marker}` not found")]
    MissingEndMarker {
        /// Expected marker text.
        marker: String,
    },

    /// The end marker only appears before the start marker.
    #[error("end marker `{marker}` appears before the start marker")]
    MarkersOutOfOrder {
        /// Expected marker text.
        marker: String,
    },

    /// The marker tag produced an unusable pattern.
    #[error("invalid marker tag: {0}")]
    MarkerPattern(#[from] regex::Error),

    /// The flow could not be serialized for hashing.
    #[error("failed to hash dependency flow: {0}")]
    Hash(#[from] serde_json::Error),

    /// Writing the patched file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Resolved file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// What a successful patch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Resolved docs file path.
    pub path: PathBuf,
    /// The file content changed and was written.
    pub written: bool,
    /// The formatter ran and succeeded.
    pub formatted: bool,
    /// Hash of the sorted edge list.
    pub hash: String,
    /// Cache outcome for `hash`.
    pub cache: CacheStatus,
}

/// Splices the rendered flow into a docs file.
///
/// ```no_run
/// use kekkai_core::{DocsOptions, FlowGraph};
/// use kekkai_docs::{DirCache, DocsError, DocsPatcher, Formatter};
///
/// # fn run(flow: &FlowGraph, docs: &DocsOptions) -> Result<(), DocsError> {
/// let report = DocsPatcher::new(".")
///     .formatter(Formatter::prettier())
///     .cache(DirCache::new("node_modules/.cache/kekkai"))
///     .patch(flow, docs)?;
/// println!("written: {}", report.written);
/// # Ok(())
/// # }
/// ```
pub struct DocsPatcher {
    root: PathBuf,
    formatter: Option<Formatter>,
    cache: Option<Box<dyn CacheStore>>,
}

impl DocsPatcher {
    /// A patcher resolving `docs.file` against `root`, with no formatter and
    /// no cache.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            formatter: None,
            cache: None,
        }
    }

    /// Runs `formatter` on the file after each write.
    #[must_use]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Records the flow hash in `cache`.
    #[must_use]
    pub fn cache(mut self, cache: impl CacheStore + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replaces the text between the markers with the rendered flow and the
    /// docs content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, either marker is missing
    /// or out of order, or the write fails. Formatter and cache failures are
    /// logged and do not fail the patch.
    pub fn patch(&self, flow: &FlowGraph, docs: &DocsOptions) -> Result<PatchReport, DocsError> {
        let path = self.root.join(&docs.file);
        let markers = Markers::new(&docs.marker_tag)?;

        let current = std::fs::read_to_string(&path).map_err(|source| DocsError::MissingFile {
            path: path.clone(),
            source,
        })?;

        let body = format!(
            "{}\n{}",
            render_mermaid(flow),
            docs.content.as_deref().unwrap_or(DEFAULT_CONTENT)
        );
        let patched = markers.splice(&current, &body)?;

        let written = patched != current;
        if written {
            std::fs::write(&path, &patched).map_err(|source| DocsError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Updated dependency flow in {}", path.display());
        } else {
            tracing::debug!("{} already up to date", path.display());
        }

        let formatted = written && self.run_formatter(&path);

        let hash = cache::flow_hash(flow)?;
        let cache = self
            .cache
            .as_deref()
            .map_or(CacheStatus::Disabled, |store| cache::record(store, &hash));

        Ok(PatchReport {
            path,
            written,
            formatted,
            hash,
            cache,
        })
    }

    fn run_formatter(&self, path: &Path) -> bool {
        let Some(formatter) = &self.formatter else {
            return false;
        };
        // The formatter may run from another directory; hand it an absolute path.
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        match formatter.run(&target) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Formatting {} skipped: {e}", path.display());
                false
            }
        }
    }
}
