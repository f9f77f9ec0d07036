//! Content-hash cache for the rendered dependency flow.
//!
//! The hash tells callers whether the flow changed since the last patch. It
//! never gates a write: a missing or unreadable entry is simply a miss.

use std::io;
use std::path::{Path, PathBuf};

use kekkai_core::FlowGraph;
use sha2::{Digest, Sha256};

/// Key under which the flow hash is stored.
pub const CACHE_KEY: &str = "dependency-flowchart-hash";

/// Default cache directory, relative to the project root.
pub const DEFAULT_CACHE_DIR: &str = "node_modules/.cache/kekkai";

/// A small string key/value store.
pub trait CacheStore {
    /// Returns the stored value, or `None` on a miss or any read failure.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; callers treat it as non-fatal.
    fn put(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Outcome of recording the flow hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cache was configured.
    Disabled,
    /// The stored hash already matched.
    Unchanged,
    /// The hash was written (first run or the flow changed).
    Updated,
    /// The hash differed but could not be written.
    WriteFailed,
}

/// A [`CacheStore`] keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(file_name)
    }
}

impl CacheStore for DirCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value.trim().to_string()),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::debug!("Cache entry {} unreadable: {e}", path.display());
                }
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.entry_path(key), value)
    }
}

/// SHA-256 (lower hex) of the edge list sorted by `(from, to)`.
///
/// Independent of edge insertion order; any change to an endpoint or option
/// changes the hash.
///
/// # Errors
///
/// Returns the serializer error if the edge list cannot be written as JSON.
pub fn flow_hash(flow: &FlowGraph) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, &flow.sorted_edges())?;
    Ok(hex::encode(hasher.finalize()))
}

/// Stores `hash` under [`CACHE_KEY`] unless it is already there.
pub fn record(store: &dyn CacheStore, hash: &str) -> CacheStatus {
    if store.get(CACHE_KEY).as_deref() == Some(hash) {
        tracing::debug!("Dependency flow unchanged since last patch");
        return CacheStatus::Unchanged;
    }

    match store.put(CACHE_KEY, hash) {
        Ok(()) => CacheStatus::Updated,
        Err(e) => {
            tracing::warn!("Failed to update dependency flow cache: {e}");
            CacheStatus::WriteFailed
        }
    }
}
