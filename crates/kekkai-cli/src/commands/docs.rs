//! Docs command implementation.

use anyhow::{Context, Result};
use kekkai_docs::{CacheStatus, DirCache, DocsPatcher, Formatter, DEFAULT_CACHE_DIR};
use std::path::Path;

/// Runs the docs command.
pub fn run(
    project_dir: &Path,
    config_path: Option<&Path>,
    format: bool,
    cache_dir: Option<&Path>,
) -> Result<()> {
    let config = crate::config_resolver::load(project_dir, config_path)?;
    let Some(docs) = &config.docs else {
        tracing::info!("No `docs` section in config; nothing to patch");
        return Ok(());
    };

    let cache_dir =
        cache_dir.map_or_else(|| project_dir.join(DEFAULT_CACHE_DIR), Path::to_path_buf);
    let mut patcher = DocsPatcher::new(project_dir).cache(DirCache::new(cache_dir));
    if format {
        patcher = patcher.formatter(Formatter::prettier().working_dir(project_dir));
    }

    let report = patcher
        .patch(&config.dependency_flow, docs)
        .with_context(|| format!("Failed to patch {}", docs.file.display()))?;

    let state = if report.written {
        "updated"
    } else {
        "already up to date"
    };
    let flow = match report.cache {
        CacheStatus::Unchanged => "flow unchanged",
        CacheStatus::Updated => "flow changed",
        CacheStatus::Disabled | CacheStatus::WriteFailed => "flow hash not cached",
    };
    println!("{} {state} ({flow})", report.path.display());

    Ok(())
}
