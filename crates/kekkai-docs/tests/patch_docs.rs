//! Integration test: patching a README between markers.

use std::path::PathBuf;

use kekkai_core::{DocsOptions, FlowEdge, FlowGraph};
use kekkai_docs::{CacheStatus, CacheStore, DirCache, DocsError, DocsPatcher, Formatter, CACHE_KEY};
use tempfile::TempDir;

const README: &str = concat!(
    "# Project\n\nIntro.\n\n",
    "<!-- DEPENDENCY_FLOW:START -->\nstale\n<!-- DEPENDENCY_FLOW:END -->\n",
    "\n## License\n",
);

fn docs() -> DocsOptions {
    DocsOptions {
        file: PathBuf::from("README.md"),
        marker_tag: "DEPENDENCY_FLOW".to_string(),
        content: Some("Arrows point downstream.".to_string()),
    }
}

fn flow() -> FlowGraph {
    FlowGraph::new(vec![
        FlowEdge::new("pages", "layouts"),
        FlowEdge::new("layouts", "components"),
        FlowEdge::new("hooks", "contexts").self_only().label("Only Context"),
    ])
}

fn project(readme: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("README.md"), readme).unwrap();
    tmp
}

fn read(tmp: &TempDir) -> String {
    std::fs::read_to_string(tmp.path().join("README.md")).unwrap()
}

#[test]
fn patch_replaces_only_the_marked_region() {
    let tmp = project(README);
    DocsPatcher::new(tmp.path()).patch(&flow(), &docs()).unwrap();

    let text = read(&tmp);
    assert!(text.starts_with(
        "# Project\n\nIntro.\n\n<!-- DEPENDENCY_FLOW:START -->\n```mermaid\n"
    ));
    assert!(text.ends_with(
        "Arrows point downstream.\n<!-- DEPENDENCY_FLOW:END -->\n\n## License\n"
    ));
    assert!(text.contains("  hooks -- Only Context --> contexts\n"));
    assert!(!text.contains("stale"));
}

#[test]
fn repeated_patches_are_idempotent() {
    let tmp = project(README);
    let patcher = DocsPatcher::new(tmp.path());

    let first = patcher.patch(&flow(), &docs()).unwrap();
    let after_first = read(&tmp);
    let second = patcher.patch(&flow(), &docs()).unwrap();

    assert!(first.written);
    assert!(!second.written);
    assert_eq!(read(&tmp), after_first);
    assert_eq!(first.hash, second.hash);
}

#[test]
fn marker_whitespace_is_preserved() {
    let tmp = project("<!--DEPENDENCY_FLOW:START-->\n<!--  DEPENDENCY_FLOW:END  -->\n");
    DocsPatcher::new(tmp.path()).patch(&flow(), &docs()).unwrap();

    let text = read(&tmp);
    assert!(text.starts_with("<!--DEPENDENCY_FLOW:START-->\n"));
    assert!(text.ends_with("<!--  DEPENDENCY_FLOW:END  -->\n"));
}

#[test]
fn missing_marker_leaves_file_untouched() {
    let original = "# Project\n\n<!-- DEPENDENCY_FLOW:START -->\n";
    let tmp = project(original);

    let err = DocsPatcher::new(tmp.path())
        .patch(&flow(), &docs())
        .unwrap_err();

    assert!(matches!(err, DocsError::MissingEndMarker { .. }));
    assert_eq!(read(&tmp), original);
}

#[test]
fn reversed_markers_leave_file_untouched() {
    let original = "<!-- DEPENDENCY_FLOW:END -->\n<!-- DEPENDENCY_FLOW:START -->\n";
    let tmp = project(original);

    let err = DocsPatcher::new(tmp.path())
        .patch(&flow(), &docs())
        .unwrap_err();

    assert!(matches!(err, DocsError::MarkersOutOfOrder { .. }));
    assert_eq!(read(&tmp), original);
}

#[test]
fn failing_formatter_does_not_fail_the_patch() {
    let tmp = project(README);
    let report = DocsPatcher::new(tmp.path())
        .formatter(Formatter::new("kekkai-no-such-formatter", ["--write"]))
        .patch(&flow(), &docs())
        .unwrap();

    assert!(report.written);
    assert!(!report.formatted);
    assert!(read(&tmp).contains("```mermaid"));
}

#[cfg(unix)]
#[test]
fn formatter_runs_only_after_a_write() {
    let tmp = project(README);
    let log = tmp.path().join("format.log");
    let script = format!("echo \"$1\" >> {}", log.display());
    let patcher = DocsPatcher::new(tmp.path())
        .formatter(Formatter::new("sh", ["-c", script.as_str(), "sh"]));

    let first = patcher.patch(&flow(), &docs()).unwrap();
    let second = patcher.patch(&flow(), &docs()).unwrap();

    assert!(first.formatted);
    assert!(!second.formatted);
    assert_eq!(std::fs::read_to_string(&log).unwrap().lines().count(), 1);
}

#[test]
fn cache_reports_unchanged_until_flow_changes() {
    let tmp = project(README);
    let cache_dir = tmp.path().join("node_modules/.cache/kekkai");
    let patcher = DocsPatcher::new(tmp.path()).cache(DirCache::new(&cache_dir));

    let first = patcher.patch(&flow(), &docs()).unwrap();
    assert_eq!(first.cache, CacheStatus::Updated);
    assert_eq!(
        DirCache::new(&cache_dir).get(CACHE_KEY).as_deref(),
        Some(first.hash.as_str())
    );

    let second = patcher.patch(&flow(), &docs()).unwrap();
    assert_eq!(second.cache, CacheStatus::Unchanged);

    let mut edges = flow().edges().to_vec();
    edges.push(FlowEdge::new("components", "utils"));
    let third = patcher.patch(&FlowGraph::new(edges), &docs()).unwrap();
    assert!(third.written);
    assert_eq!(third.cache, CacheStatus::Updated);
    assert_ne!(third.hash, first.hash);
}

#[test]
fn corrupt_cache_entry_is_a_miss() {
    let tmp = project(README);
    let cache_dir = tmp.path().join("cache");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join(CACHE_KEY), "not a hash").unwrap();

    let report = DocsPatcher::new(tmp.path())
        .cache(DirCache::new(&cache_dir))
        .patch(&flow(), &docs())
        .unwrap();

    assert_eq!(report.cache, CacheStatus::Updated);
}
