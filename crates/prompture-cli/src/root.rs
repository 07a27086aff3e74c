use prompture_core::paths::AI_DOCS_DIR;
use std::path::{Path, PathBuf};

/// Resolve the project root (the directory that holds `ai-docs/`).
///
/// Priority:
/// 1. `--root` flag / `PROMPTURE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `ai-docs/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd)
}

fn find_root_from(start: &Path) -> PathBuf {
    nearest_ancestor_with(start, AI_DOCS_DIR)
        .or_else(|| nearest_ancestor_with(start, ".git"))
        .unwrap_or_else(|| start.to_path_buf())
}

fn nearest_ancestor_with(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}
