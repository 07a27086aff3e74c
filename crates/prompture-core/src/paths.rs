use crate::error::{PromptureError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

/// Name of the managed documentation root, relative to the project root.
pub const AI_DOCS_DIR: &str = "ai-docs";

// The remaining constants are relative to the ai-docs directory.
pub const REQUIREMENTS_DIR: &str = "requirements";
pub const TECHNICAL_DIR: &str = "technical";
pub const FIXES_DIR: &str = "technical/fixes";
pub const CONTEXT_DIR: &str = "context";
pub const SUMMARIES_DIR: &str = "context/summaries";
pub const RECENT_SUMMARIES_DIR: &str = "context/summaries/recent-summaries";
pub const ARCHIVED_SUMMARIES_DIR: &str = "context/summaries/archived-summaries";

pub const ACTIVE_CONTEXT_FILE: &str = "context/active-context.md";
pub const CONFIG_FILE: &str = "config.yaml";

/// The taxonomy every command except `init` requires.
pub const TREE_DIRS: [&str; 6] = [
    REQUIREMENTS_DIR,
    TECHNICAL_DIR,
    FIXES_DIR,
    CONTEXT_DIR,
    RECENT_SUMMARIES_DIR,
    ARCHIVED_SUMMARIES_DIR,
];

/// Loose files at the ai-docs root that are never reorganized.
pub const PROTECTED_FILES: [&str; 3] = ["README.md", "START-HERE.md", "GLOSSARY.md"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn ai_docs_dir(root: &Path) -> PathBuf {
    root.join(AI_DOCS_DIR)
}

pub fn active_context_path(docs: &Path) -> PathBuf {
    docs.join(ACTIVE_CONTEXT_FILE)
}

pub fn recent_summaries_dir(docs: &Path) -> PathBuf {
    docs.join(RECENT_SUMMARIES_DIR)
}

pub fn archived_summaries_dir(docs: &Path) -> PathBuf {
    docs.join(ARCHIVED_SUMMARIES_DIR)
}

pub fn config_path(docs: &Path) -> PathBuf {
    docs.join(CONFIG_FILE)
}

pub fn is_protected(file_name: &str) -> bool {
    PROTECTED_FILES.contains(&file_name)
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// Fail unless the ai-docs root exists.
pub fn require_docs_root(docs: &Path) -> Result<()> {
    if !docs.is_dir() {
        return Err(PromptureError::NotInitialized {
            missing: docs.to_path_buf(),
        });
    }
    Ok(())
}

/// Fail unless the ai-docs root and its whole taxonomy exist.
pub fn require_tree(docs: &Path) -> Result<()> {
    require_docs_root(docs)?;
    for dir in TREE_DIRS {
        let p = docs.join(dir);
        if !p.is_dir() {
            return Err(PromptureError::NotInitialized { missing: p });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
