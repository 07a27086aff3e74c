use crate::confirm::Confirm;
use crate::error::{PromptureError, Result};
use crate::io;
use crate::paths;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Taxonomy directory a loose document belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Requirements,
    Context,
}

impl Category {
    pub fn dir(self) -> &'static str {
        match self {
            Category::Technical => paths::TECHNICAL_DIR,
            Category::Requirements => paths::REQUIREMENTS_DIR,
            Category::Context => paths::CONTEXT_DIR,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Decides where a document goes from its content. `None` leaves it in place.
pub trait Classify {
    fn classify(&self, content: &str) -> Option<Category>;
}

/// Ordered keyword rules; the first rule with any matching marker wins.
pub struct KeywordClassifier {
    rules: Vec<(Category, Vec<&'static str>)>,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<(Category, Vec<&'static str>)>) -> Self {
        Self { rules }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(vec![
            (Category::Technical, vec!["## Technical", "## Architecture"]),
            (Category::Requirements, vec!["## Requirements", "## Features"]),
            (Category::Context, vec!["## Context", "## Summary"]),
        ])
    }
}

impl Classify for KeywordClassifier {
    fn classify(&self, content: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| content.contains(m)))
            .map(|(category, _)| *category)
    }
}

// ---------------------------------------------------------------------------
// Organizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocMove {
    pub file: String,
    pub category: Category,
    pub to: PathBuf,
}

pub const ORGANIZE_PROMPT: &str = "Organize documentation structure?";

/// Ensure the taxonomy exists, then move every classifiable loose markdown
/// file from the ai-docs root into its category directory.
///
/// Only regular `.md` files directly under `docs` are considered; protected
/// names are never moved. Moves overwrite an existing file of the same name.
/// Returns `None` when the confirmation is declined, in which case nothing
/// is touched.
pub fn organize(
    docs: &Path,
    classifier: &dyn Classify,
    confirmer: &dyn Confirm,
) -> Result<Option<Vec<DocMove>>> {
    if !confirmer.confirm(ORGANIZE_PROMPT) {
        tracing::info!("skipping documentation organization");
        return Ok(None);
    }
    for dir in paths::TREE_DIRS {
        io::ensure_dir(&docs.join(dir))?;
    }

    let mut candidates = Vec::new();
    let entries = std::fs::read_dir(docs).map_err(|e| PromptureError::fs("read", docs, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PromptureError::fs("read", docs, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_md = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !is_md || paths::is_protected(&name) {
            continue;
        }
        candidates.push((name, path));
    }
    candidates.sort();

    let mut moves = Vec::new();
    for (name, path) in candidates {
        // Markers are ASCII, so non-UTF-8 bytes need not stop classification.
        let bytes = std::fs::read(&path).map_err(|e| PromptureError::fs("read", &path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let Some(category) = classifier.classify(&content) else {
            tracing::debug!(file = %name, "no category, leaving in place");
            continue;
        };
        let to = docs.join(category.dir()).join(&name);
        io::move_path(&path, &to)?;
        tracing::info!(file = %name, %category, "moved loose document");
        moves.push(DocMove {
            file: name,
            category,
            to,
        });
    }
    Ok(Some(moves))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
