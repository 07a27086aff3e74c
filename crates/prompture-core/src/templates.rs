use crate::error::{PromptureError, Result};
use crate::paths;
use rust_embed::Embed;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct Templates;

/// Raw bytes of an embedded template, by its path under `templates/`.
pub fn get(name: &str) -> Result<Cow<'static, [u8]>> {
    <Templates as Embed>::get(name)
        .map(|f| f.data)
        .ok_or_else(|| PromptureError::TemplateMissing(name.to_string()))
}

// ---------------------------------------------------------------------------
// DocType
// ---------------------------------------------------------------------------

/// A document template that `docs --type` can add to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Prd,
    Srs,
    Tasks,
    Technical,
    SystemArchitecture,
    CleanAiCode,
    Context,
    Glossary,
    AiPrompts,
    Changelog,
    Fix,
}

impl DocType {
    pub fn all() -> &'static [DocType] {
        &[
            DocType::Prd,
            DocType::Srs,
            DocType::Tasks,
            DocType::Technical,
            DocType::SystemArchitecture,
            DocType::CleanAiCode,
            DocType::Context,
            DocType::Glossary,
            DocType::AiPrompts,
            DocType::Changelog,
            DocType::Fix,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Prd => "PRD",
            DocType::Srs => "SRS",
            DocType::Tasks => "TASKS",
            DocType::Technical => "TECHNICAL",
            DocType::SystemArchitecture => "SYSTEM-ARCHITECTURE",
            DocType::CleanAiCode => "CLEAN-AI-CODE",
            DocType::Context => "CONTEXT",
            DocType::Glossary => "GLOSSARY",
            DocType::AiPrompts => "AI-PROMPTS",
            DocType::Changelog => "CHANGELOG",
            DocType::Fix => "FIX",
        }
    }

    /// Template path under `templates/`.
    pub fn template(self) -> &'static str {
        match self {
            DocType::Fix => "fixes/TEMPLATE-fix-doc.md",
            DocType::Prd => "PRD.md",
            DocType::Srs => "SRS.md",
            DocType::Tasks => "TASKS.md",
            DocType::Technical => "TECHNICAL.md",
            DocType::SystemArchitecture => "SYSTEM-ARCHITECTURE.md",
            DocType::CleanAiCode => "CLEAN-AI-CODE.md",
            DocType::Context => "CONTEXT.md",
            DocType::Glossary => "GLOSSARY.md",
            DocType::AiPrompts => "AI-PROMPTS.md",
            DocType::Changelog => "CHANGELOG.md",
        }
    }

    /// Destination directory relative to ai-docs (empty for the root).
    pub fn dest_dir(self) -> &'static str {
        match self {
            DocType::Prd | DocType::Srs | DocType::Tasks => paths::REQUIREMENTS_DIR,
            DocType::Technical | DocType::SystemArchitecture | DocType::CleanAiCode => {
                paths::TECHNICAL_DIR
            }
            DocType::Fix => paths::FIXES_DIR,
            DocType::Context => paths::CONTEXT_DIR,
            DocType::Glossary | DocType::AiPrompts | DocType::Changelog => "",
        }
    }

    pub fn dest_path(self, docs: &Path) -> PathBuf {
        let file_name = Path::new(self.template())
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        docs.join(self.dest_dir()).join(file_name)
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocType {
    type Err = PromptureError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().trim_end_matches(".md").to_ascii_uppercase();
        DocType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| PromptureError::UnknownDocType(s.to_string()))
    }
}

/// Copy one template into its taxonomy directory. Refuses to overwrite.
pub fn add_document(docs: &Path, doc_type: DocType) -> Result<PathBuf> {
    let dest = doc_type.dest_path(docs);
    let data = get(doc_type.template())?;
    if !crate::io::write_if_missing(&dest, &data)? {
        return Err(PromptureError::DocumentExists(dest));
    }
    tracing::debug!(doc = %doc_type, path = %dest.display(), "added document");
    Ok(dest)
}

// ---------------------------------------------------------------------------
// Tree scaffold
// ---------------------------------------------------------------------------

/// Every file `init` writes: (template path, destination relative to ai-docs).
pub const SCAFFOLD: &[(&str, &str)] = &[
    ("README.md", "README.md"),
    ("START-HERE.md", "START-HERE.md"),
    ("GLOSSARY.md", "GLOSSARY.md"),
    ("AI-PROMPTS.md", "AI-PROMPTS.md"),
    ("CHANGELOG.md", "CHANGELOG.md"),
    ("PRD.md", "requirements/PRD.md"),
    ("SRS.md", "requirements/SRS.md"),
    ("TASKS.md", "requirements/TASKS.md"),
    ("TECHNICAL.md", "technical/TECHNICAL.md"),
    ("SYSTEM-ARCHITECTURE.md", "technical/SYSTEM-ARCHITECTURE.md"),
    ("CLEAN-AI-CODE.md", "technical/CLEAN-AI-CODE.md"),
    ("fixes/README.md", "technical/fixes/README.md"),
    ("fixes/TEMPLATE-fix-doc.md", "technical/fixes/TEMPLATE-fix-doc.md"),
    ("active-context.md", paths::ACTIVE_CONTEXT_FILE),
];

/// Create the taxonomy and write every scaffold file. Returns the relative
/// paths written.
pub fn scaffold_tree(docs: &Path) -> Result<Vec<&'static str>> {
    for dir in paths::TREE_DIRS {
        crate::io::ensure_dir(&docs.join(dir))?;
    }
    let mut written = Vec::with_capacity(SCAFFOLD.len());
    for (template, dest) in SCAFFOLD {
        let data = get(template)?;
        crate::io::atomic_write(&docs.join(dest), &data)?;
        written.push(*dest);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organize::{Classify, KeywordClassifier};
    use tempfile::TempDir;

    #[test]
    fn every_template_is_embedded() {
        for (template, _) in SCAFFOLD {
            assert!(get(template).is_ok(), "missing template {template}");
        }
        for t in DocType::all() {
            assert!(get(t.template()).is_ok(), "missing template for {t}");
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("prd".parse::<DocType>().unwrap(), DocType::Prd);
        assert_eq!(
            "system-architecture".parse::<DocType>().unwrap(),
            DocType::SystemArchitecture
        );
        assert_eq!("TASKS.md".parse::<DocType>().unwrap(), DocType::Tasks);
        assert!(matches!(
            "INVALID".parse::<DocType>(),
            Err(PromptureError::UnknownDocType(_))
        ));
    }

    #[test]
    fn dest_paths_follow_taxonomy() {
        let docs = Path::new("/p/ai-docs");
        assert_eq!(
            DocType::Prd.dest_path(docs),
            PathBuf::from("/p/ai-docs/requirements/PRD.md")
        );
        assert_eq!(
            DocType::Fix.dest_path(docs),
            PathBuf::from("/p/ai-docs/technical/fixes/TEMPLATE-fix-doc.md")
        );
        assert_eq!(
            DocType::Glossary.dest_path(docs),
            PathBuf::from("/p/ai-docs/GLOSSARY.md")
        );
    }

    #[test]
    fn add_document_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let dest = add_document(dir.path(), DocType::Srs).unwrap();
        assert!(dest.is_file());
        let err = add_document(dir.path(), DocType::Srs).unwrap_err();
        assert!(matches!(err, PromptureError::DocumentExists(p) if p == dest));
    }

    #[test]
    fn scaffolded_root_files_stay_put_when_organized() {
        // Root-level scaffold files must not be swept into subdirectories.
        let c = KeywordClassifier::default();
        for (template, dest) in SCAFFOLD {
            if dest.contains('/') || crate::paths::is_protected(dest) {
                continue;
            }
            let content = String::from_utf8(get(template).unwrap().into_owned()).unwrap();
            assert_eq!(c.classify(&content), None, "{dest} would be moved");
        }
    }

    #[test]
    fn scaffold_creates_tree() {
        let dir = TempDir::new().unwrap();
        let written = scaffold_tree(dir.path()).unwrap();
        assert_eq!(written.len(), SCAFFOLD.len());
        crate::paths::require_tree(dir.path()).unwrap();
        assert!(crate::paths::active_context_path(dir.path()).is_file());
    }
}
