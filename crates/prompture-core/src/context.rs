use crate::confirm::Confirm;
use crate::error::{PromptureError, Result};
use crate::io;
use crate::paths;
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Content written to the active context after it has been archived.
pub const EMPTY_CONTEXT: &str = "# Active Context\n\n";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSection {
    CurrentTask,
    Summary,
}

impl ContextSection {
    pub fn heading(self) -> &'static str {
        match self {
            ContextSection::CurrentTask => "Current Task",
            ContextSection::Summary => "Summary",
        }
    }
}

static NEXT_SECTION_RE: OnceLock<Regex> = OnceLock::new();

fn next_section_re() -> &'static Regex {
    NEXT_SECTION_RE.get_or_init(|| Regex::new(r"(?m)^## ").unwrap())
}

fn heading_re(heading: &str) -> Regex {
    Regex::new(&format!(r"(?m)^## {}[ \t]*\r?$", regex::escape(heading)))
        .expect("escaped heading is a valid pattern")
}

/// Replace the body of `## <heading>` with `body`.
///
/// The replaced span runs from the line after the heading to the next `## `
/// heading (or end of input). Whitespace that trailed the old body is kept,
/// so every byte outside the span is unchanged. A missing section is
/// appended at the end.
pub fn replace_section(content: &str, heading: &str, body: &str) -> String {
    let Some(m) = heading_re(heading).find(content) else {
        let sep = if content.is_empty() || content.ends_with("\n\n") {
            ""
        } else if content.ends_with('\n') {
            "\n"
        } else {
            "\n\n"
        };
        return format!("{content}{sep}## {heading}\n{body}\n");
    };

    let (body_start, add_newline) = if content[m.end()..].starts_with('\n') {
        (m.end() + 1, false)
    } else {
        (m.end(), true)
    };
    let section_end = next_section_re()
        .find(&content[body_start..])
        .map(|n| body_start + n.start())
        .unwrap_or(content.len());

    let old_body = &content[body_start..section_end];
    let mut tail = &old_body[old_body.trim_end().len()..];
    if section_end < content.len() && !tail.ends_with('\n') {
        tail = "\n";
    }

    let mut updated = String::with_capacity(content.len() + body.len());
    updated.push_str(&content[..body_start]);
    if add_newline {
        updated.push('\n');
    }
    updated.push_str(body);
    updated.push_str(tail);
    updated.push_str(&content[section_end..]);
    updated
}

/// Rewrite one section of `context/active-context.md` in place.
pub fn update_section(docs: &Path, section: ContextSection, body: &str) -> Result<PathBuf> {
    let path = paths::active_context_path(docs);
    if !path.is_file() {
        return Err(PromptureError::ContextNotFound(path));
    }
    let content = io::read_to_string(&path)?;
    let updated = replace_section(&content, section.heading(), body);
    io::atomic_write(&path, updated.as_bytes())?;
    tracing::debug!(section = section.heading(), "updated active context");
    Ok(path)
}

// ---------------------------------------------------------------------------
// ContextArchiver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ContextArchive {
    /// Copied aside and truncated.
    Archived { archive_path: PathBuf, age_days: f64 },
    /// Younger than the retention window.
    Fresh { age_days: f64 },
    /// No context file (or no context directory) to look at.
    Missing,
    /// Stale, but the user chose to keep it.
    Declined { age_days: f64 },
}

/// Archive the active context file when it is older than `retention_days`.
///
/// Age is measured from the file's modification time to `now`, in fractional
/// days. The copy is named after the modification date.
pub fn archive_if_stale(
    context_file: &Path,
    archive_dir: &Path,
    retention_days: u32,
    now: DateTime<Local>,
    confirmer: &dyn Confirm,
) -> Result<ContextArchive> {
    if !context_file.is_file() {
        tracing::warn!(path = %context_file.display(), "active context not found, skipping archiving");
        return Ok(ContextArchive::Missing);
    }

    let modified = std::fs::metadata(context_file)
        .and_then(|m| m.modified())
        .map_err(|e| PromptureError::fs("stat", context_file, e))?;
    let modified: DateTime<Local> = modified.into();
    let age_days = (now - modified).num_milliseconds() as f64 / 86_400_000.0;

    if age_days <= f64::from(retention_days) {
        tracing::debug!(age_days, retention_days, "active context is fresh");
        return Ok(ContextArchive::Fresh { age_days });
    }

    let question = format!(
        "Active context is {} days old. Archive it?",
        age_days.floor() as i64
    );
    if !confirmer.confirm(&question) {
        tracing::info!("skipping archiving of active context");
        return Ok(ContextArchive::Declined { age_days });
    }

    io::ensure_dir(archive_dir)?;
    let archive_path = archive_dir.join(format!("context_{}.md", modified.format("%Y-%m-%d")));
    std::fs::copy(context_file, &archive_path)
        .map_err(|e| PromptureError::fs("copy", context_file, e))?;
    io::atomic_write(context_file, EMPTY_CONTEXT.as_bytes())?;
    tracing::info!(archive = %archive_path.display(), "archived active context");

    Ok(ContextArchive::Archived {
        archive_path,
        age_days,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
