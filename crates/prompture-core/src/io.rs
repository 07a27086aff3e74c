use crate::error::{PromptureError, Result};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from truncating a document mid-update.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| PromptureError::fs("create temp file in", dir, e))?;
    tmp.write_all(data)
        .map_err(|e| PromptureError::fs("write", path, e))?;
    tmp.persist(path)
        .map_err(|e| PromptureError::fs("write", path, e.error))?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| PromptureError::fs("create directory", path, e))
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PromptureError::fs("read", path, e))
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PromptureError::fs("open", path, e))?;
    f.write_all(text.as_bytes())
        .map_err(|e| PromptureError::fs("append to", path, e))?;
    Ok(())
}

/// Recursively copy `from` into `to`, creating `to` if needed.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    ensure_dir(to)?;
    let entries = std::fs::read_dir(from).map_err(|e| PromptureError::fs("read", from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PromptureError::fs("read", from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| PromptureError::fs("stat", &src, e))?;
        if file_type.is_dir() {
            copy_dir_all(&src, &dst)?;
        } else {
            std::fs::copy(&src, &dst).map_err(|e| PromptureError::fs("copy", &src, e))?;
        }
    }
    Ok(())
}

/// Remove a file or directory tree. Missing paths are fine.
pub fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PromptureError::fs("remove", path, e)),
    }
}

/// Move a file or directory, replacing anything already at `to`.
///
/// Tries a rename first. When the rename fails (cross-device moves, some
/// network filesystems) the source is copied to the destination and only
/// then deleted, so content is never left in both places on success.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if !from.exists() {
        return Err(PromptureError::fs(
            "move",
            from,
            std::io::Error::from(ErrorKind::NotFound),
        ));
    }
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    if to.exists() {
        remove_path(to)?;
    }

    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                from = %from.display(),
                to = %to.display(),
                error = %rename_err,
                "rename failed, falling back to copy"
            );
            copy_then_remove(from, to)
        }
    }
}

/// Copy `from` (file or directory tree) over `to`, then delete `from`.
/// Anything already at `to` is replaced. The source is removed only after
/// the copy has fully succeeded.
fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        remove_path(to)?;
    }
    if from.is_dir() {
        copy_dir_all(from, to)?;
    } else {
        if let Some(parent) = to.parent() {
            ensure_dir(parent)?;
        }
        std::fs::copy(from, to).map_err(|e| PromptureError::fs("copy", from, e))?;
    }
    remove_path(from)
}

/// Add `entry` to `root/.gitignore` if it isn't already present.
///
/// Checks for an exact line match (ignoring surrounding whitespace). Appends
/// with a leading newline separator if the file doesn't already end with one.
/// Returns true if the entry was added.
pub fn ensure_gitignore_entry(root: &Path, entry: &str) -> Result<bool> {
    let gitignore = root.join(".gitignore");
    let existing = if gitignore.exists() {
        read_to_string(&gitignore)?
    } else {
        String::new()
    };
    if existing.lines().any(|l| l.trim() == entry) {
        return Ok(false);
    }
    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    append_text(&gitignore, &format!("{sep}{entry}\n"))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/notes.md");
        atomic_write(&path, b"data").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.md");
        std::fs::write(&path, b"original").unwrap();
        let written = write_if_missing(&path, b"new").unwrap();
        assert!(!written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn move_path_replaces_destination_dir() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("recent/week");
        let to = dir.path().join("archived/week");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join("new.md"), "new").unwrap();
        std::fs::write(to.join("stale.md"), "stale").unwrap();

        move_path(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(to.join("new.md")).unwrap(), "new");
        assert!(!to.join("stale.md").exists());
    }

    #[test]
    fn move_path_missing_source_errors() {
        let dir = TempDir::new().unwrap();
        let err = move_path(&dir.path().join("nope"), &dir.path().join("dest")).unwrap_err();
        assert!(err.to_string().contains("failed to move"));
    }

    #[test]
    fn copy_then_remove_moves_directory_tree() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("recent/04-01-2024 to 04-07-2024");
        std::fs::create_dir_all(from.join("inner")).unwrap();
        std::fs::write(from.join("04-02-2024.md"), "body\n").unwrap();
        std::fs::write(from.join("inner/x.md"), "x").unwrap();
        let to = dir.path().join("archived/04-01-2024 to 04-07-2024");

        copy_then_remove(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(
            std::fs::read_to_string(to.join("04-02-2024.md")).unwrap(),
            "body\n"
        );
        assert_eq!(std::fs::read_to_string(to.join("inner/x.md")).unwrap(), "x");
    }

    #[test]
    fn copy_then_remove_moves_single_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("notes.md");
        std::fs::write(&from, b"## Technical\n").unwrap();
        let to = dir.path().join("technical/notes.md");

        copy_then_remove(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"## Technical\n");
    }

    #[test]
    fn copy_then_remove_replaces_existing_destination() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("src");
        let to = dir.path().join("dst");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join("new.md"), "new").unwrap();
        std::fs::write(to.join("stale.md"), "stale").unwrap();

        copy_then_remove(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(to.join("new.md")).unwrap(), "new");
        assert!(!to.join("stale.md").exists());

        let file_from = dir.path().join("a.md");
        let file_to = dir.path().join("b.md");
        std::fs::write(&file_from, "fresh").unwrap();
        std::fs::write(&file_to, "old").unwrap();
        copy_then_remove(&file_from, &file_to).unwrap();
        assert!(!file_from.exists());
        assert_eq!(std::fs::read_to_string(&file_to).unwrap(), "fresh");
    }

    #[test]
    fn copy_dir_all_copies_nested() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("src");
        std::fs::create_dir_all(from.join("inner")).unwrap();
        std::fs::write(from.join("inner/a.md"), "a").unwrap();

        let to = dir.path().join("dst");
        copy_dir_all(&from, &to).unwrap();
        assert_eq!(std::fs::read_to_string(to.join("inner/a.md")).unwrap(), "a");
        assert!(from.join("inner/a.md").exists());
    }

    #[test]
    fn ensure_gitignore_entry_idempotent() {
        let dir = TempDir::new().unwrap();
        assert!(ensure_gitignore_entry(dir.path(), "ai-docs/").unwrap());
        assert!(!ensure_gitignore_entry(dir.path(), "ai-docs/").unwrap());
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content.lines().filter(|l| *l == "ai-docs/").count(), 1);
    }

    #[test]
    fn ensure_gitignore_entry_appends_to_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "node_modules").unwrap();
        ensure_gitignore_entry(dir.path(), "ai-docs/").unwrap();
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content, "node_modules\nai-docs/\n");
    }
}
