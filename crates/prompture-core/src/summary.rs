use crate::error::{PromptureError, Result};
use crate::io;
use crate::paths;
use crate::policy;
use crate::week::{summary_file_name, WeekBucket, WeekStart};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Retention tier a summary currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Recent,
    Archived,
}

impl Tier {
    pub fn dir(self, docs: &Path) -> PathBuf {
        match self {
            Tier::Recent => paths::recent_summaries_dir(docs),
            Tier::Archived => paths::archived_summaries_dir(docs),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Recent => "recent",
            Tier::Archived => "archived",
        })
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A week-bucket directory and the file names inside it, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub files: Vec<String>,
}

/// Lazy view over the buckets of one tier. Each call to [`iter`] re-reads the
/// directory, so a listing can be walked any number of times.
///
/// [`iter`]: BucketListing::iter
#[derive(Debug, Clone)]
pub struct BucketListing {
    dir: PathBuf,
}

impl BucketListing {
    pub fn iter(&self) -> Result<BucketIter> {
        if !self.dir.is_dir() {
            return Ok(BucketIter { entries: None });
        }
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| PromptureError::fs("read", &self.dir, e))?;
        Ok(BucketIter {
            entries: Some(entries),
        })
    }

    /// Drain into a vector sorted by bucket start date (unparsable labels
    /// last, by name).
    pub fn collect_sorted(&self) -> Result<Vec<Bucket>> {
        let mut buckets = self.iter()?.collect::<Result<Vec<_>>>()?;
        buckets.sort_by(|a, b| sort_key(&a.label).cmp(&sort_key(&b.label)));
        Ok(buckets)
    }
}

fn sort_key(label: &str) -> (bool, Option<NaiveDate>, &str) {
    let start = policy::bucket_start(label);
    (start.is_none(), start, label)
}

pub struct BucketIter {
    entries: Option<ReadDir>,
}

impl Iterator for BucketIter {
    type Item = Result<Bucket>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;
        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => return Some(Err(PromptureError::Io(e))),
            };
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let label = entry.file_name().to_string_lossy().into_owned();
            return Some(list_files(&path).map(|files| Bucket { label, files }));
        }
        None
    }
}

/// Sorted names of the regular files directly inside `dir`.
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| PromptureError::fs("read", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PromptureError::fs("read", dir, e))?;
        if entry.path().is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryWrite {
    Created(PathBuf),
    Appended(PathBuf),
}

impl SummaryWrite {
    pub fn path(&self) -> &Path {
        match self {
            SummaryWrite::Created(p) | SummaryWrite::Appended(p) => p,
        }
    }
}

fn session_block(now: &DateTime<Local>, description: &str) -> String {
    format!(
        "## Session {time}

### Description
{description}

### Context
[Paste relevant context here]

### Key Points
- [Add key points from the session]

### Next Steps
- [Add planned next steps]

### Token Usage
- Estimated tokens used: [Add token count]
- Model: [Add model used]

---

",
        time = now.format("%H:%M:%S"),
    )
}

fn summary_header(now: &DateTime<Local>) -> String {
    format!("# AI Session Summary - {}\n\n", now.format("%B %-d, %Y"))
}

// ---------------------------------------------------------------------------
// SummaryStore
// ---------------------------------------------------------------------------

/// Dated session summaries grouped into week buckets across two tiers.
#[derive(Debug, Clone)]
pub struct SummaryStore {
    docs: PathBuf,
    week_start: WeekStart,
}

impl SummaryStore {
    pub fn new(docs: impl Into<PathBuf>, week_start: WeekStart) -> Self {
        Self {
            docs: docs.into(),
            week_start,
        }
    }

    pub fn tier_dir(&self, tier: Tier) -> PathBuf {
        tier.dir(&self.docs)
    }

    pub fn bucket_dir(&self, tier: Tier, label: &str) -> PathBuf {
        self.tier_dir(tier).join(label)
    }

    /// Write today's summary, or append a new session block to it.
    pub fn create_or_append(
        &self,
        now: DateTime<Local>,
        description: &str,
    ) -> Result<SummaryWrite> {
        let date = now.date_naive();
        let label = WeekBucket::containing(date, self.week_start).label();
        let bucket_dir = self.bucket_dir(Tier::Recent, &label);
        io::ensure_dir(&bucket_dir)?;

        let path = bucket_dir.join(summary_file_name(date));
        let block = session_block(&now, description);

        if path.exists() {
            let existing = io::read_to_string(&path)?;
            let sep = if existing.is_empty() || existing.ends_with("\n\n") {
                ""
            } else if existing.ends_with('\n') {
                "\n"
            } else {
                "\n\n"
            };
            io::append_text(&path, &format!("{sep}{block}"))?;
            tracing::debug!(path = %path.display(), "appended session");
            Ok(SummaryWrite::Appended(path))
        } else {
            let content = format!("{}{}", summary_header(&now), block);
            io::atomic_write(&path, content.as_bytes())?;
            tracing::debug!(path = %path.display(), "created summary");
            Ok(SummaryWrite::Created(path))
        }
    }

    pub fn list_buckets(&self, tier: Tier) -> BucketListing {
        BucketListing {
            dir: self.tier_dir(tier),
        }
    }

    /// Regular files sitting directly in a tier directory (single archived
    /// summaries and archived context snapshots).
    pub fn list_loose(&self, tier: Tier) -> Result<Vec<String>> {
        let dir = self.tier_dir(tier);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        list_files(&dir)
    }

    /// Relocate a whole bucket. A destination bucket with the same label is
    /// replaced, not merged.
    pub fn move_bucket(&self, from: Tier, to: Tier, label: &str) -> Result<PathBuf> {
        let src = self.bucket_dir(from, label);
        let dst = self.bucket_dir(to, label);
        io::move_path(&src, &dst)?;
        tracing::info!(%label, %from, %to, "moved bucket");
        Ok(dst)
    }

    /// Move one summary out of its recent bucket into the archived tier root.
    pub fn archive_single_file(&self, name: &str) -> Result<PathBuf> {
        let bucket = self
            .list_buckets(Tier::Recent)
            .collect_sorted()?
            .into_iter()
            .find(|b| b.files.iter().any(|f| f == name))
            .ok_or_else(|| PromptureError::SummaryNotFound(name.to_string()))?;

        let src = self.bucket_dir(Tier::Recent, &bucket.label).join(name);
        let dst = self.tier_dir(Tier::Archived).join(name);
        let bytes = std::fs::read(&src).map_err(|e| PromptureError::fs("read", &src, e))?;
        io::atomic_write(&dst, &bytes)?;
        io::remove_path(&src)?;
        tracing::info!(%name, bucket = %bucket.label, "archived summary");
        Ok(dst)
    }

    /// Labels of recent buckets older than the retention window.
    pub fn stale_buckets(
        &self,
        reference: NaiveDate,
        retention_days: u32,
    ) -> Result<Vec<String>> {
        Ok(self
            .list_buckets(Tier::Recent)
            .collect_sorted()?
            .into_iter()
            .map(|b| b.label)
            .filter(|label| policy::should_archive(label, reference, retention_days))
            .collect())
    }

    /// Move every stale recent bucket to the archived tier. Returns the labels moved.
    pub fn archive_stale_buckets(
        &self,
        reference: NaiveDate,
        retention_days: u32,
    ) -> Result<Vec<String>> {
        let stale = self.stale_buckets(reference, retention_days)?;
        for label in &stale {
            self.move_bucket(Tier::Recent, Tier::Archived, label)?;
        }
        Ok(stale)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
