use crate::clock::Clock;
use crate::config::Config;
use crate::confirm::Confirm;
use crate::context::{self, ContextArchive};
use crate::error::{PromptureError, Result};
use crate::io;
use crate::organize::{self, Classify};
use crate::paths;
use crate::summary::SummaryStore;
use crate::week::CANONICAL_WEEK_START;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Stages and outcomes
// ---------------------------------------------------------------------------

/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ArchiveContext,
    CleanTemp,
    Organize,
    ArchiveSummaries,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::ArchiveContext => "archive_context",
            Stage::CleanTemp => "clean_temp",
            Stage::Organize => "organize",
            Stage::ArchiveSummaries => "archive_summaries",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Not requested by the options.
    Disabled,
    /// Nothing to act on (missing optional input).
    Skipped { reason: String },
    /// The user declined the confirmation.
    Declined,
    /// Ran; `items` names what was archived, removed or moved.
    Done { items: Vec<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub stages: Vec<StageReport>,
}

impl CleanReport {
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }

    /// Names touched by a stage, empty unless it ran.
    pub fn items(&self, stage: Stage) -> &[String] {
        match self.outcome(stage) {
            Some(StageOutcome::Done { items }) => items,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Retention window for the archive stages; `None` disables both.
    pub archive_older_than: Option<u32>,
    pub clean_temp: bool,
    pub organize: bool,
}

// ---------------------------------------------------------------------------
// Cleaner
// ---------------------------------------------------------------------------

/// Runs the clean pipeline against one ai-docs tree.
///
/// Stages run strictly in order. The first I/O failure ends the run and is
/// returned; stages that already finished are not rolled back.
pub struct Cleaner<'a> {
    pub docs: &'a Path,
    pub config: &'a Config,
    pub clock: &'a dyn Clock,
    pub confirm: &'a dyn Confirm,
    pub classifier: &'a dyn Classify,
}

impl Cleaner<'_> {
    pub fn run(&self, opts: &CleanOptions) -> Result<CleanReport> {
        paths::require_docs_root(self.docs)?;

        let mut report = CleanReport::default();
        let mut record = |stage: Stage, outcome: StageOutcome| {
            tracing::info!(%stage, ?outcome, "stage finished");
            report.stages.push(StageReport { stage, outcome });
        };

        record(
            Stage::ArchiveContext,
            match opts.archive_older_than {
                Some(days) => self.archive_context(days)?,
                None => StageOutcome::Disabled,
            },
        );
        record(
            Stage::CleanTemp,
            if opts.clean_temp {
                self.clean_temp()?
            } else {
                StageOutcome::Disabled
            },
        );
        record(
            Stage::Organize,
            if opts.organize {
                self.organize()?
            } else {
                StageOutcome::Disabled
            },
        );
        record(
            Stage::ArchiveSummaries,
            match opts.archive_older_than {
                Some(days) => self.archive_summaries(days)?,
                None => StageOutcome::Disabled,
            },
        );

        Ok(report)
    }

    fn archive_context(&self, days: u32) -> Result<StageOutcome> {
        let context_dir = self.docs.join(paths::CONTEXT_DIR);
        if !context_dir.is_dir() {
            tracing::warn!("context directory not found, skipping archiving");
            return Ok(StageOutcome::Skipped {
                reason: "context directory not found".to_string(),
            });
        }
        let outcome = context::archive_if_stale(
            &paths::active_context_path(self.docs),
            &paths::archived_summaries_dir(self.docs),
            days,
            self.clock.now(),
            self.confirm,
        )?;
        Ok(match outcome {
            ContextArchive::Archived { archive_path, .. } => StageOutcome::Done {
                items: vec![file_name(&archive_path)],
            },
            ContextArchive::Fresh { .. } => StageOutcome::Done { items: Vec::new() },
            ContextArchive::Missing => StageOutcome::Skipped {
                reason: "active context not found".to_string(),
            },
            ContextArchive::Declined { .. } => StageOutcome::Declined,
        })
    }

    fn clean_temp(&self) -> Result<StageOutcome> {
        if !self.confirm.confirm("Clean temporary files?") {
            tracing::info!("skipping temporary file cleanup");
            return Ok(StageOutcome::Declined);
        }
        let mut removed = Vec::new();
        for path in temp_files(self.docs, self.config)? {
            io::remove_path(&path)?;
            let name = file_name(&path);
            tracing::info!(file = %name, "removed temporary file");
            removed.push(name);
        }
        Ok(StageOutcome::Done { items: removed })
    }

    fn organize(&self) -> Result<StageOutcome> {
        let Some(moves) = organize::organize(self.docs, self.classifier, self.confirm)? else {
            return Ok(StageOutcome::Declined);
        };
        Ok(StageOutcome::Done {
            items: moves
                .into_iter()
                .map(|m| format!("{} -> {}/", m.file, m.category))
                .collect(),
        })
    }

    fn archive_summaries(&self, days: u32) -> Result<StageOutcome> {
        let recent = paths::recent_summaries_dir(self.docs);
        if !recent.is_dir() {
            tracing::warn!("summaries directory not found, skipping archiving");
            return Ok(StageOutcome::Skipped {
                reason: "summaries directory not found".to_string(),
            });
        }
        let store = SummaryStore::new(self.docs, CANONICAL_WEEK_START);
        let today = self.clock.today();
        let stale = store.stale_buckets(today, days)?;
        if stale.is_empty() {
            return Ok(StageOutcome::Done { items: Vec::new() });
        }
        let question = format!(
            "Archive {} summary week(s) older than {days} days?",
            stale.len()
        );
        if !self.confirm.confirm(&question) {
            tracing::info!("skipping summary archiving");
            return Ok(StageOutcome::Declined);
        }
        let moved = store.archive_stale_buckets(today, days)?;
        Ok(StageOutcome::Done { items: moved })
    }
}

/// Regular files directly under `docs` whose extension marks them temporary.
fn temp_files(docs: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = std::fs::read_dir(docs).map_err(|e| PromptureError::fs("read", docs, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PromptureError::fs("read", docs, e))?;
        let path = entry.path();
        if path.is_file() && config.is_temp_file(&entry.file_name().to_string_lossy()) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::confirm::{AutoConfirm, ScriptedConfirm};
    use crate::organize::KeywordClassifier;
    use crate::templates;
    use chrono::{Duration, Local, TimeZone};
    use tempfile::TempDir;

    fn fresh_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        templates::scaffold_tree(dir.path()).unwrap();
        dir
    }

    fn run(
        docs: &Path,
        clock: &dyn Clock,
        confirm: &dyn Confirm,
        opts: &CleanOptions,
    ) -> Result<CleanReport> {
        let config = Config::default();
        let classifier = KeywordClassifier::default();
        Cleaner {
            docs,
            config: &config,
            clock,
            confirm,
            classifier: &classifier,
        }
        .run(opts)
    }

    fn old_bucket(docs: &Path) -> PathBuf {
        let bucket = paths::recent_summaries_dir(docs).join("04-01-2024 to 04-07-2024");
        std::fs::create_dir_all(&bucket).unwrap();
        std::fs::write(bucket.join("04-02-2024.md"), "# old\n").unwrap();
        bucket
    }

    #[test]
    fn missing_tree_is_a_precondition_failure() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("ai-docs");
        let err = run(
            &docs,
            &FixedClock(Local::now()),
            &AutoConfirm,
            &CleanOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PromptureError::NotInitialized { .. }));
    }

    #[test]
    fn zero_day_force_on_fresh_tree_moves_no_summaries() {
        let dir = fresh_tree();
        let opts = CleanOptions {
            archive_older_than: Some(0),
            ..Default::default()
        };
        let report = run(dir.path(), &FixedClock(Local::now()), &AutoConfirm, &opts).unwrap();
        assert_eq!(
            report.outcome(Stage::ArchiveSummaries),
            Some(&StageOutcome::Done { items: Vec::new() })
        );
        assert_eq!(report.outcome(Stage::CleanTemp), Some(&StageOutcome::Disabled));
        assert_eq!(report.outcome(Stage::Organize), Some(&StageOutcome::Disabled));
    }

    #[test]
    fn full_pipeline_with_force() {
        let dir = fresh_tree();
        let docs = dir.path();
        let bucket = old_bucket(docs);
        std::fs::write(docs.join("scratch.tmp"), "x").unwrap();
        std::fs::write(docs.join("design.md"), "## Architecture\n").unwrap();

        let clock = FixedClock(Local.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap());
        let opts = CleanOptions {
            archive_older_than: Some(14),
            clean_temp: true,
            organize: true,
        };
        let report = run(docs, &clock, &AutoConfirm, &opts).unwrap();

        assert_eq!(report.items(Stage::CleanTemp), ["scratch.tmp"]);
        assert_eq!(report.items(Stage::Organize), ["design.md -> technical/"]);
        assert_eq!(
            report.items(Stage::ArchiveSummaries),
            ["04-01-2024 to 04-07-2024"]
        );
        assert!(!bucket.exists());
        assert!(paths::archived_summaries_dir(docs)
            .join("04-01-2024 to 04-07-2024/04-02-2024.md")
            .is_file());
        assert!(!docs.join("scratch.tmp").exists());
        assert!(docs.join("technical/design.md").is_file());
    }

    #[test]
    fn stale_context_is_archived_by_first_stage() {
        let dir = fresh_tree();
        let docs = dir.path();
        let clock = FixedClock(Local::now() + Duration::days(45));
        let opts = CleanOptions {
            archive_older_than: Some(30),
            ..Default::default()
        };
        let report = run(docs, &clock, &AutoConfirm, &opts).unwrap();

        let items = report.items(Stage::ArchiveContext);
        assert_eq!(items.len(), 1);
        assert!(items[0].starts_with("context_"));
        assert!(paths::archived_summaries_dir(docs).join(&items[0]).is_file());
        assert_eq!(
            std::fs::read_to_string(paths::active_context_path(docs)).unwrap(),
            context::EMPTY_CONTEXT
        );
    }

    #[test]
    fn declining_skips_only_that_stage() {
        let dir = fresh_tree();
        let docs = dir.path();
        let bucket = old_bucket(docs);
        std::fs::write(docs.join("scratch.bak"), "x").unwrap();
        std::fs::write(docs.join("design.md"), "## Architecture\n").unwrap();

        // clean_temp: no, organize: yes, summaries: no
        let confirm = ScriptedConfirm::new([false, true, false]);
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap());
        let opts = CleanOptions {
            archive_older_than: Some(14),
            clean_temp: true,
            organize: true,
        };
        let report = run(docs, &clock, &confirm, &opts).unwrap();

        assert_eq!(report.outcome(Stage::CleanTemp), Some(&StageOutcome::Declined));
        assert_eq!(report.items(Stage::Organize), ["design.md -> technical/"]);
        assert_eq!(
            report.outcome(Stage::ArchiveSummaries),
            Some(&StageOutcome::Declined)
        );
        assert!(docs.join("scratch.bak").exists());
        assert!(bucket.exists());
        assert_eq!(
            confirm.asked(),
            vec![
                "Clean temporary files?",
                "Organize documentation structure?",
                "Archive 1 summary week(s) older than 14 days?",
            ]
        );
    }

    #[test]
    fn latin1_loose_doc_does_not_stop_later_stages() {
        let dir = fresh_tree();
        let docs = dir.path();
        let bucket = old_bucket(docs);
        std::fs::write(docs.join("notes.md"), b"## Technical\nCaf\xe9").unwrap();

        let clock = FixedClock(Local.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap());
        let opts = CleanOptions {
            archive_older_than: Some(14),
            organize: true,
            ..Default::default()
        };
        let report = run(docs, &clock, &AutoConfirm, &opts).unwrap();

        assert_eq!(report.items(Stage::Organize), ["notes.md -> technical/"]);
        assert_eq!(
            report.items(Stage::ArchiveSummaries),
            ["04-01-2024 to 04-07-2024"]
        );
        assert!(!bucket.exists());
    }

    #[test]
    fn missing_context_dir_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let opts = CleanOptions {
            archive_older_than: Some(30),
            ..Default::default()
        };
        let report = run(dir.path(), &FixedClock(Local::now()), &AutoConfirm, &opts).unwrap();
        assert!(matches!(
            report.outcome(Stage::ArchiveContext),
            Some(StageOutcome::Skipped { .. })
        ));
        assert!(matches!(
            report.outcome(Stage::ArchiveSummaries),
            Some(StageOutcome::Skipped { .. })
        ));
    }
}
