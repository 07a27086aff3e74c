use crate::output::print_json;
use crate::prompt;
use anyhow::Context;
use prompture_core::{
    clean::{CleanOptions, CleanReport, Cleaner, StageOutcome},
    clock::SystemClock,
    config::Config,
    organize::KeywordClassifier,
    paths, PromptureError,
};
use std::path::Path;

pub struct CleanFlags {
    pub archive_older_than: Option<u32>,
    pub clean_temp: bool,
    pub organize: bool,
    pub force: bool,
}

/// clap value parser for `--archive-older-than`.
pub fn parse_days(value: &str) -> Result<u32, PromptureError> {
    value
        .trim()
        .parse()
        .map_err(|_| PromptureError::InvalidDays(value.to_string()))
}

pub fn run(root: &Path, flags: CleanFlags, json: bool) -> anyhow::Result<()> {
    let docs = paths::ai_docs_dir(root);
    let config = Config::load(&docs).context("failed to read ai-docs/config.yaml")?;
    let confirm = prompt::confirmer(flags.force);
    let classifier = KeywordClassifier::default();

    let opts = CleanOptions {
        archive_older_than: Some(flags.archive_older_than.unwrap_or(config.retention_days)),
        clean_temp: flags.clean_temp,
        organize: flags.organize,
    };

    let report = Cleaner {
        docs: &docs,
        config: &config,
        clock: &SystemClock,
        confirm: &*confirm,
        classifier: &classifier,
    }
    .run(&opts)
    .context("cleanup failed")?;

    if json {
        return print_json(&report);
    }
    print_report(&report);
    println!("Cleanup completed successfully!");
    Ok(())
}

fn print_report(report: &CleanReport) {
    for r in &report.stages {
        match &r.outcome {
            StageOutcome::Disabled => {}
            StageOutcome::Skipped { reason } => println!("  {:<18} skipped ({reason})", r.stage),
            StageOutcome::Declined => println!("  {:<18} skipped by user", r.stage),
            StageOutcome::Done { items } if items.is_empty() => {
                println!("  {:<18} nothing to do", r.stage)
            }
            StageOutcome::Done { items } => {
                println!("  {:<18} {} item(s)", r.stage, items.len());
                for item in items {
                    println!("    {item}");
                }
            }
        }
    }
}
