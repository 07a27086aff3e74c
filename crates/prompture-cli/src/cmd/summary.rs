use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Args;
use prompture_core::{
    clock::{Clock, SystemClock},
    paths,
    summary::{Bucket, SummaryStore, SummaryWrite, Tier},
    week::CANONICAL_WEEK_START,
};
use serde::Serialize;
use std::path::Path;

#[derive(Args)]
pub struct SummaryArgs {
    /// Record a session summary for today with this description
    #[arg(long, short = 'c', value_name = "DESCRIPTION", conflicts_with_all = ["list", "archive"])]
    create: Option<String>,

    /// List recent and archived summaries
    #[arg(long, short = 'l', conflicts_with = "archive")]
    list: bool,

    /// Move one summary file (e.g. 04-06-2024.md) to the archive
    #[arg(long, short = 'a', value_name = "FILENAME")]
    archive: Option<String>,
}

#[derive(Serialize)]
struct Listing {
    recent: Vec<Bucket>,
    archived: Vec<Bucket>,
    archived_files: Vec<String>,
}

impl Listing {
    fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.archived.is_empty() && self.archived_files.is_empty()
    }
}

pub fn run(root: &Path, args: SummaryArgs, json: bool) -> anyhow::Result<()> {
    let docs = paths::ai_docs_dir(root);
    paths::require_tree(&docs)?;
    let store = SummaryStore::new(&docs, CANONICAL_WEEK_START);

    if let Some(description) = args.create {
        return create(&store, &description, json);
    }
    if args.list {
        return list(&store, json);
    }
    if let Some(name) = args.archive {
        return archive(&store, &name, json);
    }
    bail!("nothing to do: pass --create <DESCRIPTION>, --list or --archive <FILENAME>")
}

fn create(store: &SummaryStore, description: &str, json: bool) -> anyhow::Result<()> {
    let write = store
        .create_or_append(SystemClock.now(), description)
        .context("failed to write summary")?;

    if json {
        let action = match write {
            SummaryWrite::Created(_) => "created",
            SummaryWrite::Appended(_) => "appended",
        };
        print_json(&serde_json::json!({
            "action": action,
            "path": write.path().display().to_string(),
        }))?;
        return Ok(());
    }
    match &write {
        SummaryWrite::Created(path) => println!("Created summary: {}", path.display()),
        SummaryWrite::Appended(path) => println!("Added session to: {}", path.display()),
    }
    Ok(())
}

fn list(store: &SummaryStore, json: bool) -> anyhow::Result<()> {
    let listing = Listing {
        recent: store.list_buckets(Tier::Recent).collect_sorted()?,
        archived: store.list_buckets(Tier::Archived).collect_sorted()?,
        archived_files: store.list_loose(Tier::Archived)?,
    };

    if json {
        return print_json(&listing);
    }
    if listing.is_empty() {
        println!("No summaries found.");
        return Ok(());
    }

    println!("Recent Summaries:");
    print_buckets(&listing.recent);

    println!("\nArchived Summaries:");
    print_buckets(&listing.archived);
    for file in &listing.archived_files {
        println!("  {file}");
    }
    Ok(())
}

fn print_buckets(buckets: &[Bucket]) {
    if buckets.is_empty() {
        println!("  (none)");
    }
    for bucket in buckets {
        println!("  {}/", bucket.label);
        for file in &bucket.files {
            println!("    {file}");
        }
    }
}

fn archive(store: &SummaryStore, name: &str, json: bool) -> anyhow::Result<()> {
    let dest = store
        .archive_single_file(name)
        .with_context(|| format!("failed to archive {name}"))?;

    if json {
        print_json(&serde_json::json!({
            "file": name,
            "path": dest.display().to_string(),
        }))?;
    } else {
        println!("Archived summary: {}", dest.display());
    }
    Ok(())
}
