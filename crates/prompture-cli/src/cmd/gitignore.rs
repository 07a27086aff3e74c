use crate::output::print_json;
use anyhow::Context;
use prompture_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let entry = format!("{}/", paths::AI_DOCS_DIR);
    let added = io::ensure_gitignore_entry(root, &entry).context("failed to update .gitignore")?;

    if json {
        print_json(&serde_json::json!({ "entry": entry, "added": added }))?;
    } else if added {
        println!("Added {entry} to .gitignore");
    } else {
        println!("{entry} is already in .gitignore");
    }
    Ok(())
}
