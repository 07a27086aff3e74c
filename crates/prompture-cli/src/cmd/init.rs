use crate::output::print_json;
use crate::prompt;
use anyhow::Context;
use prompture_core::{config::Config, io, paths, templates};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum InitOutcome {
    Created {
        path: String,
        replaced: bool,
        files: Vec<&'static str>,
    },
    Cancelled,
}

pub fn run(root: &Path, force: bool, json: bool) -> anyhow::Result<()> {
    let docs = paths::ai_docs_dir(root);

    let replaced = docs.exists();
    if replaced {
        let confirmer = prompt::confirmer(force);
        if !confirmer.confirm("ai-docs directory already exists. Overwrite it?") {
            tracing::info!("init cancelled, existing tree kept");
            if json {
                print_json(&InitOutcome::Cancelled)?;
            } else {
                println!("Initialization cancelled.");
            }
            return Ok(());
        }
        io::remove_path(&docs)
            .with_context(|| format!("failed to replace {}", docs.display()))?;
    }

    let files = templates::scaffold_tree(&docs).context("failed to scaffold ai-docs")?;
    Config::default()
        .save(&docs)
        .context("failed to write config.yaml")?;

    if json {
        print_json(&InitOutcome::Created {
            path: docs.display().to_string(),
            replaced,
            files,
        })?;
        return Ok(());
    }

    println!("Initialized ai-docs in: {}", docs.display());
    for dir in paths::TREE_DIRS {
        println!("  dir:     {dir}/");
    }
    for file in &files {
        println!("  created: {file}");
    }
    println!("  created: {}", paths::CONFIG_FILE);
    Ok(())
}
