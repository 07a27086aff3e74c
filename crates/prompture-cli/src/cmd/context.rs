use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Args;
use prompture_core::{
    context::{self, ContextSection},
    paths,
};
use std::path::Path;

#[derive(Args)]
pub struct ContextArgs {
    /// Replace the "Current Task" section
    #[arg(long, short = 't', value_name = "TEXT", conflicts_with = "update")]
    task: Option<String>,

    /// Replace the "Summary" section
    #[arg(long, short = 'u', value_name = "TEXT")]
    update: Option<String>,
}

pub fn run(root: &Path, args: ContextArgs, json: bool) -> anyhow::Result<()> {
    let (section, body) = match (args.task, args.update) {
        (Some(task), _) => (ContextSection::CurrentTask, task),
        (None, Some(summary)) => (ContextSection::Summary, summary),
        (None, None) => bail!("nothing to update: pass --task <TEXT> or --update <TEXT>"),
    };

    let docs = paths::ai_docs_dir(root);
    paths::require_tree(&docs)?;
    let path = context::update_section(&docs, section, &body)
        .with_context(|| format!("failed to update '{}' in active context", section.heading()))?;

    if json {
        print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "section": section.heading(),
        }))?;
    } else {
        println!("Updated '{}' in {}", section.heading(), path.display());
    }
    Ok(())
}
