use crate::output::{print_json, print_table};
use anyhow::{anyhow, bail, Context};
use prompture_core::{
    paths,
    templates::{self, DocType},
};
use std::path::Path;

pub fn run(root: &Path, doc_type: Option<&str>, list: bool, json: bool) -> anyhow::Result<()> {
    if list {
        return list_types(json);
    }
    let Some(name) = doc_type else {
        bail!("no document type given: pass --type <TYPE> or --list");
    };

    let doc_type: DocType = name
        .parse()
        .map_err(|e| anyhow!("{e} (valid types: {})", DocType::names().join(", ")))?;

    let docs = paths::ai_docs_dir(root);
    paths::require_tree(&docs)?;
    let dest = templates::add_document(&docs, doc_type)
        .with_context(|| format!("failed to add {doc_type} document"))?;

    if json {
        print_json(&serde_json::json!({
            "type": doc_type.as_str(),
            "path": dest.display().to_string(),
        }))?;
    } else {
        println!("Created {doc_type} document: {}", dest.display());
    }
    Ok(())
}

fn list_types(json: bool) -> anyhow::Result<()> {
    let rows: Vec<Vec<String>> = DocType::all()
        .iter()
        .map(|t| {
            let dir = match t.dest_dir() {
                "" => ".".to_string(),
                d => d.to_string(),
            };
            vec![t.as_str().to_string(), dir]
        })
        .collect();

    if json {
        let items: Vec<_> = rows
            .iter()
            .map(|r| serde_json::json!({ "type": r[0], "directory": r[1] }))
            .collect();
        print_json(&items)?;
    } else {
        print_table(&["TYPE", "DIRECTORY"], rows);
    }
    Ok(())
}
