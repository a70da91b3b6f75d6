//! Project commands: new, info

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use vellum_core::outline::MODEL_KINDS;
use vellum_core::Project;

use crate::output::Output;

pub fn new(path: &Path, name: Option<&str>, output: &Output) -> Result<()> {
    let name = name.unwrap_or("Unnamed Project");
    let project = Project::create(path, name)
        .with_context(|| format!("Failed to create project at {:?}", path))?;
    output.message(&format!(
        "Created project '{}' at {:?}",
        project.name(),
        path
    ));
    Ok(())
}

pub fn info(path: &Path, output: &Output) -> Result<()> {
    let project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;

    let trees: Vec<_> = MODEL_KINDS
        .iter()
        .map(|kind| {
            let tree = project.tree(*kind);
            json!({
                "tree": kind.file_stem(),
                "items": tree.len() - 1,
                "words": tree.word_total(tree.root()),
            })
        })
        .collect();

    output.print_json(&json!({
        "name": project.name(),
        "created": project.created(),
        "path": path,
        "trees": trees,
    }));
    Ok(())
}
