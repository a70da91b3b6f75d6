//! Outline commands: tree, add, rename

use std::path::Path;

use anyhow::{Context, Result};

use vellum_core::{AddLocation, Project};

use super::{parse_handle, parse_kind, parse_tree};
use crate::output::Output;

pub fn tree(path: &Path, tree: &str, output: &Output) -> Result<()> {
    let kind = parse_tree(tree)?;
    let project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;
    output.print_tree(project.tree(kind));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    path: &Path,
    tree: &str,
    kind: &str,
    parent: Option<&str>,
    before: Option<&str>,
    after: Option<&str>,
    position: Option<usize>,
    name: Option<&str>,
    output: &Output,
) -> Result<()> {
    let tree = parse_tree(tree)?;
    let kind = parse_kind(kind)?;
    let mut project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;

    let handle = if let Some(anchor) = before {
        project.add_sibling(tree, parse_handle(anchor)?, kind, AddLocation::Before)?
    } else if let Some(anchor) = after {
        project.add_sibling(tree, parse_handle(anchor)?, kind, AddLocation::After)?
    } else {
        let parent = parent.map(parse_handle).transpose()?;
        project.add_child(tree, parent, kind, position)?
    };

    if let Some(name) = name {
        project.rename(tree, handle, name)?;
    }
    project.save()?;

    output.print_created(kind, handle);
    Ok(())
}

pub fn rename(path: &Path, tree: &str, handle: &str, name: &str, output: &Output) -> Result<()> {
    let tree = parse_tree(tree)?;
    let handle = parse_handle(handle)?;
    let mut project =
        Project::open(path).with_context(|| format!("Failed to open project at {:?}", path))?;
    project.rename(tree, handle, name)?;
    project.save()?;
    output.message(&format!("Renamed {handle} to '{name}'"));
    Ok(())
}
