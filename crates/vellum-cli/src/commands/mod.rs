//! CLI command implementations

pub mod doc;
pub mod item;
pub mod project;

use anyhow::{anyhow, Result};
use uuid::Uuid;

use vellum_core::{ItemKind, ModelKind};

/// Parse a tree name argument
pub fn parse_tree(name: &str) -> Result<ModelKind> {
    ModelKind::from_name(name)
        .ok_or_else(|| anyhow!("unknown tree '{name}' (story, plot, characters, locations)"))
}

/// Parse an item kind argument
pub fn parse_kind(name: &str) -> Result<ItemKind> {
    match ItemKind::from_tag(name) {
        Some(ItemKind::Root) | None => Err(anyhow!(
            "unknown item kind '{name}' (book, partition, chapter, scene, page, group, note)"
        )),
        Some(kind) => Ok(kind),
    }
}

/// Parse an item handle argument
pub fn parse_handle(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| anyhow!("'{raw}' is not a valid item handle"))
}
