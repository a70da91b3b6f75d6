//! Outline model
//!
//! The hierarchical structure of a writing project: typed items arranged
//! in per-purpose trees (story, plot, characters, locations), with the
//! adjacency rules and the recursive JSON persistence format.

pub mod item;
pub mod tree;

pub use item::{Item, ItemId, ItemKind, USER_KINDS};
pub use tree::{AddLocation, ModelKind, OutlineTree, TreeError, MODEL_KINDS};
