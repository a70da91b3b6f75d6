//! Vellum Core Library
//!
//! This crate provides the content model for Vellum, a long-form writing
//! tool. A project is a folder of JSON files: per-purpose outline trees
//! of typed items, and one rich-text document body per outline leaf.
//!
//! # Quick Start
//!
//! ```text
//! let mut project = Project::create(path, "My Novel")?;
//!
//! // Build the outline
//! let book = project.add_child(ModelKind::Story, None, ItemKind::Book, None)?;
//! let page = project.add_child(ModelKind::Story, Some(book), ItemKind::Page, None)?;
//!
//! // Write a document body
//! project.open_document_or_create(page)?;
//! project.document_mut().unwrap().set_content(blocks);
//! project.save()?;
//! ```
//!
//! # Modules
//!
//! - `project`: project context and command surface (main entry point)
//! - `outline`: item kinds, adjacency rules and the outline trees
//! - `text`: block/run model, format catalog and the tagged JSON codec
//! - `document`: document bodies and their save lifecycle
//! - `storage`: project folder layout and atomic JSON file I/O
//! - `config`: application configuration

pub mod config;
pub mod document;
pub mod outline;
pub mod project;
pub mod storage;
pub mod text;

pub use config::Config;
pub use document::{Document, DocumentError};
pub use outline::{AddLocation, Item, ItemId, ItemKind, ModelKind, OutlineTree, TreeError};
pub use project::{Project, ProjectError};
pub use storage::{ProjectStore, StorageError};
pub use text::{Alignment, Block, BlockKind, FirstLineIndent, FormatCatalog, TextRun};
