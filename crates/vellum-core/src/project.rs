//! Project context
//!
//! `Project` ties the pieces together: the file store, the project
//! metadata, the four outline trees and the currently open document. It
//! is an explicit context object passed to whoever needs it; the core
//! keeps no global state.
//!
//! All commands are synchronous and return a typed result. Structural
//! violations are rejected at this boundary; storage failures abort the
//! specific operation and propagate.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::{Document, DocumentError};
use crate::outline::{
    AddLocation, ItemId, ItemKind, ModelKind, OutlineTree, TreeError, MODEL_KINDS,
};
use crate::storage::{ProjectStore, StorageError};

/// Errors from project-level commands
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// No item with this handle exists in the addressed tree
    #[error("unknown item handle: {0}")]
    UnknownHandle(Uuid),

    /// The item exists but its kind cannot hold a document body
    #[error("a {0} item cannot hold a document")]
    NotADocumentItem(ItemKind),

    /// A document command was issued with no document open
    #[error("no document is open")]
    NoOpenDocument,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One open writing project
#[derive(Debug)]
pub struct Project {
    store: ProjectStore,
    name: String,
    created: String,
    trees: Vec<OutlineTree>,
    current: Option<Document>,
}

impl Project {
    /// Create a new project folder with empty trees and save it
    pub fn create(path: &Path, name: &str) -> Result<Self, ProjectError> {
        let store = ProjectStore::create(path)?;
        let mut project = Self {
            store,
            name: normalize_name(name),
            created: timestamp(),
            trees: MODEL_KINDS.iter().map(|kind| OutlineTree::new(*kind)).collect(),
            current: None,
        };
        project.save()?;
        info!("Created project '{}' at {:?}", project.name, path);
        Ok(project)
    }

    /// Open an existing project folder
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        let store = ProjectStore::open(path)?;

        let meta = store.load_file("project")?;
        let created = meta
            .pointer("/meta/created")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let name = meta
            .pointer("/project/name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let mut trees = Vec::with_capacity(MODEL_KINDS.len());
        for kind in MODEL_KINDS {
            if store.has_file(kind.file_stem()) {
                let json = store.load_file(kind.file_stem())?;
                trees.push(OutlineTree::from_json(kind, &json)?);
            } else {
                warn!("Project has no {} file, starting empty", kind.file_stem());
                trees.push(OutlineTree::new(kind));
            }
        }

        info!("Opened project at {:?}", path);
        Ok(Self {
            store,
            name: normalize_name(&name),
            created,
            trees,
            current: None,
        })
    }

    /// Save the project: open document, metadata and all trees
    pub fn save(&mut self) -> Result<(), ProjectError> {
        if let Some(doc) = self.current.as_mut() {
            doc.flush(&self.store)?;
        }

        let meta = json!({
            "meta": {
                "created": self.created,
                "updated": timestamp(),
            },
            "project": {
                "name": self.name,
            },
            "settings": {},
        });
        self.store.save_file("project", &meta)?;

        for tree in &self.trees {
            self.store
                .save_file(tree.kind().file_stem(), &tree.to_json())?;
        }
        info!("Saved project '{}'", self.name);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = normalize_name(name);
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Borrow one of the project's trees
    ///
    /// Only the kinds in `MODEL_KINDS` are stored; addressing
    /// `ModelKind::Invalid` is a caller bug.
    pub fn tree(&self, kind: ModelKind) -> &OutlineTree {
        &self.trees[Self::tree_index(kind)]
    }

    pub fn tree_mut(&mut self, kind: ModelKind) -> &mut OutlineTree {
        &mut self.trees[Self::tree_index(kind)]
    }

    fn tree_index(kind: ModelKind) -> usize {
        let index = MODEL_KINDS.iter().position(|k| *k == kind);
        debug_assert!(index.is_some(), "not an addressable tree: {kind:?}");
        index.unwrap_or(0)
    }

    fn resolve(&self, tree: ModelKind, handle: Uuid) -> Result<ItemId, ProjectError> {
        self.tree(tree)
            .find_by_handle(handle)
            .ok_or(ProjectError::UnknownHandle(handle))
    }

    // -------------------------------------------------------------------
    // Outline commands
    // -------------------------------------------------------------------

    /// Add a child item; `parent` of `None` targets the tree root
    ///
    /// Returns the new item's handle.
    pub fn add_child(
        &mut self,
        tree: ModelKind,
        parent: Option<Uuid>,
        kind: ItemKind,
        pos: Option<usize>,
    ) -> Result<Uuid, ProjectError> {
        let parent_id = match parent {
            Some(handle) => self.resolve(tree, handle)?,
            None => self.tree(tree).root(),
        };
        let id = self.tree_mut(tree).add_child(parent_id, kind, pos)?;
        Ok(self.handle_of(tree, id))
    }

    /// Add a sibling next to the anchor item
    pub fn add_sibling(
        &mut self,
        tree: ModelKind,
        anchor: Uuid,
        kind: ItemKind,
        loc: AddLocation,
    ) -> Result<Uuid, ProjectError> {
        let anchor_id = self.resolve(tree, anchor)?;
        let id = self.tree_mut(tree).add_sibling(anchor_id, kind, loc)?;
        Ok(self.handle_of(tree, id))
    }

    fn handle_of(&self, tree: ModelKind, id: ItemId) -> Uuid {
        self.tree(tree)
            .item(id)
            .and_then(|item| item.handle())
            .unwrap_or_default()
    }

    pub fn rename(
        &mut self,
        tree: ModelKind,
        handle: Uuid,
        name: &str,
    ) -> Result<(), ProjectError> {
        let id = self.resolve(tree, handle)?;
        self.tree_mut(tree).rename(id, name)?;
        Ok(())
    }

    pub fn set_expanded(
        &mut self,
        tree: ModelKind,
        handle: Uuid,
        state: bool,
    ) -> Result<(), ProjectError> {
        let id = self.resolve(tree, handle)?;
        self.tree_mut(tree).set_expanded(id, state)?;
        Ok(())
    }

    pub fn set_word_count(
        &mut self,
        tree: ModelKind,
        handle: Uuid,
        words: u32,
    ) -> Result<(), ProjectError> {
        let id = self.resolve(tree, handle)?;
        self.tree_mut(tree).set_word_count(id, words)?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Document commands
    // -------------------------------------------------------------------

    /// Find the handle's item kind across all trees
    fn item_kind(&self, handle: Uuid) -> Result<ItemKind, ProjectError> {
        for tree in &self.trees {
            if let Some(id) = tree.find_by_handle(handle) {
                if let Some(item) = tree.item(id) {
                    return Ok(item.kind());
                }
            }
        }
        Err(ProjectError::UnknownHandle(handle))
    }

    fn check_document_item(&self, handle: Uuid) -> Result<(), ProjectError> {
        let kind = self.item_kind(handle)?;
        if !kind.can_hold_document() {
            return Err(ProjectError::NotADocumentItem(kind));
        }
        Ok(())
    }

    /// Open the document body owned by an outline leaf
    ///
    /// Any previously open document is flushed first, so navigation never
    /// loses edits. A missing body is an error; it is not created
    /// implicitly.
    pub fn open_document(&mut self, handle: Uuid) -> Result<&Document, ProjectError> {
        self.check_document_item(handle)?;
        self.close_document()?;
        let doc = Document::open(&self.store, handle)?;
        Ok(self.current.insert(doc))
    }

    /// Open the leaf's document, creating an empty body if none is stored
    pub fn open_document_or_create(&mut self, handle: Uuid) -> Result<&Document, ProjectError> {
        self.check_document_item(handle)?;
        self.close_document()?;
        let doc = if self.store.has_document(handle) {
            Document::open(&self.store, handle)?
        } else {
            Document::create(handle)
        };
        Ok(self.current.insert(doc))
    }

    pub fn document(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.current.as_mut()
    }

    /// Explicit save of the open document
    ///
    /// A locked document propagates `DocumentError::Locked`; the caller
    /// decides whether that is worth reporting.
    pub fn save_document(&mut self) -> Result<(), ProjectError> {
        let doc = self.current.as_mut().ok_or(ProjectError::NoOpenDocument)?;
        doc.save(&self.store)?;
        Ok(())
    }

    /// Periodic autosave tick
    ///
    /// Saves the open document only when it is dirty and unlocked.
    /// Returns whether a save ran. With no document open this is a no-op.
    pub fn autosave_tick(&mut self) -> Result<bool, ProjectError> {
        match self.current.as_mut() {
            Some(doc) => Ok(doc.flush(&self.store)?),
            None => Ok(false),
        }
    }

    /// Close the open document, flushing unsaved edits first
    ///
    /// A failed flush aborts the close: the document stays open and dirty
    /// so the edits are still recoverable.
    pub fn close_document(&mut self) -> Result<(), ProjectError> {
        if let Some(doc) = self.current.as_mut() {
            doc.flush(&self.store)?;
        }
        self.current = None;
        Ok(())
    }
}

/// Collapse runs of whitespace in a project name
fn normalize_name(name: &str) -> String {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        String::from("Unnamed Project")
    } else {
        name
    }
}
