//! Document handling
//!
//! One document is the rich-text body of an outline leaf, stored as a
//! JSON file keyed by the leaf's handle. The struct tracks the lifecycle:
//! a document is opened (never created implicitly), edits mark it
//! unsaved, and saving runs under a reentrancy guard so an autosave tick
//! cannot overlap an explicit save delivered re-entrantly on the same
//! thread. A locked save attempt is rejected, not queued; the next tick
//! picks the dirty state up again.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::storage::{ProjectStore, StorageError};
use crate::text::{codec, Block};

/// Errors that can occur during document operations
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A save is already in progress for this document
    #[error("document {0} is locked by another save")]
    Locked(Uuid),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Format marker stored in every document file
const FORMAT_TAG: &str = "document";

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// An open document body and its save state
#[derive(Debug)]
pub struct Document {
    handle: Uuid,
    created: String,
    updated: String,
    content: Vec<Block>,
    unsaved: bool,
    locked: bool,
}

impl Document {
    /// Create a brand-new empty document for a leaf with no stored body
    ///
    /// The new document is marked unsaved so the first flush persists it.
    pub fn create(handle: Uuid) -> Self {
        let now = timestamp();
        Self {
            handle,
            created: now.clone(),
            updated: now,
            content: Vec::new(),
            unsaved: true,
            locked: false,
        }
    }

    /// Open a stored document body
    ///
    /// A fetch failure propagates; it does not fall back to an empty
    /// document.
    pub fn open(store: &ProjectStore, handle: Uuid) -> Result<Self, StorageError> {
        let json = store.load_document(handle)?;

        let created = json
            .get("m:created")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let updated = json
            .get("m:updated")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let content = match json.get("x:content") {
            Some(body) => codec::decode(body),
            None => Vec::new(),
        };

        debug!(handle = %handle, blocks = content.len(), "Opened document");
        Ok(Self {
            handle,
            created,
            updated,
            content,
            unsaved: false,
            locked: false,
        })
    }

    pub fn handle(&self) -> Uuid {
        self.handle
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn updated(&self) -> &str {
        &self.updated
    }

    pub fn content(&self) -> &[Block] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the document has edits that are not on disk
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Hold or release the save guard
    ///
    /// Not a mutex: a save attempted while locked is skipped outright.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Replace the document content, marking it unsaved
    pub fn set_content(&mut self, content: Vec<Block>) {
        self.content = content;
        self.doc_changed();
    }

    /// Append one block, marking the document unsaved
    pub fn push_block(&mut self, block: Block) {
        self.content.push(block);
        self.doc_changed();
    }

    fn doc_changed(&mut self) {
        self.updated = timestamp();
        self.unsaved = true;
    }

    /// Encode the content and persist it under the document's handle
    ///
    /// Rejected with `Locked` when the guard is held. On success the
    /// document is clean again.
    pub fn save(&mut self, store: &ProjectStore) -> Result<(), DocumentError> {
        if self.locked {
            info!(handle = %self.handle, "Document is locked, save skipped");
            return Err(DocumentError::Locked(self.handle));
        }

        self.locked = true;
        let body = json!({
            "c:format": FORMAT_TAG,
            "m:created": self.created,
            "m:updated": self.updated,
            "x:content": codec::encode(&self.content),
        });
        let result = store.save_document(self.handle, &body);
        self.locked = false;

        result?;
        self.unsaved = false;
        debug!(handle = %self.handle, "Saved document");
        Ok(())
    }

    /// Flush the document if it has unsaved edits
    ///
    /// Returns whether a save actually ran. A locked document is left
    /// dirty for the next tick; only storage failures propagate.
    pub fn flush(&mut self, store: &ProjectStore) -> Result<bool, DocumentError> {
        if !self.unsaved {
            return Ok(false);
        }
        match self.save(store) {
            Ok(()) => Ok(true),
            Err(DocumentError::Locked(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextRun;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::create(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_missing_fails() {
        let (_dir, store) = store();
        let err = Document::open(&store, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_save_and_reopen() {
        let (_dir, store) = store();
        let handle = Uuid::new_v4();

        let mut doc = Document::create(handle);
        assert!(doc.is_unsaved());
        doc.set_content(vec![
            Block::heading(1).with_text("Title"),
            Block::paragraph().with_text("Body text"),
        ]);
        doc.save(&store).unwrap();
        assert!(!doc.is_unsaved());

        let reopened = Document::open(&store, handle).unwrap();
        assert_eq!(reopened.content(), doc.content());
        assert_eq!(reopened.created(), doc.created());
        assert!(!reopened.is_unsaved());
    }

    #[test]
    fn test_envelope_shape() {
        let (_dir, store) = store();
        let handle = Uuid::new_v4();

        let mut doc = Document::create(handle);
        doc.push_block(Block::paragraph().with_text("x"));
        doc.save(&store).unwrap();

        let raw = store.load_document(handle).unwrap();
        assert_eq!(raw["c:format"], "document");
        assert!(raw["m:created"].is_string());
        assert!(raw["m:updated"].is_string());
        assert!(raw["x:content"].is_array());
    }

    #[test]
    fn test_locked_save_rejected() {
        let (_dir, store) = store();
        let mut doc = Document::create(Uuid::new_v4());
        doc.push_block(Block::paragraph().with_text("x"));

        doc.set_locked(true);
        assert!(matches!(
            doc.save(&store).unwrap_err(),
            DocumentError::Locked(_)
        ));
        // Still dirty; the next tick catches it
        assert!(doc.is_unsaved());

        assert!(!doc.flush(&store).unwrap());
        doc.set_locked(false);
        assert!(doc.flush(&store).unwrap());
        assert!(!doc.is_unsaved());
    }

    #[test]
    fn test_flush_clean_is_noop() {
        let (_dir, store) = store();
        let handle = Uuid::new_v4();
        let mut doc = Document::create(handle);
        doc.save(&store).unwrap();
        assert!(!doc.flush(&store).unwrap());
    }

    #[test]
    fn test_edit_marks_unsaved() {
        let (_dir, store) = store();
        let handle = Uuid::new_v4();
        let mut doc = Document::create(handle);
        doc.save(&store).unwrap();

        let mut run = TextRun::plain("edited");
        run.bold = true;
        doc.set_content(vec![Block {
            runs: vec![run],
            ..Block::paragraph()
        }]);
        assert!(doc.is_unsaved());
    }
}
