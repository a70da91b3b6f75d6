//! Project file store
//!
//! One project is one folder:
//!
//! - `project.vellum` - marker file with application and format versions
//! - `project/` - named JSON files (project meta, one file per tree)
//! - `content/` - document bodies, one `<uuid>.json` per outline handle
//!
//! All writes go through an atomic temp-file-and-rename so a file is
//! never left partially written.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{StorageError, StorageResult};

/// Marker file identifying a project folder
pub const PROJECT_MARKER: &str = "project.vellum";

/// Version of the on-disk project format
pub const FORMAT_VERSION: &str = "0.2";

/// File-backed store for one project folder
#[derive(Debug)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Create a new project folder, or adopt an existing empty one
    pub fn create(path: &Path) -> StorageResult<Self> {
        fs::create_dir_all(path).map_err(|source| StorageError::CreateFolder {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            root: path.to_path_buf(),
        };
        store.ensure_folder("project")?;
        store.ensure_folder("content")?;
        store.write_marker()?;
        info!("Created project folder {:?}", store.root);
        Ok(store)
    }

    /// Open an existing project folder
    ///
    /// The folder must carry the marker file; anything else is rejected
    /// with `NotAProject`.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let marker = path.join(PROJECT_MARKER);
        if !marker.is_file() {
            return Err(StorageError::NotAProject {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(&marker)
            .map_err(|source| StorageError::from_io(source, marker.clone()))?;
        if !content.lines().any(|line| line.starts_with("Vellum ")) {
            return Err(StorageError::NotAProject {
                path: path.to_path_buf(),
            });
        }
        debug!("Opened project folder {:?}", path);
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_marker(&self) -> StorageResult<()> {
        let content = format!(
            "Vellum {}\nProject {}\n",
            env!("CARGO_PKG_VERSION"),
            FORMAT_VERSION
        );
        atomic_write(&self.root.join(PROJECT_MARKER), content.as_bytes())
    }

    fn ensure_folder(&self, name: &str) -> StorageResult<PathBuf> {
        let path = self.root.join(name);
        if !path.is_dir() {
            fs::create_dir_all(&path).map_err(|source| StorageError::CreateFolder {
                path: path.clone(),
                source,
            })?;
        }
        Ok(path)
    }

    fn named_path(&self, name: &str) -> PathBuf {
        self.root.join("project").join(format!("{name}.json"))
    }

    fn document_path(&self, handle: Uuid) -> PathBuf {
        self.root.join("content").join(format!("{handle}.json"))
    }

    /// Whether a named project file exists
    pub fn has_file(&self, name: &str) -> bool {
        self.named_path(name).is_file()
    }

    /// Load a named JSON file from the `project/` folder
    pub fn load_file(&self, name: &str) -> StorageResult<Value> {
        read_json(&self.named_path(name))
    }

    /// Save a named JSON file to the `project/` folder
    pub fn save_file(&self, name: &str, data: &Value) -> StorageResult<()> {
        self.ensure_folder("project")?;
        write_json(&self.named_path(name), data)
    }

    /// Whether a document body exists for the handle
    pub fn has_document(&self, handle: Uuid) -> bool {
        self.document_path(handle).is_file()
    }

    /// Load a document body keyed by its outline handle
    pub fn load_document(&self, handle: Uuid) -> StorageResult<Value> {
        read_json(&self.document_path(handle))
    }

    /// Save a document body keyed by its outline handle
    pub fn save_document(&self, handle: Uuid, data: &Value) -> StorageResult<()> {
        self.ensure_folder("content")?;
        write_json(&self.document_path(handle), data)
    }
}

fn read_json(path: &Path) -> StorageResult<Value> {
    let content =
        fs::read_to_string(path).map_err(|source| StorageError::from_io(source, path.into()))?;
    serde_json::from_str(&content).map_err(|err| StorageError::InvalidJson {
        path: path.into(),
        details: err.to_string(),
    })
}

fn write_json(path: &Path, data: &Value) -> StorageResult<()> {
    let content = serde_json::to_vec_pretty(data).map_err(|err| StorageError::InvalidJson {
        path: path.into(),
        details: err.to_string(),
    })?;
    atomic_write(path, &content)
}

/// Write to a temp file in the same folder, then rename over the target
fn atomic_write(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let tmp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&tmp_path).map_err(|source| StorageError::WriteError {
        path: tmp_path.clone(),
        source,
    })?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|source| StorageError::WriteError {
            path: tmp_path.clone(),
            source,
        })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: tmp_path,
        to: path.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_create_and_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("novel");

        let store = ProjectStore::create(&path).unwrap();
        assert!(path.join(PROJECT_MARKER).is_file());
        assert!(path.join("project").is_dir());
        assert!(path.join("content").is_dir());
        drop(store);

        ProjectStore::open(&path).unwrap();
    }

    #[test]
    fn test_open_rejects_plain_folder() {
        let dir = TempDir::new().unwrap();
        let err = ProjectStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::NotAProject { .. }));
    }

    #[test]
    fn test_named_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::create(dir.path()).unwrap();

        assert!(!store.has_file("story"));
        let data = json!({"type": "ROOT", "items": []});
        store.save_file("story", &data).unwrap();
        assert!(store.has_file("story"));
        assert_eq!(store.load_file("story").unwrap(), data);
    }

    #[test]
    fn test_document_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::create(dir.path()).unwrap();

        let handle = Uuid::new_v4();
        assert!(!store.has_document(handle));
        let body = json!([{"u:fmt": "p:al", "u:txt": "t|Hello"}]);
        store.save_document(handle, &body).unwrap();
        assert!(store.has_document(handle));
        assert_eq!(store.load_document(handle).unwrap(), body);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::create(dir.path()).unwrap();
        let err = store.load_document(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_json_is_typed() {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::create(dir.path()).unwrap();
        std::fs::write(dir.path().join("project/broken.json"), "{nope").unwrap();
        let err = store.load_file("broken").unwrap_err();
        assert!(matches!(err, StorageError::InvalidJson { .. }));
    }
}
