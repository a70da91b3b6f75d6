//! Storage layer
//!
//! The file collaborator: raw JSON blobs keyed by file name or by outline
//! handle, living inside one project folder. Read and write failures are
//! reported as typed errors and never panic.

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::{ProjectStore, FORMAT_VERSION, PROJECT_MARKER};
