//! Rich text model and codec
//!
//! Blocks and runs are the in-memory representation of a document body;
//! the codec maps them to the tagged JSON array stored on disk, and the
//! format catalog turns a block into concrete rendering metrics.

pub mod block;
pub mod codec;
pub mod format;

pub use block::{Alignment, Block, BlockKind, FirstLineIndent, TextRun, LINE_SEPARATOR};
pub use format::{BlockStyle, FormatCatalog};
