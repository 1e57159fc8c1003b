//! Document indexing module.
//!
//! Turns a directory of XML sources into a chunk store plus one
//! navigable tree file per document. Key features:
//!
//! - Overlapping word-window chunking with a fixed plan per document
//! - Completion markers written after every document's chunks
//! - File system walking with wildcard skip patterns
//! - Indexing pipeline orchestration
//!
//! # Completeness
//!
//! The [`ChunkWriter`] appends a document's marker only after all of
//! its chunks, so a crash mid-document leaves a tail of chunks with
//! no marker. The storage cleaner removes exactly that tail on the
//! next run.

pub mod chunker;
pub mod pipeline;
pub mod walker;
pub mod writer;

pub use chunker::{Chunker, MIN_CHUNK_SIZE};
pub use pipeline::{extract_text, IndexingPipeline, PreparedDocument};
pub use walker::FileWalker;
pub use writer::{ChunkWriter, DocumentChunks, DEFAULT_COMMIT_EVERY};
