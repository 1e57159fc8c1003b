//! Core data types for xtindex.
//!
//! This module defines the records that flow between the chunk
//! planner, the chunk writer and the persistent store, plus the
//! statistics reported by indexing and repair runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Word range of one planned chunk window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// Sequential chunk number within the document
    pub index: usize,

    /// Index of the first word in the window
    pub start_word: usize,

    /// Index one past the last word in the window
    pub end_word: usize,
}

impl ChunkSpan {
    pub fn word_count(&self) -> usize {
        self.end_word - self.start_word
    }
}

/// Summary carried by the terminal marker chunk of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocInfo {
    /// Number of text chunks written before the marker
    pub chunk_count: usize,

    /// Number of words in the document
    pub word_count: usize,

    /// Source file the document was read from
    pub source_path: PathBuf,

    /// Persisted tree for structural navigation, if any
    pub tree_path: Option<PathBuf>,

    pub indexed_at: DateTime<Utc>,
}

/// A persisted record: one text window of a document, or the
/// docInfo marker that completes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Identity of the owning document
    pub doc_key: String,

    /// Position within the document's chunk sequence; the marker
    /// comes after every text chunk
    pub seq: usize,

    /// The window's text (empty for the marker)
    pub text: String,

    /// Index of the first word in the window
    pub start_word: usize,

    /// Number of words in the window
    pub word_count: usize,

    /// Present only on the docInfo marker
    pub doc_info: Option<DocInfo>,
}

impl Chunk {
    /// Build a text window chunk
    pub fn text(doc_key: &str, span: ChunkSpan, text: impl Into<String>) -> Self {
        Self {
            doc_key: doc_key.to_string(),
            seq: span.index,
            text: text.into(),
            start_word: span.start_word,
            word_count: span.word_count(),
            doc_info: None,
        }
    }

    /// Build the docInfo marker for a document
    pub fn marker(doc_key: &str, info: DocInfo) -> Self {
        Self {
            doc_key: doc_key.to_string(),
            seq: info.chunk_count,
            text: String::new(),
            start_word: 0,
            word_count: info.word_count,
            doc_info: Some(info),
        }
    }

    pub fn is_doc_info(&self) -> bool {
        self.doc_info.is_some()
    }
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Index name from the configuration
    pub index: String,

    /// Number of documents written completely
    pub documents_indexed: usize,

    /// Documents skipped because they could not be read or parsed
    pub documents_skipped: usize,

    /// Total text chunks created
    pub chunks_created: usize,

    /// Total words indexed (after stop-word removal)
    pub words_indexed: usize,

    /// Fragments purged by the pre-indexing repair pass
    pub fragments_purged: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}
