//! Chunk persistence with completion markers.
//!
//! A document's text chunks are appended in order and its docInfo
//! marker is appended strictly after the last of them. A crash can
//! therefore only leave trailing text chunks without a marker,
//! which [`purge_fragments`](crate::core::storage::purge_fragments)
//! knows how to remove.

use std::path::PathBuf;

use chrono::Utc;

use crate::core::error::{Result, XtIndexError};
use crate::core::storage::{ChunkPos, ChunkStore};
use crate::core::types::{Chunk, DocInfo};

/// Default number of appended chunks between intermediate commits
pub const DEFAULT_COMMIT_EVERY: usize = 1000;

/// A planned document ready to be written
#[derive(Debug, Clone)]
pub struct DocumentChunks {
    pub doc_key: String,
    pub source_path: PathBuf,
    pub tree_path: Option<PathBuf>,

    /// Words in the document after filtering
    pub word_count: usize,

    /// Text chunks in document order
    pub chunks: Vec<Chunk>,
}

/// Appends documents to a chunk store
#[derive(Debug)]
pub struct ChunkWriter<S: ChunkStore> {
    store: S,
    commit_every: usize,
    uncommitted: usize,
}

impl<S: ChunkStore> ChunkWriter<S> {
    pub fn new(store: S) -> Self {
        Self::with_commit_every(store, DEFAULT_COMMIT_EVERY)
    }

    /// Commit after every `commit_every` appended chunks (at least one)
    pub fn with_commit_every(store: S, commit_every: usize) -> Self {
        Self {
            store,
            commit_every: commit_every.max(1),
            uncommitted: 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn append(&mut self, chunk: &Chunk) -> Result<ChunkPos> {
        let pos = self.store.append(chunk)?;
        self.uncommitted += 1;
        if self.uncommitted >= self.commit_every {
            self.store.commit()?;
            self.uncommitted = 0;
        }
        Ok(pos)
    }

    /// Write all text chunks of a document, then its marker, then
    /// commit. Returns the marker's position.
    ///
    /// # Errors
    ///
    /// Rejects chunks that belong to another document, are out of
    /// order, or are themselves markers. A store failure part way
    /// through leaves the appended chunks without a marker.
    pub fn write_document(&mut self, document: &DocumentChunks) -> Result<ChunkPos> {
        for (expected_seq, chunk) in document.chunks.iter().enumerate() {
            if chunk.doc_key != document.doc_key || chunk.seq != expected_seq || chunk.is_doc_info()
            {
                return Err(XtIndexError::IndexingFailed(format!(
                    "Chunk {} of '{}' does not belong at position {} of '{}'",
                    chunk.seq, chunk.doc_key, expected_seq, document.doc_key
                )));
            }
        }

        for chunk in &document.chunks {
            self.append(chunk)?;
        }

        let marker = Chunk::marker(
            &document.doc_key,
            DocInfo {
                chunk_count: document.chunks.len(),
                word_count: document.word_count,
                source_path: document.source_path.clone(),
                tree_path: document.tree_path.clone(),
                indexed_at: Utc::now(),
            },
        );
        let pos = self.append(&marker)?;
        self.commit()?;

        tracing::debug!(
            "Wrote '{}': {} chunks, marker at {}",
            document.doc_key,
            document.chunks.len(),
            pos
        );
        Ok(pos)
    }

    /// Tombstone every chunk of a document, including its marker.
    /// Not committed until the next write or [`ChunkWriter::commit`].
    pub fn remove_document(&mut self, doc_key: &str) -> Result<usize> {
        let removed = self.store.tombstone_document(doc_key)?;
        if removed > 0 {
            tracing::debug!("Removed {} chunks of '{}'", removed, doc_key);
        }
        Ok(removed)
    }

    pub fn commit(&mut self) -> Result<()> {
        self.store.commit()?;
        self.uncommitted = 0;
        Ok(())
    }

    /// Commit outstanding work and close the store
    pub fn finish(mut self) -> Result<S> {
        self.commit()?;
        self.store.close()?;
        Ok(self.store)
    }
}
