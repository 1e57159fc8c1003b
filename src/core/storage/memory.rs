//! In-memory chunk store for unit tests.

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::error::{Result, XtIndexError};
use crate::core::storage::store::{ChunkPos, ChunkStore};
use crate::core::types::Chunk;

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub chunks: Vec<Chunk>,
    pub deleted: BTreeSet<ChunkPos>,
    /// Positions durable as of the last commit
    pub committed: usize,
    pub commits: usize,
    /// Tombstoning this position fails
    pub fail_tombstone_at: Option<ChunkPos>,
    /// Appends fail once this many chunks exist
    pub fail_append_after: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_positions(&self) -> Vec<ChunkPos> {
        (0..self.chunks.len() as ChunkPos)
            .filter(|pos| !self.deleted.contains(pos))
            .collect()
    }
}

impl ChunkStore for MemoryStore {
    fn path(&self) -> &Path {
        Path::new("memory")
    }

    fn count(&self) -> ChunkPos {
        self.chunks.len() as ChunkPos
    }

    fn live_count(&self) -> ChunkPos {
        self.count() - self.deleted.len() as ChunkPos
    }

    fn is_deleted(&self, pos: ChunkPos) -> Result<bool> {
        Ok(pos >= self.count() || self.deleted.contains(&pos))
    }

    fn read_chunk(&self, pos: ChunkPos) -> Result<Chunk> {
        if self.is_deleted(pos)? {
            return Err(XtIndexError::StorageError(format!("Chunk {pos} is deleted")));
        }
        Ok(self.chunks[pos as usize].clone())
    }

    fn append(&mut self, chunk: &Chunk) -> Result<ChunkPos> {
        if self
            .fail_append_after
            .is_some_and(|limit| self.chunks.len() >= limit)
        {
            return Err(XtIndexError::StorageError("disk full".to_string()));
        }
        self.chunks.push(chunk.clone());
        Ok(self.count() - 1)
    }

    fn tombstone(&mut self, pos: ChunkPos) -> Result<()> {
        if self.fail_tombstone_at == Some(pos) {
            return Err(XtIndexError::StorageError(format!(
                "Injected failure at {pos}"
            )));
        }
        if self.is_deleted(pos)? {
            return Err(XtIndexError::StorageError(format!("Chunk {pos} is deleted")));
        }
        self.deleted.insert(pos);
        Ok(())
    }

    fn tombstone_document(&mut self, doc_key: &str) -> Result<usize> {
        let positions: Vec<ChunkPos> = self
            .live_positions()
            .into_iter()
            .filter(|pos| self.chunks[*pos as usize].doc_key == doc_key)
            .collect();
        self.deleted.extend(positions.iter().copied());
        Ok(positions.len())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = self.chunks.len();
        self.commits += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
