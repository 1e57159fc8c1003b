//! Chunk store interface.
//!
//! A store is an append-only sequence of chunks addressed by
//! position `0..count`. Chunks are never modified in place; they
//! can only be tombstoned (logically deleted). Everything above
//! the storage layer (writer, repair pass, pipeline) talks to the
//! store through these traits only.

use std::path::Path;

use crate::core::error::Result;
use crate::core::types::Chunk;

/// Position of a chunk within its store
pub type ChunkPos = u64;

/// An open chunk store
pub trait ChunkStore {
    /// Directory holding the store
    fn path(&self) -> &Path;

    /// Number of positions ever allocated; valid positions are
    /// `0..count()`, some of which may be tombstoned
    fn count(&self) -> ChunkPos;

    /// Number of chunks that are not tombstoned
    fn live_count(&self) -> ChunkPos;

    /// Whether the chunk at `pos` is tombstoned (or was never written)
    fn is_deleted(&self, pos: ChunkPos) -> Result<bool>;

    /// Read the live chunk at `pos`
    fn read_chunk(&self, pos: ChunkPos) -> Result<Chunk>;

    /// Append a chunk, returning its position. Not durable until
    /// [`ChunkStore::commit`].
    fn append(&mut self, chunk: &Chunk) -> Result<ChunkPos>;

    /// Tombstone the chunk at `pos`. Not durable until
    /// [`ChunkStore::commit`].
    fn tombstone(&mut self, pos: ChunkPos) -> Result<()>;

    /// Tombstone every chunk of a document, returning how many
    /// live chunks it had
    fn tombstone_document(&mut self, doc_key: &str) -> Result<usize>;

    /// Make all appends and tombstones durable
    fn commit(&mut self) -> Result<()>;

    /// Release the store, waiting for background work that may
    /// still touch its files. Uncommitted changes are discarded.
    fn close(&mut self) -> Result<()>;
}

/// Opens and creates stores of one concrete kind
pub trait StoreBackend {
    type Store: ChunkStore;

    /// File whose presence marks a directory as holding a store
    fn marker_file(&self) -> &str;

    /// Whether `dir` contains a store
    fn exists(&self, dir: &Path) -> bool {
        dir.join(self.marker_file()).is_file()
    }

    /// Delete one file of a store that is being removed
    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }

    /// Open the store in `dir`
    fn open(&self, dir: &Path) -> Result<Self::Store>;

    /// Create an empty store in `dir` (creating the directory)
    fn create(&self, dir: &Path) -> Result<Self::Store>;

    /// Open the store in `dir`, creating it when absent
    fn open_or_create(&self, dir: &Path) -> Result<Self::Store> {
        if self.exists(dir) {
            self.open(dir)
        } else {
            self.create(dir)
        }
    }
}
