//! Persistent chunk storage and repair.
//!
//! # Architecture
//!
//! - **ChunkStore / StoreBackend**: positional, append-only store
//!   interface used by the writer and the cleaner
//! - **TantivyChunkStore**: the store on top of a Tantivy index
//! - **IndexCleaner**: recursive repair of interrupted writes
//!
//! # Index Storage Structure
//!
//! ```text
//! {db}/
//! ├── chunks/                 # Tantivy chunk store
//! │   ├── .managed.json
//! │   ├── meta.json           # Commit payload holds next position
//! │   └── [segment files]
//! └── trees/
//!     └── {doc_key}.xtree     # Persisted document trees
//! ```

pub mod cleaner;
#[cfg(test)]
pub(crate) mod memory;
pub mod store;
mod tantivy;

pub use cleaner::{purge_fragments, CleanReport, IndexCleaner, PURGE_MARKER_FILE};
pub use store::{ChunkPos, ChunkStore, StoreBackend};
pub use self::tantivy::{
    create_schema, TantivyBackend, TantivyChunkStore, SCHEMA_VERSION, STORE_MARKER_FILE,
};
