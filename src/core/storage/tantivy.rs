//! Tantivy-backed chunk store.
//!
//! Each store directory holds one Tantivy index. Tantivy has no
//! notion of stable document positions, so every chunk carries an
//! explicit indexed `chunk_pos` field and lookups by position are
//! term queries. The next free position is written into the commit
//! payload, which keeps positions monotonic even after the tail of
//! the store has been tombstoned and merged away.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tantivy::collector::{DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, INDEXED, STORED, STRING, TEXT};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::core::error::{Result, XtIndexError};
use crate::core::storage::store::{ChunkPos, ChunkStore, StoreBackend};
use crate::core::types::{Chunk, DocInfo};

/// Current schema version
/// Version 1: chunk records with positional addressing and docInfo markers
pub const SCHEMA_VERSION: u32 = 1;

/// File whose presence marks a directory as holding a store
pub const STORE_MARKER_FILE: &str = "meta.json";

/// Writer heap (50MB, single indexing thread keeps segments in append order)
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for chunk storage
///
/// Fields:
/// - doc_key: Owning document identity (STRING | STORED)
/// - chunk_pos: Position within the store (u64 INDEXED | STORED)
/// - seq: Position within the document (u64 STORED)
/// - text: Full-text searchable window (TEXT | STORED)
/// - start_word: First word of the window (u64 STORED)
/// - word_count: Words in the window (u64 STORED)
/// - doc_info: JSON summary, present only on the marker (STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("doc_key", STRING | STORED);
    builder.add_u64_field("chunk_pos", INDEXED | STORED);
    builder.add_u64_field("seq", STORED);

    // Searchable text content
    builder.add_text_field("text", TEXT | STORED);

    builder.add_u64_field("start_word", STORED);
    builder.add_u64_field("word_count", STORED);
    builder.add_text_field("doc_info", STORED);

    builder.build()
}

#[derive(Debug, Clone, Copy)]
struct ChunkFields {
    doc_key: Field,
    chunk_pos: Field,
    seq: Field,
    text: Field,
    start_word: Field,
    word_count: Field,
    doc_info: Field,
}

impl ChunkFields {
    fn resolve(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| XtIndexError::StorageError(format!("Missing {name} field: {e}")))
        };

        Ok(Self {
            doc_key: field("doc_key")?,
            chunk_pos: field("chunk_pos")?,
            seq: field("seq")?,
            text: field("text")?,
            start_word: field("start_word")?,
            word_count: field("word_count")?,
            doc_info: field("doc_info")?,
        })
    }
}

/// Metadata carried in every commit
#[derive(Debug, Serialize, Deserialize)]
struct CommitPayload {
    schema_version: u32,
    next_position: ChunkPos,
}

fn storage_err(context: &str) -> impl Fn(tantivy::TantivyError) -> XtIndexError + '_ {
    move |e| XtIndexError::StorageError(format!("{context}: {e}"))
}

/// Chunk store in a single Tantivy index directory
pub struct TantivyChunkStore {
    dir: PathBuf,
    index: Index,
    fields: ChunkFields,
    reader: IndexReader,

    /// Opened on first mutation, so read-only users never take the
    /// index lock
    writer: Option<IndexWriter>,

    next_position: ChunkPos,

    /// Appended since the last commit
    pending: BTreeMap<ChunkPos, Chunk>,

    /// Committed chunks tombstoned since the last commit
    tombstoned: BTreeSet<ChunkPos>,
}

impl std::fmt::Debug for TantivyChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyChunkStore")
            .field("dir", &self.dir)
            .field("next_position", &self.next_position)
            .field("pending", &self.pending.len())
            .field("tombstoned", &self.tombstoned.len())
            .finish()
    }
}

impl TantivyChunkStore {
    /// Create a new, empty store at the given path
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let index = Index::create_in_dir(dir, create_schema())
            .map_err(storage_err("Failed to create index"))?;

        Self::from_index(dir, index)
    }

    /// Open an existing store
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.join(STORE_MARKER_FILE).is_file() {
            return Err(XtIndexError::StoreNotFound(dir.display().to_string()));
        }

        let index = Index::open_in_dir(dir).map_err(storage_err("Failed to open index"))?;

        Self::from_index(dir, index)
    }

    fn from_index(dir: &Path, index: Index) -> Result<Self> {
        let fields = ChunkFields::resolve(&index.schema())?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(storage_err("Failed to create reader"))?;

        let payload = index
            .load_metas()
            .map_err(storage_err("Failed to load index metadata"))?
            .payload
            .and_then(|raw| serde_json::from_str::<CommitPayload>(&raw).ok());

        let next_position = match payload {
            Some(payload) => {
                if payload.schema_version > SCHEMA_VERSION {
                    return Err(XtIndexError::StorageError(format!(
                        "Store {} uses schema version {} (supported: {})",
                        dir.display(),
                        payload.schema_version,
                        SCHEMA_VERSION
                    )));
                }
                payload.next_position
            }
            None => scan_next_position(&reader, &fields)?,
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            index,
            fields,
            reader,
            writer: None,
            next_position,
            pending: BTreeMap::new(),
            tombstoned: BTreeSet::new(),
        })
    }

    fn writer(&mut self) -> Result<&mut IndexWriter> {
        if self.writer.is_none() {
            let writer = self
                .index
                .writer_with_num_threads(1, WRITER_HEAP_BYTES)
                .map_err(storage_err("Failed to create writer"))?;
            self.writer = Some(writer);
        }

        self.writer
            .as_mut()
            .ok_or_else(|| XtIndexError::StorageError("Index writer unavailable".to_string()))
    }

    /// Find the committed document holding `pos`
    fn lookup(&self, pos: ChunkPos) -> Result<Option<(tantivy::Searcher, DocAddress)>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(
            Term::from_field_u64(self.fields.chunk_pos, pos),
            IndexRecordOption::Basic,
        );
        let hits = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(storage_err("Failed to look up chunk"))?;

        Ok(hits.first().map(|(_, address)| (searcher.clone(), *address)))
    }

    fn to_document(&self, pos: ChunkPos, chunk: &Chunk) -> Result<TantivyDocument> {
        let f = &self.fields;
        let mut document = TantivyDocument::default();

        document.add_text(f.doc_key, &chunk.doc_key);
        document.add_u64(f.chunk_pos, pos);
        document.add_u64(f.seq, chunk.seq as u64);
        document.add_text(f.text, &chunk.text);
        document.add_u64(f.start_word, chunk.start_word as u64);
        document.add_u64(f.word_count, chunk.word_count as u64);
        if let Some(info) = &chunk.doc_info {
            document.add_text(f.doc_info, serde_json::to_string(info)?);
        }

        Ok(document)
    }

    fn from_document(&self, document: &TantivyDocument) -> Result<Chunk> {
        let f = &self.fields;
        let text = |field: Field| {
            document
                .get_first(field)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let number = |field: Field| {
            document
                .get_first(field)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as usize
        };

        let doc_info = match text(f.doc_info) {
            Some(raw) => Some(serde_json::from_str::<DocInfo>(&raw)?),
            None => None,
        };

        Ok(Chunk {
            doc_key: text(f.doc_key).unwrap_or_default(),
            seq: number(f.seq),
            text: text(f.text).unwrap_or_default(),
            start_word: number(f.start_word),
            word_count: number(f.word_count),
            doc_info,
        })
    }

    /// Committed positions holding chunks of `doc_key`
    fn document_positions(&self, doc_key: &str) -> Result<Vec<ChunkPos>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.fields.doc_key, doc_key),
            IndexRecordOption::Basic,
        );
        let addresses = searcher
            .search(&query, &DocSetCollector)
            .map_err(storage_err("Failed to find document chunks"))?;

        let mut positions = Vec::with_capacity(addresses.len());
        for address in addresses {
            let document: TantivyDocument = searcher
                .doc(address)
                .map_err(storage_err("Failed to read chunk"))?;
            if let Some(pos) = document
                .get_first(self.fields.chunk_pos)
                .and_then(|v| v.as_u64())
            {
                positions.push(pos);
            }
        }
        positions.sort_unstable();
        Ok(positions)
    }
}

/// Recover the next free position from the stored chunks when a
/// store has no commit payload
fn scan_next_position(reader: &IndexReader, fields: &ChunkFields) -> Result<ChunkPos> {
    let searcher = reader.searcher();
    let addresses = searcher
        .search(&AllQuery, &DocSetCollector)
        .map_err(storage_err("Failed to scan index"))?;

    let mut next = 0;
    for address in addresses {
        let document: TantivyDocument = searcher
            .doc(address)
            .map_err(storage_err("Failed to read chunk"))?;
        if let Some(pos) = document.get_first(fields.chunk_pos).and_then(|v| v.as_u64()) {
            next = next.max(pos + 1);
        }
    }

    Ok(next)
}

impl ChunkStore for TantivyChunkStore {
    fn path(&self) -> &Path {
        &self.dir
    }

    fn count(&self) -> ChunkPos {
        self.next_position
    }

    fn live_count(&self) -> ChunkPos {
        let committed = self.reader.searcher().num_docs();
        (committed + self.pending.len() as u64).saturating_sub(self.tombstoned.len() as u64)
    }

    fn is_deleted(&self, pos: ChunkPos) -> Result<bool> {
        if pos >= self.next_position || self.tombstoned.contains(&pos) {
            return Ok(true);
        }
        if self.pending.contains_key(&pos) {
            return Ok(false);
        }
        Ok(self.lookup(pos)?.is_none())
    }

    fn read_chunk(&self, pos: ChunkPos) -> Result<Chunk> {
        if let Some(chunk) = self.pending.get(&pos) {
            return Ok(chunk.clone());
        }
        if self.tombstoned.contains(&pos) {
            return Err(XtIndexError::StorageError(format!(
                "Chunk {pos} in {} is deleted",
                self.dir.display()
            )));
        }

        let (searcher, address) = self.lookup(pos)?.ok_or_else(|| {
            XtIndexError::StorageError(format!(
                "Chunk {pos} in {} is deleted or missing",
                self.dir.display()
            ))
        })?;
        let document: TantivyDocument = searcher
            .doc(address)
            .map_err(storage_err("Failed to read chunk"))?;

        self.from_document(&document)
    }

    fn append(&mut self, chunk: &Chunk) -> Result<ChunkPos> {
        let pos = self.next_position;
        let document = self.to_document(pos, chunk)?;

        self.writer()?
            .add_document(document)
            .map_err(storage_err("Failed to add chunk"))?;

        self.next_position += 1;
        self.pending.insert(pos, chunk.clone());
        Ok(pos)
    }

    fn tombstone(&mut self, pos: ChunkPos) -> Result<()> {
        if self.is_deleted(pos)? {
            return Err(XtIndexError::StorageError(format!(
                "Cannot delete chunk {pos} in {}: not a live chunk",
                self.dir.display()
            )));
        }

        let term = Term::from_field_u64(self.fields.chunk_pos, pos);
        self.writer()?.delete_term(term);

        if self.pending.remove(&pos).is_none() {
            self.tombstoned.insert(pos);
        }
        Ok(())
    }

    fn tombstone_document(&mut self, doc_key: &str) -> Result<usize> {
        let committed: Vec<ChunkPos> = self
            .document_positions(doc_key)?
            .into_iter()
            .filter(|pos| !self.tombstoned.contains(pos))
            .collect();
        let pending: Vec<ChunkPos> = self
            .pending
            .iter()
            .filter(|(_, chunk)| chunk.doc_key == doc_key)
            .map(|(pos, _)| *pos)
            .collect();

        let removed = committed.len() + pending.len();
        if removed == 0 {
            return Ok(0);
        }

        let term = Term::from_field_text(self.fields.doc_key, doc_key);
        self.writer()?.delete_term(term);

        self.tombstoned.extend(committed);
        for pos in pending {
            self.pending.remove(&pos);
        }
        Ok(removed)
    }

    fn commit(&mut self) -> Result<()> {
        if self.writer.is_none() && self.pending.is_empty() && self.tombstoned.is_empty() {
            return Ok(());
        }

        let payload = serde_json::to_string(&CommitPayload {
            schema_version: SCHEMA_VERSION,
            next_position: self.next_position,
        })?;

        let writer = self.writer()?;
        let mut prepared = writer
            .prepare_commit()
            .map_err(storage_err("Failed to prepare commit"))?;
        prepared.set_payload(&payload);
        prepared.commit().map_err(storage_err("Failed to commit"))?;

        self.reader
            .reload()
            .map_err(storage_err("Failed to reload reader"))?;
        self.pending.clear();
        self.tombstoned.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.pending.clear();
        self.tombstoned.clear();
        if let Some(writer) = self.writer.take() {
            writer
                .wait_merging_threads()
                .map_err(storage_err("Failed to finish merges"))?;
        }
        Ok(())
    }
}

/// Opens [`TantivyChunkStore`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct TantivyBackend;

impl StoreBackend for TantivyBackend {
    type Store = TantivyChunkStore;

    fn marker_file(&self) -> &str {
        STORE_MARKER_FILE
    }

    fn open(&self, dir: &Path) -> Result<Self::Store> {
        TantivyChunkStore::open(dir)
    }

    fn create(&self, dir: &Path) -> Result<Self::Store> {
        TantivyChunkStore::create(dir)
    }
}
