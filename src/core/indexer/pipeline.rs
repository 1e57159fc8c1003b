//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing workflow for one index:
//! 1. Repair the database left by any interrupted earlier run
//! 2. Walk the source directory for XML files
//! 3. Parse each file into a tree and persist it for navigation
//! 4. Tokenize the document text and drop stop words
//! 5. Chunk the word stream and write it with a completion marker

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use crate::core::config::{IndexingConfig, ResolvedIndex, TokenizerConfig};
use crate::core::error::{Result, XtIndexError};
use crate::core::indexer::writer::{ChunkWriter, DocumentChunks};
use crate::core::indexer::{Chunker, FileWalker};
use crate::core::storage::{ChunkStore, IndexCleaner, StoreBackend, TantivyBackend};
use crate::core::tokenizer::{CharClassTable, FastTokenizer};
use crate::core::tree::file::TREE_FILE_EXTENSION;
use crate::core::tree::{
    parse_xml, Axis, AxisEnumeration, FlatTree, NodeKind, NodeStore, NodeTest, TreeFile,
};
use crate::core::types::IndexStats;

/// A source document turned into a tree and chunks
#[derive(Debug)]
pub struct PreparedDocument {
    pub tree: FlatTree,
    pub chunks: DocumentChunks,
}

/// Orchestrates indexing of one configured index
#[derive(Debug)]
pub struct IndexingPipeline {
    index: ResolvedIndex,
    walker: FileWalker,
    chunker: Chunker,
    table: CharClassTable,
    commit_every: usize,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    ///
    /// # Arguments
    ///
    /// * `index` - The resolved index definition
    /// * `indexing` - Global indexing settings (file size, commit batch)
    /// * `tokenizer` - Character table adjustments
    pub fn new(
        index: ResolvedIndex,
        indexing: &IndexingConfig,
        tokenizer: &TokenizerConfig,
    ) -> Result<Self> {
        let walker = FileWalker::new(&index.skip_patterns, indexing.max_file_size_mb)?;
        let chunker = Chunker::new(index.chunk_size, index.chunk_overlap)?;

        Ok(Self {
            index,
            walker,
            chunker,
            table: tokenizer.char_table(),
            commit_every: indexing.commit_every,
        })
    }

    pub fn index(&self) -> &ResolvedIndex {
        &self.index
    }

    /// Index into Tantivy-backed storage
    pub fn run(&self) -> Result<IndexStats> {
        self.run_with(&TantivyBackend)
    }

    /// Repair the database, then index every source document.
    ///
    /// Documents that cannot be read or parsed are logged and
    /// skipped. Store failures end the run; the documents written
    /// before them stay complete.
    pub fn run_with<B: StoreBackend + Clone>(&self, backend: &B) -> Result<IndexStats> {
        let start = Instant::now();
        let mut stats = IndexStats {
            index: self.index.name.clone(),
            ..IndexStats::default()
        };

        if self.index.db.is_dir() {
            let report = IndexCleaner::new(backend.clone()).process_dir(&self.index.db)?;
            stats.fragments_purged = report.fragments_purged;
        }

        tracing::info!("Starting file collection from {:?}", self.index.src);
        let files = self.walker.collect_files(&self.index.src)?;
        tracing::info!("Found {} files to index", files.len());

        let store = backend.open_or_create(&self.index.chunks_dir())?;
        let mut writer = ChunkWriter::with_commit_every(store, self.commit_every);

        for (idx, path) in files.iter().enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} files processed", idx, files.len());
            }

            let prepared = match self.prepare_file(path) {
                Ok(prepared) => prepared,
                Err(e) => {
                    tracing::warn!("Failed to process {:?}: {}", path, e);
                    stats.documents_skipped += 1;
                    continue;
                }
            };

            let document = &prepared.chunks;
            if let Some(tree_path) = &document.tree_path {
                TreeFile::write(&prepared.tree, tree_path)?;
            }

            let replaced = writer.remove_document(&document.doc_key)?;
            if replaced > 0 {
                tracing::debug!("Replacing {} chunks of {}", replaced, document.doc_key);
            }
            writer.write_document(document)?;

            stats.documents_indexed += 1;
            stats.chunks_created += document.chunks.len();
            stats.words_indexed += document.word_count;
            tracing::debug!("Indexed {:?} ({} chunks)", path, document.chunks.len());
        }

        let store = writer.finish()?;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexing complete: {} documents indexed, {} skipped, \
             {} chunks created in {}ms ({} live chunks in store)",
            stats.documents_indexed,
            stats.documents_skipped,
            stats.chunks_created,
            stats.duration_ms,
            store.live_count()
        );

        Ok(stats)
    }

    /// Identity of a source file: its path below the source root,
    /// with `/` separators
    pub fn doc_key(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.index.src).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn tree_path(&self, doc_key: &str) -> PathBuf {
        self.index
            .trees_dir()
            .join(format!("{doc_key}.{TREE_FILE_EXTENSION}"))
    }

    fn prepare_file(&self, path: &Path) -> Result<PreparedDocument> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                XtIndexError::IndexingFailed(format!("Skipping non-UTF-8 file: {path:?}"))
            } else {
                XtIndexError::IndexingFailed(format!("Failed to read {path:?}: {e}"))
            }
        })?;

        let doc_key = self.doc_key(path);
        let mut prepared = self.prepare_document(&doc_key, &contents)?;
        prepared.chunks.source_path = path.to_path_buf();
        prepared.chunks.tree_path = Some(self.tree_path(&doc_key));
        Ok(prepared)
    }

    /// Parse, tokenize and chunk one document held in memory
    pub fn prepare_document(&self, doc_key: &str, xml: &str) -> Result<PreparedDocument> {
        let tree = parse_xml(xml)?;
        let text = extract_text(&tree)?;

        let tokens: Vec<_> = FastTokenizer::with_table(&text, &self.table)
            .filter(|token| {
                self.index.stopwords.is_empty()
                    || !self.index.stopwords.contains(&token.text.to_lowercase())
            })
            .collect();

        let chunks = self.chunker.chunk_tokens(doc_key, &text, &tokens);

        Ok(PreparedDocument {
            tree,
            chunks: DocumentChunks {
                doc_key: doc_key.to_string(),
                source_path: PathBuf::from(doc_key),
                tree_path: None,
                word_count: tokens.len(),
                chunks,
            },
        })
    }
}

/// Text of a document: its text nodes in document order, separated
/// by single spaces
pub fn extract_text<S: NodeStore + ?Sized>(store: &S) -> Result<String> {
    let texts = AxisEnumeration::new(
        store,
        Axis::Descendant,
        store.root(),
        NodeTest::Kind(NodeKind::Text),
        false,
    )?;

    let mut out = String::new();
    for node in texts {
        let value = store.value(node?)?.unwrap_or_default();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(value);
    }
    Ok(out)
}
