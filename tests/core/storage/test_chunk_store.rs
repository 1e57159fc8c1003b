// Integration tests for the Tantivy chunk store and the chunk writer

use crate::common::{live_chunks, write_fragments};
use std::path::PathBuf;
use tempfile::TempDir;
use xtindex::core::indexer::{ChunkWriter, Chunker, DocumentChunks};
use xtindex::core::storage::{ChunkStore, StoreBackend, TantivyBackend, TantivyChunkStore};
use xtindex::core::tokenizer::FastTokenizer;

fn document(doc_key: &str, text: &str) -> DocumentChunks {
    let tokens: Vec<_> = FastTokenizer::new(text).collect();
    let chunks = Chunker::new(4, 1).unwrap().chunk_tokens(doc_key, text, &tokens);
    DocumentChunks {
        doc_key: doc_key.to_string(),
        source_path: PathBuf::from(format!("{doc_key}.xml")),
        tree_path: None,
        word_count: tokens.len(),
        chunks,
    }
}

#[test]
fn test_writer_output_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("chunks");

    let store = TantivyBackend.create(&dir).unwrap();
    let mut writer = ChunkWriter::with_commit_every(store, 2);
    writer
        .write_document(&document("a", "one two three four five six seven"))
        .unwrap();
    writer.write_document(&document("b", "eight nine")).unwrap();
    let mut store = writer.finish().unwrap();
    store.close().unwrap();
    drop(store);

    let store = TantivyChunkStore::open(&dir).unwrap();
    let chunks = live_chunks(&store);
    let keys: Vec<(&str, bool)> = chunks
        .iter()
        .map(|c| (c.doc_key.as_str(), c.is_doc_info()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("a", false),
            ("a", false),
            ("a", true),
            ("b", false),
            ("b", true)
        ]
    );
    assert_eq!(chunks[0].text, "one two three four");
    assert_eq!(chunks[1].text, "four five six seven");
}

#[test]
fn test_positions_grow_across_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("chunks");

    {
        let mut store = TantivyChunkStore::create(&dir).unwrap();
        write_fragments(&mut store, "doc", 3);
        store.tombstone(2).unwrap();
        store.commit().unwrap();
        store.close().unwrap();
    }

    let mut store = TantivyBackend.open_or_create(&dir).unwrap();
    assert_eq!(store.count(), 3);
    assert_eq!(store.live_count(), 2);
    assert!(store.is_deleted(2).unwrap());

    write_fragments(&mut store, "doc", 1);
    assert_eq!(store.count(), 4);
    assert!(!store.is_deleted(3).unwrap());
}

#[test]
fn test_remove_document_through_writer() {
    let temp_dir = TempDir::new().unwrap();
    let store = TantivyChunkStore::create(&temp_dir.path().join("chunks")).unwrap();

    let mut writer = ChunkWriter::new(store);
    writer
        .write_document(&document("gone", "alpha beta gamma delta epsilon"))
        .unwrap();
    writer.write_document(&document("kept", "zeta eta")).unwrap();

    assert_eq!(writer.remove_document("gone").unwrap(), 3);
    let store = writer.finish().unwrap();
    assert!(live_chunks(&store).iter().all(|c| c.doc_key == "kept"));
}
