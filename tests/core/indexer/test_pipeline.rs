// Integration tests for the indexing pipeline

use crate::common::{
    assert_valid_stats, create_test_services, live_chunks, test_config, write_fragments,
    TestCorpus,
};
use std::collections::HashMap;
use tempfile::TempDir;
use xtindex::core::config::StopwordsSpec;
use xtindex::core::services::Services;
use xtindex::core::storage::{ChunkStore, TantivyChunkStore};
use xtindex::core::tree::{NodeStore, TreeFile};

/// For each document, the live chunks must be its text chunks in
/// order followed by exactly one marker
fn assert_documents_complete(store: &TantivyChunkStore) -> usize {
    let mut per_doc: HashMap<String, Vec<_>> = HashMap::new();
    for chunk in live_chunks(store) {
        per_doc.entry(chunk.doc_key.clone()).or_default().push(chunk);
    }

    for (doc_key, chunks) in &per_doc {
        let (marker, text) = chunks.split_last().unwrap();
        assert!(marker.is_doc_info(), "{doc_key} does not end with a marker");
        let info = marker.doc_info.as_ref().unwrap();
        assert_eq!(info.chunk_count, text.len(), "{doc_key}");
        for (i, chunk) in text.iter().enumerate() {
            assert!(!chunk.is_doc_info());
            assert_eq!(chunk.seq, i, "{doc_key}");
        }
    }

    per_doc.len()
}

#[test]
fn test_index_small_corpus() {
    let corpus = TestCorpus::small();
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("small");
    let services = create_test_services(corpus.path(), &db);

    let pipeline = services.create_pipeline("test").unwrap();
    let stats = pipeline.run().unwrap();

    assert_valid_stats(&stats);
    assert_eq!(stats.index, "test");
    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(stats.documents_skipped, 0);
    assert_eq!(stats.fragments_purged, 0);

    let store = TantivyChunkStore::open(&pipeline.index().chunks_dir()).unwrap();
    assert_eq!(assert_documents_complete(&store), 2);
    assert_eq!(
        store.live_count() as usize,
        stats.chunks_created + stats.documents_indexed
    );
}

#[test]
fn test_tree_files_written_per_document() {
    let corpus = TestCorpus::small();
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("trees");
    let services = create_test_services(corpus.path(), &db);

    let pipeline = services.create_pipeline("test").unwrap();
    pipeline.run().unwrap();

    let tree_path = db.join("trees").join("books").join("book.xml.xtree");
    let tree = TreeFile::open(&tree_path).unwrap();
    assert_eq!(tree.node_count(), 14);
    let book = tree.first_child(tree.root()).unwrap().unwrap();
    assert_eq!(tree.name(book).unwrap().as_deref(), Some("book"));

    // The marker points at the same tree file
    let store = TantivyChunkStore::open(&pipeline.index().chunks_dir()).unwrap();
    let marker = live_chunks(&store)
        .into_iter()
        .find(|c| c.doc_key == "books/book.xml" && c.is_doc_info())
        .unwrap();
    assert_eq!(marker.doc_info.unwrap().tree_path, Some(tree_path));
}

#[test]
fn test_generated_corpus_chunk_counts() {
    let corpus = TestCorpus::generated(5, 20);
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("gen");
    let services = create_test_services(corpus.path(), &db);

    let stats = services.create_pipeline("test").unwrap().run().unwrap();

    // 20 words in windows of 8 sharing 2: [0,8) [6,14) [12,20)
    assert_eq!(stats.documents_indexed, 5);
    assert_eq!(stats.chunks_created, 15);
    assert_eq!(stats.words_indexed, 100);
}

#[test]
fn test_reindex_replaces_documents() {
    let corpus = TestCorpus::small();
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("again");
    let services = create_test_services(corpus.path(), &db);
    let pipeline = services.create_pipeline("test").unwrap();

    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();
    assert_eq!(first.chunks_created, second.chunks_created);
    assert_eq!(second.fragments_purged, 0);

    let store = TantivyChunkStore::open(&pipeline.index().chunks_dir()).unwrap();
    assert_eq!(assert_documents_complete(&store), 2);
    assert_eq!(
        store.live_count() as usize,
        second.chunks_created + second.documents_indexed
    );
}

#[test]
fn test_rerun_purges_crash_fragments() {
    let corpus = TestCorpus::small();
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("crashed");
    let services = create_test_services(corpus.path(), &db);
    let pipeline = services.create_pipeline("test").unwrap();
    pipeline.run().unwrap();

    // Simulate a run that died part way through a third document
    {
        let mut store = TantivyChunkStore::open(&pipeline.index().chunks_dir()).unwrap();
        write_fragments(&mut store, "books/unfinished.xml", 3);
        store.close().unwrap();
    }

    let stats = pipeline.run().unwrap();
    assert_eq!(stats.fragments_purged, 3);

    let store = TantivyChunkStore::open(&pipeline.index().chunks_dir()).unwrap();
    assert_eq!(assert_documents_complete(&store), 2);
    assert!(live_chunks(&store)
        .iter()
        .all(|c| c.doc_key != "books/unfinished.xml"));
}

#[test]
fn test_malformed_document_skipped() {
    let corpus = TestCorpus::with_files(&[
        ("good.xml", "<doc><p>alpha beta gamma</p></doc>"),
        ("bad.xml", "<doc><p>unclosed</doc>"),
        ("notes.txt", "not xml at all"),
    ]);
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("mixed");
    let services = create_test_services(corpus.path(), &db);

    let stats = services.create_pipeline("test").unwrap().run().unwrap();
    assert_eq!(stats.documents_indexed, 1);
    assert_eq!(stats.documents_skipped, 1);
    assert!(!db.join("trees").join("bad.xml.xtree").exists());
}

#[test]
fn test_skip_patterns_and_stopwords() {
    let corpus = TestCorpus::with_files(&[
        ("keep.xml", "<doc>The fall of the House of Usher</doc>"),
        ("Draft-1.xml", "<doc>unfinished</doc>"),
    ]);
    let db_root = TempDir::new().unwrap();
    let db = db_root.path().join("filtered");

    let mut config = test_config("usher", corpus.path(), &db, Some((10, 0)));
    config.indexes[0].skip = Some("draft-*".to_string());
    config.indexes[0].stopwords = Some(StopwordsSpec::Inline("the OF".to_string()));
    let services = Services::new(config);

    let stats = services.create_pipeline("USHER").unwrap().run().unwrap();
    assert_eq!(stats.documents_indexed, 1);
    // fall, House, Usher
    assert_eq!(stats.words_indexed, 3);
}

#[test]
fn test_missing_source_directory_fails() {
    let db_root = TempDir::new().unwrap();
    let services = create_test_services(&db_root.path().join("nowhere"), &db_root.path().join("db"));

    let result = services.create_pipeline("test").unwrap().run();
    assert!(result.is_err());
}
