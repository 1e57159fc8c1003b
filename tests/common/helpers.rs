// Test helper functions

use std::path::Path;

use xtindex::core::config::{ChunkSpec, Config, IndexConfig};
use xtindex::core::services::Services;
use xtindex::core::storage::{ChunkStore, TantivyChunkStore};
use xtindex::core::types::{Chunk, ChunkSpan, IndexStats};

/// Configuration with one index named `name` over `src`, stored in `db`
#[allow(dead_code)] // Used in integration tests
pub fn test_config(name: &str, src: &Path, db: &Path, chunk: Option<(usize, usize)>) -> Config {
    let mut config = Config::default();
    config.storage.index_root = db.parent().unwrap_or(db).to_path_buf();
    config.indexes.push(IndexConfig {
        name: name.to_string(),
        db: Some(db.to_path_buf()),
        src: src.to_path_buf(),
        chunk: chunk.map(|(size, overlap)| ChunkSpec {
            size: Some(size),
            overlap: Some(overlap),
        }),
        skip: None,
        stopwords: None,
        display_style: None,
    });
    config
}

/// Services over a single test index
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(src: &Path, db: &Path) -> Services {
    Services::new(test_config("test", src, db, Some((8, 2))))
}

/// Assert that index stats are valid
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IndexStats) {
    assert!(
        stats.documents_indexed > 0,
        "Expected documents_indexed > 0, got {}",
        stats.documents_indexed
    );
    assert!(
        stats.chunks_created >= stats.documents_indexed,
        "Expected chunks_created ({}) >= documents_indexed ({})",
        stats.chunks_created,
        stats.documents_indexed
    );
    assert!(
        stats.words_indexed > 0,
        "Expected words_indexed > 0, got {}",
        stats.words_indexed
    );
}

/// Every live chunk of a store, in position order
#[allow(dead_code)] // Used in integration tests
pub fn live_chunks<S: ChunkStore>(store: &S) -> Vec<Chunk> {
    (0..store.count())
        .filter(|&pos| !store.is_deleted(pos).unwrap())
        .map(|pos| store.read_chunk(pos).unwrap())
        .collect()
}

/// Append and commit `count` text chunks of `doc_key` with no
/// marker, the shape a crash mid-document leaves behind
#[allow(dead_code)] // Used in integration tests
pub fn write_fragments(store: &mut TantivyChunkStore, doc_key: &str, count: usize) {
    for i in 0..count {
        let span = ChunkSpan {
            index: i,
            start_word: i * 2,
            end_word: i * 2 + 2,
        };
        store
            .append(&Chunk::text(doc_key, span, format!("fragment {i}")))
            .unwrap();
    }
    store.commit().unwrap();
}
