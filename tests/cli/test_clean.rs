//! Tests for the clean CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::{write_fragments, TestCorpus};
use std::sync::atomic::Ordering;
use xtindex::cli::commands::clean::{execute, CleanArgs};
use xtindex::cli::OutputFormat;
use xtindex::core::storage::{ChunkStore, TantivyChunkStore};

#[test]
fn test_clean_purges_fragments() {
    let fixture = CliFixture::new(TestCorpus::small());
    fixture.index();

    let chunks_dir = fixture.db().join("chunks");
    let before = {
        let mut store = TantivyChunkStore::open(&chunks_dir).unwrap();
        let live = store.live_count();
        write_fragments(&mut store, "partial.xml", 2);
        store.close().unwrap();
        live
    };

    let args = CleanArgs {
        dir: fixture.data.path().to_path_buf(),
    };
    execute(args, &fixture.services, OutputFormat::Json).unwrap();

    let store = TantivyChunkStore::open(&chunks_dir).unwrap();
    assert_eq!(store.live_count(), before);
}

#[test]
fn test_clean_consistent_database_human() {
    let fixture = CliFixture::new(TestCorpus::small());
    fixture.index();

    let args = CleanArgs { dir: fixture.db() };
    let result = execute(args, &fixture.services, OutputFormat::Human);
    assert!(result.is_ok(), "Clean should succeed: {:?}", result.err());
    assert!(fixture.db().join("chunks").is_dir());
}

#[test]
fn test_clean_missing_directory() {
    let fixture = CliFixture::new(TestCorpus::small());

    let args = CleanArgs {
        dir: fixture.data.path().join("absent"),
    };
    assert!(execute(args, &fixture.services, OutputFormat::Human).is_err());
}

#[test]
fn test_clean_honours_cancel_flag() {
    let fixture = CliFixture::new(TestCorpus::small());
    fixture.index();
    fixture.services.cancel.store(true, Ordering::Relaxed);

    let args = CleanArgs { dir: fixture.db() };
    let message = execute(args, &fixture.services, OutputFormat::Human)
        .unwrap_err()
        .to_string();
    assert!(message.to_lowercase().contains("cancel"), "unexpected error: {message}");
}
