//! Tests for the index CLI command
//!
//! - Indexing a configured index (human and JSON output)
//! - Re-indexing over an existing database
//! - Error cases (unknown index, missing source directory)

use crate::cli::test_helpers::CliFixture;
use crate::common::TestCorpus;
use xtindex::cli::commands::index::{execute, IndexArgs};
use xtindex::cli::OutputFormat;
use xtindex::core::storage::{ChunkStore, TantivyChunkStore};

fn args(name: &str) -> IndexArgs {
    IndexArgs {
        name: name.to_string(),
        quiet: true,
    }
}

#[test]
fn test_index_human() {
    let fixture = CliFixture::new(TestCorpus::small());

    let result = execute(args("corpus"), &fixture.services, OutputFormat::Human);
    assert!(result.is_ok(), "Index should succeed: {:?}", result.err());

    let store = TantivyChunkStore::open(&fixture.db().join("chunks")).unwrap();
    assert!(store.live_count() > 0);
}

#[test]
fn test_index_json_case_insensitive_name() {
    let fixture = CliFixture::new(TestCorpus::small());

    let result = execute(args("CORPUS"), &fixture.services, OutputFormat::Json);
    assert!(result.is_ok(), "Index (JSON) should succeed: {:?}", result.err());
    assert!(fixture.db().join("trees").is_dir());
}

#[test]
fn test_index_twice() {
    let fixture = CliFixture::new(TestCorpus::generated(3, 10));

    execute(args("corpus"), &fixture.services, OutputFormat::Json).unwrap();
    let first = TantivyChunkStore::open(&fixture.db().join("chunks"))
        .unwrap()
        .live_count();

    execute(args("corpus"), &fixture.services, OutputFormat::Json).unwrap();
    let second = TantivyChunkStore::open(&fixture.db().join("chunks"))
        .unwrap()
        .live_count();

    assert_eq!(first, second);
}

#[test]
fn test_index_unknown_name() {
    let fixture = CliFixture::new(TestCorpus::small());

    let result = execute(args("nope"), &fixture.services, OutputFormat::Human);
    let message = result.unwrap_err().to_string();
    assert!(message.contains("nope"), "unexpected error: {message}");
}

#[test]
fn test_index_missing_source() {
    let fixture = CliFixture::new(TestCorpus::small());
    let src = fixture.corpus.path().to_path_buf();
    std::fs::remove_dir_all(&src).unwrap();

    let result = execute(args("corpus"), &fixture.services, OutputFormat::Human);
    let message = result.unwrap_err().to_string();
    assert!(message.contains("does not exist"), "unexpected error: {message}");
}
