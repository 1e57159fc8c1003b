//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Services over a temporary index definition
//! - Indexed corpora for clean/navigate tests

use crate::common::{test_config, TestCorpus};
use std::path::PathBuf;
use tempfile::TempDir;
use xtindex::core::services::Services;

/// Temporary corpus, database root and services with one index
/// named "corpus"
pub struct CliFixture {
    pub corpus: TestCorpus,
    pub data: TempDir,
    pub services: Services,
}

impl CliFixture {
    pub fn new(corpus: TestCorpus) -> Self {
        let data = TempDir::new().expect("Failed to create temp dir");
        let db = data.path().join("corpus");
        let services = Services::new(test_config("corpus", corpus.path(), &db, Some((6, 2))));
        Self {
            corpus,
            data,
            services,
        }
    }

    /// Database directory of the "corpus" index
    pub fn db(&self) -> PathBuf {
        self.data.path().join("corpus")
    }

    /// Index the corpus through the pipeline
    pub fn index(&self) {
        self.services
            .create_pipeline("corpus")
            .expect("Failed to create pipeline")
            .run()
            .expect("Indexing failed");
    }
}
