//! Unified service container for xtindex
//!
//! Provides shared access to the loaded configuration and builds the
//! per-index workers from it.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexer::IndexingPipeline;
use crate::core::storage::{IndexCleaner, TantivyBackend};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Unified services container
///
/// Every CLI command receives the same struct.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Raised to stop long-running maintenance early
    pub cancel: Arc<AtomicBool>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an IndexingPipeline for a configured index
    ///
    /// The index name is matched case-insensitively.
    pub fn create_pipeline(&self, index: &str) -> Result<IndexingPipeline> {
        let resolved = self.config.resolve_index(index)?;
        IndexingPipeline::new(resolved, &self.config.indexing, &self.config.tokenizer)
    }

    /// Create a cleaner over Tantivy stores that honours the shared
    /// cancel flag
    pub fn create_cleaner(&self) -> IndexCleaner<TantivyBackend> {
        IndexCleaner::new(TantivyBackend).with_cancel_flag(Arc::clone(&self.cancel))
    }
}
