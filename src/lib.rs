//! xtindex - Full-text indexing for XML document collections
//!
//! Builds a chunked full-text index over directories of XML
//! documents and keeps a navigable tree of every document beside
//! it, so hits can be placed back into their structure.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - tokenizer (fast scanner with a precise fallback)
//!   - indexer (walking, chunking, completion-marked writes)
//!   - storage (Tantivy chunk store, consistency cleaner)
//!   - tree (XML parsing, tree files, axis enumeration)
//!   - config, error, types, xdg, services
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Overlapping word-window chunks with per-document markers
//! - Automatic repair of half-written documents
//! - Lazy XPath-style axis navigation over on-disk trees

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, XtIndexError};
pub use core::services::Services;
pub use core::types::*;
