//! Core domain logic (independent of the command line)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Chunk and statistics records
//! - **xdg**: XDG directory handling
//! - **tokenizer**: Two-tier word tokenizer
//! - **indexer**: File walking, chunking and the indexing pipeline
//! - **storage**: Chunk stores and the consistency cleaner
//! - **tree**: Persisted XML trees and axis navigation
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod services;
pub mod storage;
pub mod tokenizer;
pub mod tree;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, XtIndexError};
pub use services::Services;
