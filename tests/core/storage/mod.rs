//! Storage layer tests
//!
//! Tantivy-backed chunk stores and the recursive consistency
//! cleaner, run against real store directories.

mod test_chunk_store;
