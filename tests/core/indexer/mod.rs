//! Indexer layer tests
//!
//! End-to-end pipeline runs over temporary XML corpora and
//! tokenizer behaviour on realistic text.

mod test_pipeline;
mod test_tokenizer;
