//! Tree layer tests
//!
//! Axis navigation over trees persisted by the indexer, checked
//! against the same trees held in memory.

mod test_navigation;
