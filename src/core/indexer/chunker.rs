//! Overlapping word-window chunking.
//!
//! A document's word stream is split into windows of `chunk_size`
//! words. Consecutive windows share exactly `overlap` words, so a
//! phrase that straddles a window boundary is still found inside a
//! single chunk. The last window may be shorter.
//!
//! Planning depends only on the word count and the configuration,
//! so re-indexing the same document always yields the same chunk
//! boundaries.
//!
//! # Example
//!
//! ```
//! use xtindex::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(4, 2).unwrap();
//! let spans = chunker.plan(7);
//! let ranges: Vec<(usize, usize)> = spans.iter().map(|s| (s.start_word, s.end_word)).collect();
//! assert_eq!(ranges, vec![(0, 4), (2, 6), (4, 7)]);
//! ```

use crate::core::error::{Result, XtIndexError};
use crate::core::tokenizer::Token;
use crate::core::types::{Chunk, ChunkSpan};

/// Smallest permitted chunk size, in words
pub const MIN_CHUNK_SIZE: usize = 2;

/// Word-window chunk planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    /// Number of words per chunk
    chunk_size: usize,

    /// Number of words shared between consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` is below
    /// [`MIN_CHUNK_SIZE`] or `overlap` exceeds `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size < MIN_CHUNK_SIZE {
            return Err(XtIndexError::ConfigError(format!(
                "Chunk size {chunk_size} is below the minimum of {MIN_CHUNK_SIZE} words"
            )));
        }
        if overlap > chunk_size {
            return Err(XtIndexError::ConfigError(format!(
                "Chunk overlap {overlap} exceeds chunk size {chunk_size}"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in words.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap in words.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Words between the starts of consecutive windows. An overlap
    /// equal to the chunk size still advances one word per window.
    pub fn step(&self) -> usize {
        (self.chunk_size - self.overlap).max(1)
    }

    /// Plan chunk windows over a stream of `word_count` words.
    ///
    /// An empty stream produces no windows.
    pub fn plan(&self, word_count: usize) -> Vec<ChunkSpan> {
        let mut spans = Vec::new();
        if word_count == 0 {
            return spans;
        }

        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(word_count);
            spans.push(ChunkSpan {
                index: spans.len(),
                start_word: start,
                end_word: end,
            });
            if end == word_count {
                break;
            }
            start += self.step();
        }

        spans
    }

    /// Chunk a tokenized document into text windows.
    ///
    /// Each window's text is the slice of `source` from its first
    /// word to its last, so punctuation between words is kept.
    pub fn chunk_tokens(&self, doc_key: &str, source: &str, tokens: &[Token<'_>]) -> Vec<Chunk> {
        self.plan(tokens.len())
            .into_iter()
            .map(|span| {
                let from = tokens[span.start_word].start;
                let to = tokens[span.end_word - 1].end;
                Chunk::text(doc_key, span, &source[from..to])
            })
            .collect()
    }
}
