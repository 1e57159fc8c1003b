//! Fast-path tokenizer.
//!
//! Scans forward over the source: skip everything that is not
//! alphanumeric, then consume an alphanumeric run. That run is the
//! token, except in one situation: when the run is followed by a
//! punctuation character which is itself followed by another
//! alphanumeric ("don't", "U.S.A", "3.14", "AT&T"). The fast path
//! cannot tell where such a token ends, so the span up to the next
//! whitespace is handed to the [`PreciseTokenizer`] and its first
//! token is taken instead.
//!
//! Ambiguous spans are rare in running text, so nearly all tokens
//! come from the table-driven scan.
//!
//! # Example
//!
//! ```
//! use xtindex::core::tokenizer::FastTokenizer;
//!
//! let words: Vec<&str> = FastTokenizer::new("I don't stop").map(|t| t.text).collect();
//! assert_eq!(words, vec!["I", "don't", "stop"]);
//! ```

use super::charclass::CharClassTable;
use super::precise::PreciseTokenizer;
use super::{Token, TokenKind};

/// Two-tier tokenizer over an in-memory buffer.
///
/// One instance tokenizes one document; the only state is the scan
/// position. [`FastTokenizer::reset`] restarts the sequence from
/// the beginning.
#[derive(Debug, Clone)]
pub struct FastTokenizer<'a> {
    source: &'a str,
    /// Byte position of the next character to scan
    pos: usize,
    table: &'a CharClassTable,
    precise: PreciseTokenizer,
    /// Number of spans resolved by the precise tier
    fallbacks: usize,
}

impl<'a> FastTokenizer<'a> {
    /// Tokenizer using the default character table
    pub fn new(source: &'a str) -> Self {
        Self::with_table(source, CharClassTable::shared())
    }

    pub fn with_table(source: &'a str, table: &'a CharClassTable) -> Self {
        Self {
            source,
            pos: 0,
            table,
            precise: PreciseTokenizer::new(),
            fallbacks: 0,
        }
    }

    /// Restart tokenization from the beginning of the source
    pub fn reset(&mut self) {
        self.pos = 0;
        self.fallbacks = 0;
    }

    /// Byte position of the scan cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// How many tokens so far needed the precise tier
    pub fn fallback_count(&self) -> usize {
        self.fallbacks
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|rest| rest.chars().next())
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let source = self.source;
        let table = self.table;

        // Skip til we hit an alphanumeric
        let mut tpos = self.pos;
        while let Some(c) = self.char_at(tpos) {
            if table.is_alnum(c) {
                break;
            }
            tpos += c.len_utf8();
        }
        let start = tpos;

        // Eat the alphanumeric run
        while let Some(c) = self.char_at(tpos) {
            if !table.is_alnum(c) {
                break;
            }
            tpos += c.len_utf8();
        }
        self.pos = tpos;

        if start == tpos {
            return None;
        }

        let ambiguous = match self.char_at(tpos) {
            Some(p) if table.is_punctuation(p) => self
                .char_at(tpos + p.len_utf8())
                .is_some_and(|c| table.is_alnum(c)),
            _ => false,
        };
        if !ambiguous {
            return Some(Token {
                text: &source[start..tpos],
                start,
                end: tpos,
                kind: TokenKind::Word,
            });
        }

        // A lone single-character word before punctuation stands on its own
        if let Some(first) = self.char_at(start) {
            let first_end = start + first.len_utf8();
            if first_end == tpos && table.is_single_char_word(first) {
                self.pos = first_end;
                return Some(Token {
                    text: &source[start..first_end],
                    start,
                    end: first_end,
                    kind: TokenKind::Single,
                });
            }
        }

        // Hand everything up to the next whitespace to the precise tier
        let mut span_end = tpos;
        while let Some(c) = self.char_at(span_end) {
            if table.is_whitespace(c) {
                break;
            }
            span_end += c.len_utf8();
        }

        self.fallbacks += 1;
        match self.precise.first_token(&source[start..span_end]) {
            Some(resolved) => {
                let end = start + resolved.len;
                self.pos = end;
                tracing::trace!(
                    "Precise tier resolved {:?} from span {:?}",
                    &source[start..end],
                    &source[start..span_end]
                );
                Some(Token {
                    text: &source[start..end],
                    start,
                    end,
                    kind: resolved.kind,
                })
            }
            None => Some(Token {
                text: &source[start..tpos],
                start,
                end: tpos,
                kind: TokenKind::Word,
            }),
        }
    }
}

impl<'a> Iterator for FastTokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
