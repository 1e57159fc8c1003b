//! Precise tokenizer for ambiguous spans.
//!
//! Built on Unicode word boundaries (UAX #29), which already keep
//! contractions ("don't"), abbreviations ("U.S.A") and decimal
//! numbers ("3.14") together. On top of that, company names
//! ("AT&T") and e-mail addresses ("ann@example.org") are joined
//! into single tokens.
//!
//! This tier is much slower than the fast scanner and is only
//! fed the short span the fast scanner could not decide.

use unicode_segmentation::UnicodeSegmentation;

use super::TokenKind;

/// First token of an ambiguous span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreciseToken {
    /// Length in bytes, measured from the start of the span
    pub len: usize,
    pub kind: TokenKind,
}

/// Word-boundary tokenizer used as the fallback tier
#[derive(Debug, Clone, Copy, Default)]
pub struct PreciseTokenizer;

impl PreciseTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize the start of `span`.
    ///
    /// Returns `None` when the span does not begin with a word,
    /// in which case the caller keeps its own fast-path decision.
    pub fn first_token(&self, span: &str) -> Option<PreciseToken> {
        let mut segments = span.split_word_bound_indices().peekable();

        let (start, first) = segments.next()?;
        if start != 0 || !is_word(first) {
            return None;
        }

        let mut end = first.len();
        let mut in_address = false;

        while let Some(&(joiner_at, joiner)) = segments.peek() {
            if joiner_at != end {
                break;
            }
            let joins = match joiner {
                "&" => true,
                "@" => !in_address,
                "." => in_address,
                _ => false,
            };
            if !joins {
                break;
            }
            segments.next();

            match segments.peek() {
                Some(&(word_at, word)) if word_at == end + joiner.len() && is_word(word) => {
                    end = word_at + word.len();
                    if joiner == "@" {
                        in_address = true;
                    }
                    segments.next();
                }
                _ => break,
            }
        }

        Some(PreciseToken {
            len: end,
            kind: classify(&span[..end]),
        })
    }

    /// Tokenize a whole string. Used by benchmarks and the
    /// `tokenize --precise` command; indexing goes through the
    /// fast tokenizer.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<(usize, &'a str, TokenKind)> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some((offset, _)) = rest.char_indices().find(|&(_, c)| c.is_alphanumeric()) else {
                break;
            };
            let start = pos + offset;
            match self.first_token(&text[start..]) {
                Some(token) => {
                    tokens.push((start, &text[start..start + token.len], token.kind));
                    pos = start + token.len;
                }
                None => {
                    // Not a word start under UAX #29 (e.g. a combining
                    // mark); step over the character
                    let step = text[start..].chars().next().map_or(1, char::len_utf8);
                    pos = start + step;
                }
            }
        }

        tokens
    }
}

fn is_word(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_alphanumeric)
}

/// Classify a token produced by the precise tier
pub(crate) fn classify(token: &str) -> TokenKind {
    if token.contains('@') {
        TokenKind::Email
    } else if token.contains('&') {
        TokenKind::Company
    } else if token.contains('\'') {
        TokenKind::Apostrophe
    } else if token.chars().any(|c| c.is_ascii_digit()) && token.chars().any(|c| !c.is_alphanumeric())
    {
        TokenKind::Number
    } else if token.contains('.') {
        if token
            .split('.')
            .filter(|part| !part.is_empty())
            .all(|part| part.chars().count() == 1)
        {
            TokenKind::Acronym
        } else {
            TokenKind::Host
        }
    } else {
        TokenKind::Word
    }
}
