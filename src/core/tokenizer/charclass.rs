//! Character classification table.
//!
//! Every code point in the Basic Multilingual Plane maps to one
//! of four classes. The fast tokenizer only ever asks "is this
//! alphanumeric / whitespace / punctuation", so a flat table
//! indexed by code point answers in a single load.
//!
//! The default table is built once per process and never
//! mutated. Custom tables (extra punctuation, a different set of
//! single-character words) are cloned from it.

use once_cell::sync::Lazy;

/// Number of entries in the table (the BMP)
const TABLE_SIZE: usize = 0x10000;

/// Class of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters and digits: runs of these form words
    Alnum,
    /// Token separators
    Whitespace,
    /// Punctuation that may glue two alphanumeric runs together
    Punctuation,
    /// Anything else (symbols, controls, astral-plane characters)
    Other,
}

/// Alphabetic ranges (inclusive)
const ALPHA_RANGES: &[(u32, u32)] = &[
    (0x0041, 0x005a),
    (0x0061, 0x007a),
    (0x00c0, 0x00d6),
    (0x00d8, 0x00f6),
    (0x00f8, 0x00ff),
    (0x0100, 0x1fff),
];

/// Decimal digit ranges across scripts (inclusive)
const DIGIT_RANGES: &[(u32, u32)] = &[
    (0x0030, 0x0039),
    (0x0660, 0x0669),
    (0x06f0, 0x06f9),
    (0x0966, 0x096f),
    (0x09e6, 0x09ef),
    (0x0a66, 0x0a6f),
    (0x0ae6, 0x0aef),
    (0x0b66, 0x0b6f),
    (0x0be7, 0x0bef),
    (0x0c66, 0x0c6f),
    (0x0ce6, 0x0cef),
    (0x0d66, 0x0d6f),
    (0x0e50, 0x0e59),
    (0x0ed0, 0x0ed9),
    (0x1040, 0x1049),
];

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\u{000c}'];

/// Punctuation that can appear inside a word (contractions,
/// abbreviations, hyphenation, e-mail addresses, numbers)
pub const DEFAULT_PUNCTUATION: &[char] = &['\'', '.', '&', '@', '-', '/', ','];

/// Words of a single character that are always emitted on their
/// own, even when glued to punctuation ("x" as a multiplication
/// sign, as in "3 x.5")
pub const DEFAULT_SINGLE_CHAR_WORDS: &[char] = &['x', 'X'];

static DEFAULT_TABLE: Lazy<CharClassTable> = Lazy::new(CharClassTable::build_default);

/// Lookup table classifying characters for tokenization
#[derive(Debug, Clone)]
pub struct CharClassTable {
    classes: Vec<CharClass>,
    single_char_words: Vec<char>,
}

impl CharClassTable {
    /// The process-wide default table
    pub fn shared() -> &'static CharClassTable {
        &DEFAULT_TABLE
    }

    fn build_default() -> Self {
        let mut classes = vec![CharClass::Other; TABLE_SIZE];

        for &(from, to) in ALPHA_RANGES.iter().chain(DIGIT_RANGES) {
            for cp in from..=to {
                classes[cp as usize] = CharClass::Alnum;
            }
        }
        for &c in WHITESPACE {
            classes[c as usize] = CharClass::Whitespace;
        }
        for &c in DEFAULT_PUNCTUATION {
            classes[c as usize] = CharClass::Punctuation;
        }

        Self {
            classes,
            single_char_words: DEFAULT_SINGLE_CHAR_WORDS.to_vec(),
        }
    }

    /// Copy of the default table with additional punctuation.
    ///
    /// Characters outside the BMP are ignored; they always
    /// classify as [`CharClass::Other`].
    pub fn with_extra_punctuation(extra: impl IntoIterator<Item = char>) -> Self {
        let mut table = Self::shared().clone();
        for c in extra {
            if let Some(slot) = table.classes.get_mut(c as usize) {
                *slot = CharClass::Punctuation;
            }
        }
        table
    }

    /// Replace the set of single-character words. An empty set
    /// disables the special case entirely.
    pub fn with_single_char_words(mut self, words: impl IntoIterator<Item = char>) -> Self {
        self.single_char_words = words.into_iter().collect();
        self
    }

    /// Classify a character
    #[inline]
    pub fn classify(&self, c: char) -> CharClass {
        self.classes
            .get(c as usize)
            .copied()
            .unwrap_or(CharClass::Other)
    }

    #[inline]
    pub fn is_alnum(&self, c: char) -> bool {
        self.classify(c) == CharClass::Alnum
    }

    #[inline]
    pub fn is_whitespace(&self, c: char) -> bool {
        self.classify(c) == CharClass::Whitespace
    }

    #[inline]
    pub fn is_punctuation(&self, c: char) -> bool {
        self.classify(c) == CharClass::Punctuation
    }

    /// Whether `c` is emitted as a word of its own
    pub fn is_single_char_word(&self, c: char) -> bool {
        self.single_char_words.contains(&c)
    }
}

impl Default for CharClassTable {
    fn default() -> Self {
        Self::shared().clone()
    }
}
