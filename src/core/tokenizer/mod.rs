//! Two-tier text tokenizer.
//!
//! - **charclass**: process-wide character classification table
//! - **fast**: forward scanner over alphanumeric runs
//! - **precise**: Unicode word-boundary tokenizer, used only for
//!   spans the fast scanner cannot decide
//!
//! Tokens borrow from the source text and carry byte offsets into
//! it; they are not meant to be retained past the indexing of a
//! single document.

pub mod charclass;
pub mod fast;
pub mod precise;

use serde::Serialize;

pub use charclass::{CharClass, CharClassTable};
pub use fast::FastTokenizer;
pub use precise::PreciseTokenizer;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Plain alphanumeric run
    Word,
    /// Single-character word split off before punctuation ("x")
    Single,
    /// Word with an embedded apostrophe ("don't")
    Apostrophe,
    /// Dotted single letters ("U.S.A")
    Acronym,
    /// Digits with embedded punctuation ("3.14", "1,000")
    Number,
    /// Words joined by '&' ("AT&T")
    Company,
    /// Address joined by '@' ("ann@example.org")
    Email,
    /// Dotted multi-letter words ("example.org")
    Host,
}

/// A token borrowed from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub kind: TokenKind,
}
