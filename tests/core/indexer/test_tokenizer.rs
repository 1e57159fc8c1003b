// Tokenizer behaviour on document-like text

use xtindex::core::config::TokenizerConfig;
use xtindex::core::tokenizer::{FastTokenizer, PreciseTokenizer, TokenKind};

#[test]
fn test_offsets_slice_the_source() {
    let text = "Mr. Brontë's letter, dated 1851, reached Haworth at 4.30 p.m.";
    for token in FastTokenizer::new(text) {
        assert_eq!(&text[token.start..token.end], token.text);
        assert!(token.start < token.end);
    }
}

#[test]
fn test_plain_prose_agrees_with_precise_tier() {
    let text = "It was a dark and stormy night; the rain fell in torrents";
    let fast: Vec<&str> = FastTokenizer::new(text).map(|t| t.text).collect();
    let precise: Vec<&str> = PreciseTokenizer::new()
        .tokenize(text)
        .into_iter()
        .map(|(_, word, _)| word)
        .collect();
    assert_eq!(fast, precise);
}

#[test]
fn test_plain_prose_never_falls_back() {
    let text = "one two three, four five. six";
    let mut tokenizer = FastTokenizer::new(text);
    assert_eq!(tokenizer.by_ref().count(), 6);
    assert_eq!(tokenizer.fallback_count(), 0);
}

#[test]
fn test_contractions_are_single_tokens() {
    let tokens: Vec<_> = FastTokenizer::new("we can't, we won't").collect();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["we", "can't", "we", "won't"]);
    assert_eq!(tokens[1].kind, TokenKind::Apostrophe);
}

#[test]
fn test_config_table_adds_punctuation() {
    let config: TokenizerConfig = toml::from_str("extra_punctuation = \"\u{2019}\"").unwrap();
    let table = config.char_table();
    let texts: Vec<&str> = FastTokenizer::with_table("it\u{2019}s here", &table)
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, vec!["it\u{2019}s", "here"]);
}
