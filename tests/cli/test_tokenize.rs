//! Tests for the tokenize CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::TestCorpus;
use xtindex::cli::commands::tokenize::{execute, TokenizeArgs};
use xtindex::cli::OutputFormat;

fn fixture() -> CliFixture {
    CliFixture::new(TestCorpus::with_files(&[("a.xml", "<a/>")]))
}

#[test]
fn test_tokenize_inline_text() {
    let fixture = fixture();
    let args = TokenizeArgs {
        text: Some("It's 4.30 in the U.S.A.".to_string()),
        file: None,
        precise: false,
    };
    assert!(execute(args, &fixture.services, OutputFormat::Human).is_ok());
}

#[test]
fn test_tokenize_file_precise_json() {
    let fixture = fixture();
    let path = fixture.data.path().join("input.txt");
    std::fs::write(&path, "Whitby abbey, 1851").unwrap();

    let args = TokenizeArgs {
        text: None,
        file: Some(path),
        precise: true,
    };
    assert!(execute(args, &fixture.services, OutputFormat::Json).is_ok());
}

#[test]
fn test_tokenize_missing_file() {
    let fixture = fixture();
    let args = TokenizeArgs {
        text: None,
        file: Some(fixture.data.path().join("missing.txt")),
        precise: false,
    };
    assert!(execute(args, &fixture.services, OutputFormat::Human).is_err());
}

#[test]
fn test_tokenize_without_input() {
    let fixture = fixture();
    let args = TokenizeArgs {
        text: None,
        file: None,
        precise: false,
    };
    assert!(execute(args, &fixture.services, OutputFormat::Human).is_err());
}
