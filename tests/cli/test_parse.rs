//! Tests for argument parsing and completions

use clap::Parser;
use clap_complete::Shell;
use xtindex::cli::commands::completions::render;
use xtindex::cli::{Cli, Commands, OutputFormat};
use xtindex::core::tree::{Axis, NodeKind};

#[test]
fn test_parse_index_with_global_flags() {
    let cli = Cli::try_parse_from(["xtindex", "index", "letters", "--format", "json", "-q"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::Index(args) => {
            assert_eq!(args.name, "letters");
            assert!(args.quiet);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_navigate() {
    let cli = Cli::try_parse_from([
        "xtindex",
        "navigate",
        "doc.xtree",
        "--node",
        "7",
        "--axis",
        "preceding-sibling",
        "--kind",
        "element",
        "--include-self",
    ])
    .unwrap();

    match cli.command {
        Commands::Navigate(args) => {
            assert_eq!(args.node, 7);
            assert_eq!(args.axis, Axis::PrecedingSibling);
            assert_eq!(args.kind, Some(NodeKind::Element));
            assert!(args.include_self);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_axis() {
    assert!(Cli::try_parse_from(["xtindex", "navigate", "doc.xtree", "--axis", "sideways"]).is_err());
}

#[test]
fn test_parse_tokenize_needs_input() {
    assert!(Cli::try_parse_from(["xtindex", "tokenize"]).is_err());
    assert!(Cli::try_parse_from(["xtindex", "tokenize", "words", "--file", "f.txt"]).is_err());
    assert!(Cli::try_parse_from(["xtindex", "tokenize", "--file", "f.txt"]).is_ok());
}

#[test]
fn test_zsh_completions_name_binary() {
    let script = String::from_utf8(render(Shell::Zsh)).unwrap();
    assert!(script.contains("xtindex"));
}
