//! Tests for the navigate CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::TestCorpus;
use std::path::PathBuf;
use xtindex::cli::commands::navigate::{execute, NavigateArgs};
use xtindex::cli::OutputFormat;
use xtindex::core::tree::{Axis, NodeKind};

fn indexed() -> (CliFixture, PathBuf) {
    let fixture = CliFixture::new(TestCorpus::small());
    fixture.index();
    let tree = fixture.db().join("trees/books/book.xml.xtree");
    (fixture, tree)
}

fn args(file: PathBuf, node: u32, axis: Axis) -> NavigateArgs {
    NavigateArgs {
        file,
        node,
        axis,
        kind: None,
        name: None,
        include_self: false,
        limit: None,
    }
}

#[test]
fn test_navigate_children_human() {
    let (fixture, tree) = indexed();
    let result = execute(args(tree, 1, Axis::Child), &fixture.services, OutputFormat::Human);
    assert!(result.is_ok(), "Navigate should succeed: {:?}", result.err());
}

#[test]
fn test_navigate_filtered_json() {
    let (fixture, tree) = indexed();
    let mut args = args(tree, 0, Axis::Descendant);
    args.kind = Some(NodeKind::Element);
    args.name = Some("p".to_string());
    args.include_self = true;
    args.limit = Some(1);

    assert!(execute(args, &fixture.services, OutputFormat::Json).is_ok());
}

#[test]
fn test_navigate_unknown_node() {
    let (fixture, tree) = indexed();
    let result = execute(args(tree, 9_999, Axis::Ancestor), &fixture.services, OutputFormat::Human);
    assert!(result.is_err());
}

#[test]
fn test_navigate_missing_tree_file() {
    let (fixture, _) = indexed();
    let missing = fixture.db().join("trees/none.xtree");
    let result = execute(args(missing, 0, Axis::Child), &fixture.services, OutputFormat::Human);
    assert!(result.is_err());
}
