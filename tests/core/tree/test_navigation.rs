// Axis navigation over persisted tree files

use crate::common::{BOOK_XML, LETTER_XML};
use tempfile::TempDir;
use xtindex::core::tree::{
    parse_xml, Axis, AxisEnumeration, FlatTree, NodeId, NodeKind, NodeStore, NodeTest, TreeFile,
};

fn persisted(xml: &str) -> (TempDir, FlatTree, TreeFile) {
    let temp_dir = TempDir::new().unwrap();
    let tree = parse_xml(xml).unwrap();
    let path = temp_dir.path().join("doc.xml.xtree");
    TreeFile::write(&tree, &path).unwrap();
    let file = TreeFile::open(&path).unwrap();
    (temp_dir, tree, file)
}

fn collect<S: NodeStore>(
    store: &S,
    axis: Axis,
    start: u32,
    test: NodeTest,
    include_self: bool,
) -> Vec<u32> {
    AxisEnumeration::new(store, axis, NodeId(start), test, include_self)
        .unwrap()
        .map(|node| node.unwrap().0)
        .collect()
}

#[test]
fn test_file_and_memory_agree_on_every_axis() {
    let (_dir, tree, file) = persisted(BOOK_XML);
    assert_eq!(tree.node_count(), file.node_count());

    for axis in Axis::ALL {
        for start in 0..tree.node_count() as u32 {
            for include_self in [false, true] {
                assert_eq!(
                    collect(&tree, axis, start, NodeTest::Any, include_self),
                    collect(&file, axis, start, NodeTest::Any, include_self),
                    "axis={axis} start={start} include_self={include_self}"
                );
            }
        }
    }
}

#[test]
fn test_book_axes_from_file() {
    let (_dir, _tree, file) = persisted(BOOK_XML);

    // Second paragraph's text up to the document
    assert_eq!(collect(&file, Axis::Ancestor, 13, NodeTest::Any, false), vec![12, 10, 1, 0]);
    assert_eq!(
        collect(&file, Axis::Ancestor, 13, NodeTest::Kind(NodeKind::Element), true),
        vec![12, 10, 1]
    );

    // Chapters only, by name
    let chapters = NodeTest::Name(NodeKind::Element, "ch".to_string());
    assert_eq!(collect(&file, Axis::Child, 1, chapters.clone(), false), vec![5, 10]);
    assert_eq!(collect(&file, Axis::PrecedingSibling, 10, chapters, false), vec![5]);

    // Attributes are never on the following axis
    assert_eq!(collect(&file, Axis::Following, 7, NodeTest::Any, false), vec![9, 10, 12, 13]);
    assert_eq!(collect(&file, Axis::Preceding, 10, NodeTest::Any, false), vec![9, 8, 7, 5, 4, 3]);
    assert_eq!(
        collect(&file, Axis::Descendant, 0, NodeTest::Kind(NodeKind::Comment), false),
        vec![9]
    );
    assert_eq!(collect(&file, Axis::Attribute, 1, NodeTest::Any, false), vec![2]);
}

#[test]
fn test_node_contents_from_file() {
    let (_dir, _tree, file) = persisted(BOOK_XML);

    assert_eq!(file.kind(NodeId(2)).unwrap(), NodeKind::Attribute);
    assert_eq!(file.name(NodeId(2)).unwrap().as_deref(), Some("lang"));
    assert_eq!(file.value(NodeId(2)).unwrap().as_deref(), Some("en"));
    assert_eq!(file.parent(NodeId(2)).unwrap(), Some(NodeId(1)));
    assert_eq!(file.value(NodeId(9)).unwrap().as_deref(), Some(" draft "));
    assert_eq!(file.string_value(NodeId(5)).unwrap(), "First words here.");
}

#[test]
fn test_entities_decoded_in_stored_text() {
    let (_dir, tree, file) = persisted(LETTER_XML);
    let texts = collect(&file, Axis::Descendant, 0, NodeTest::Kind(NodeKind::Text), false);
    let values: Vec<String> = texts
        .iter()
        .map(|&id| file.value(NodeId(id)).unwrap().unwrap())
        .collect();

    assert_eq!(values.len(), 4);
    assert!(values[1].contains("fine & dry"));
    assert_eq!(tree.value(NodeId(texts[3])).unwrap().as_deref(), Some("Yours, E."));
}

#[test]
fn test_get_another_on_file() {
    let (_dir, _tree, file) = persisted(BOOK_XML);
    let mut cursor =
        AxisEnumeration::new(&file, Axis::Descendant, NodeId(1), NodeTest::Any, false).unwrap();
    let first: Vec<NodeId> = cursor.by_ref().map(|n| n.unwrap()).collect();
    assert!(!cursor.has_more());

    let again: Vec<NodeId> = cursor.get_another().unwrap().map(|n| n.unwrap()).collect();
    assert_eq!(first, again);
    assert_eq!(first.len(), 9);
}
