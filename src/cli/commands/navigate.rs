//! Navigate command - enumerate an axis of a stored document tree

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::tree::{Axis, AxisEnumeration, NodeId, NodeKind, NodeStore, NodeTest, TreeFile};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Longest value shown per node in human output
const VALUE_PREVIEW_CHARS: usize = 60;

/// Arguments for the navigate command
#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// Tree file written by the indexer (`<db>/trees/...xtree`)
    pub file: PathBuf,

    /// Starting node id (0 is the document node)
    #[arg(long, short = 'n', default_value_t = 0)]
    pub node: u32,

    /// Axis to enumerate (self, parent, ancestor, child, descendant,
    /// following-sibling, preceding-sibling, following, preceding, attribute)
    #[arg(long, short = 'a', default_value = "child")]
    pub axis: Axis,

    /// Only nodes of this kind (element, attribute, text, comment, pi, document)
    #[arg(long, short = 'k')]
    pub kind: Option<NodeKind>,

    /// Only nodes with this name; implies --kind element unless given
    #[arg(long)]
    pub name: Option<String>,

    /// Include the starting node when it passes the test
    #[arg(long)]
    pub include_self: bool,

    /// Stop after this many nodes
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NodeRow {
    pub id: u32,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Navigate response
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub file: String,
    pub start: u32,
    pub axis: Axis,
    pub nodes: Vec<NodeRow>,
}

fn node_test(kind: Option<NodeKind>, name: Option<String>) -> NodeTest {
    match (kind, name) {
        (kind, Some(name)) => NodeTest::Name(kind.unwrap_or(NodeKind::Element), name),
        (Some(kind), None) => NodeTest::Kind(kind),
        (None, None) => NodeTest::Any,
    }
}

/// Execute the navigate command
pub fn execute(
    args: NavigateArgs,
    _services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = TreeFile::open(&args.file)?;
    let start = NodeId(args.node);
    let test = node_test(args.kind, args.name);

    let enumeration = AxisEnumeration::new(&tree, args.axis, start, test, args.include_self)?;

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut nodes = Vec::new();
    for node in enumeration.take(limit) {
        let node = node?;
        nodes.push(NodeRow {
            id: node.0,
            kind: tree.kind(node)?,
            name: tree.name(node)?,
            value: tree.value(node)?,
        });
    }

    let response = NavigateResponse {
        file: args.file.to_string_lossy().into_owned(),
        start: args.node,
        axis: args.axis,
        nodes,
    };

    match format {
        OutputFormat::Human => {
            for row in &response.nodes {
                let mut line = format!(
                    "{} {}",
                    colors::number(&format!("{:>8}", NodeId(row.id).to_string())),
                    colors::dim(&format!("{:<22}", row.kind.as_str()))
                );
                if let Some(name) = &row.name {
                    line.push_str(&format!(" {}", colors::label(name)));
                }
                if let Some(value) = &row.value {
                    line.push_str(&format!(" {:?}", preview(value)));
                }
                println!("{line}");
            }
            println!(
                "{} {} node(s) on {} of {}",
                colors::label("Total:"),
                colors::number(&response.nodes.len().to_string()),
                response.axis,
                NodeId(response.start)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn preview(value: &str) -> String {
    if value.chars().count() <= VALUE_PREVIEW_CHARS {
        return value.to_string();
    }
    let mut out: String = value.chars().take(VALUE_PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}
