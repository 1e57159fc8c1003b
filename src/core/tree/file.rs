//! On-disk node store.
//!
//! A tree file holds the node records of a [`FlatTree`] as
//! fixed-size little-endian records followed by a string table.
//! [`TreeFile`] reads a record or a string only when asked, so
//! navigating a large document touches just the nodes visited.
//!
//! ```text
//! header   magic "XTREE\0v1" | node_count u32 | string_count u32 | strings_offset u64
//! records  node_count x 28 bytes
//!          kind u8 | pad [u8; 3] | parent | first_child | next_sibling
//!          | first_attribute | name | value   (u32 each, u32::MAX = none)
//! strings  string_count x (offset u64 | len u32), then UTF-8 data
//! ```

use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::error::{Result, XtIndexError};
use crate::core::tree::flat::{link, FlatTree, NodeRecord};
use crate::core::tree::{NodeId, NodeKind, NodeStore};

const MAGIC: &[u8; 8] = b"XTREE\0v1";
const HEADER_SIZE: u64 = 24;
const RECORD_SIZE: u64 = 28;
const STRING_ENTRY_SIZE: u64 = 12;

/// File extension for persisted trees
pub const TREE_FILE_EXTENSION: &str = "xtree";

/// A node store reading from a tree file
#[derive(Debug)]
pub struct TreeFile {
    path: PathBuf,
    file: Mutex<File>,
    node_count: u32,
    string_count: u32,
    strings_offset: u64,
    file_len: u64,
}

impl TreeFile {
    /// Write `tree` to `path`, replacing any existing file
    pub fn write(tree: &FlatTree, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("xtree.tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp_path)?);

            let strings_offset = HEADER_SIZE + RECORD_SIZE * tree.nodes.len() as u64;
            out.write_all(MAGIC)?;
            out.write_all(&(tree.nodes.len() as u32).to_le_bytes())?;
            out.write_all(&(tree.strings.len() as u32).to_le_bytes())?;
            out.write_all(&strings_offset.to_le_bytes())?;

            for record in &tree.nodes {
                out.write_all(&[record.kind.to_byte(), 0, 0, 0])?;
                for field in [
                    record.parent,
                    record.first_child,
                    record.next_sibling,
                    record.first_attribute,
                    record.name,
                    record.value,
                ] {
                    out.write_all(&field.to_le_bytes())?;
                }
            }

            let data_offset = strings_offset + STRING_ENTRY_SIZE * tree.strings.len() as u64;
            let mut offset = data_offset;
            for s in &tree.strings {
                out.write_all(&offset.to_le_bytes())?;
                out.write_all(&(s.len() as u32).to_le_bytes())?;
                offset += s.len() as u64;
            }
            for s in &tree.strings {
                out.write_all(s.as_bytes())?;
            }

            out.flush()?;
        }
        std::fs::rename(&tmp_path, path)?;

        tracing::debug!(
            "Wrote tree file {} ({} nodes)",
            path.display(),
            tree.nodes.len()
        );
        Ok(())
    }

    /// Open a tree file, reading only its header
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            XtIndexError::TreeError(format!("Failed to open tree file {}: {e}", path.display()))
        })?;

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header).map_err(|_| {
            XtIndexError::TreeError(format!("Tree file {} is truncated", path.display()))
        })?;
        if &header[..8] != MAGIC {
            return Err(XtIndexError::TreeError(format!(
                "{} is not a tree file",
                path.display()
            )));
        }

        let node_count = u32_at(&header, 8);
        let string_count = u32_at(&header, 12);
        let strings_offset = u64::from_le_bytes(header[16..24].try_into().unwrap_or_default());

        let expected = HEADER_SIZE + RECORD_SIZE * node_count as u64;
        let file_len = file.metadata()?.len();
        let table_end = expected + STRING_ENTRY_SIZE * string_count as u64;
        if strings_offset != expected || file_len < table_end {
            return Err(XtIndexError::TreeError(format!(
                "Tree file {} is corrupt",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            node_count,
            string_count,
            strings_offset,
            file_len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record and string into memory
    pub fn load(&self) -> Result<FlatTree> {
        let nodes = (0..self.node_count)
            .map(|i| self.record(NodeId(i)))
            .collect::<Result<Vec<_>>>()?;
        let strings = (0..self.string_count)
            .map(|i| self.read_string(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(FlatTree::from_parts(nodes, strings))
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| XtIndexError::TreeError("Tree file lock poisoned".to_string()))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf).map_err(|e| {
            XtIndexError::TreeError(format!(
                "Failed to read {} at offset {offset}: {e}",
                self.path.display()
            ))
        })
    }

    fn record(&self, node: NodeId) -> Result<NodeRecord> {
        if node.0 >= self.node_count {
            return Err(XtIndexError::TreeError(format!(
                "No node {node} in {}",
                self.path.display()
            )));
        }

        let mut buf = [0u8; RECORD_SIZE as usize];
        self.read_at(HEADER_SIZE + RECORD_SIZE * node.0 as u64, &mut buf)?;

        let kind = NodeKind::from_byte(buf[0]).ok_or_else(|| {
            XtIndexError::TreeError(format!(
                "Bad node kind {} for {node} in {}",
                buf[0],
                self.path.display()
            ))
        })?;

        Ok(NodeRecord {
            kind,
            parent: u32_at(&buf, 4),
            first_child: u32_at(&buf, 8),
            next_sibling: u32_at(&buf, 12),
            first_attribute: u32_at(&buf, 16),
            name: u32_at(&buf, 20),
            value: u32_at(&buf, 24),
        })
    }

    fn read_string(&self, index: u32) -> Result<String> {
        if index >= self.string_count {
            return Err(XtIndexError::TreeError(format!(
                "No string {index} in {}",
                self.path.display()
            )));
        }

        let mut entry = [0u8; STRING_ENTRY_SIZE as usize];
        self.read_at(
            self.strings_offset + STRING_ENTRY_SIZE * index as u64,
            &mut entry,
        )?;
        let offset = u64::from_le_bytes(entry[..8].try_into().unwrap_or_default());
        let len = u32_at(&entry, 8);

        // Never allocate for a string that cannot fit in the file
        if offset.checked_add(len as u64).map_or(true, |end| end > self.file_len) {
            return Err(XtIndexError::TreeError(format!(
                "String {index} in {} is out of bounds",
                self.path.display()
            )));
        }

        let mut data = vec![0u8; len as usize];
        self.read_at(offset, &mut data)?;
        String::from_utf8(data).map_err(|_| {
            XtIndexError::TreeError(format!(
                "String {index} in {} is not UTF-8",
                self.path.display()
            ))
        })
    }

    fn string(&self, index: u32) -> Result<Option<String>> {
        if index == u32::MAX {
            return Ok(None);
        }
        self.read_string(index).map(Some)
    }
}

fn u32_at(buf: &[u8], at: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(bytes)
}

impl NodeStore for TreeFile {
    fn node_count(&self) -> usize {
        self.node_count as usize
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.record(node)?.kind)
    }

    fn name(&self, node: NodeId) -> Result<Option<String>> {
        self.string(self.record(node)?.name)
    }

    fn value(&self, node: NodeId) -> Result<Option<String>> {
        self.string(self.record(node)?.value)
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.parent))
    }

    fn first_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.first_child))
    }

    fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.next_sibling))
    }

    fn first_attribute(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(link(self.record(node)?.first_attribute))
    }
}
