//! Source file discovery.
//!
//! Traverses an index's source directory and yields the XML files to
//! index. Skip patterns are shell wildcards (`*` and `?`) matched
//! case-insensitively against file names. Unreadable entries are
//! logged and skipped.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, XtIndexError};

/// Extension of indexable sources
pub const SOURCE_EXTENSION: &str = "xml";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// File system walker with wildcard skip patterns
#[derive(Debug)]
pub struct FileWalker {
    /// File name patterns to skip (e.g., "*.draft.xml", "tmp?")
    skip_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Arguments
    ///
    /// * `skip_patterns` - Wildcard patterns for file names to skip
    /// * `max_file_size_mb` - Maximum file size in megabytes
    pub fn new(skip_patterns: &[String], max_file_size_mb: usize) -> Result<Self> {
        let skip = skip_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    XtIndexError::ConfigError(format!("Invalid skip pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skip_patterns: skip,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Collect all XML files below `root`, sorted by path
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(XtIndexError::InvalidPath(format!(
                "Source directory not found: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !is_source_file(path) {
                        continue;
                    }

                    if let Ok(metadata) = entry.metadata() {
                        if metadata.len() > self.max_file_size_bytes {
                            tracing::warn!(
                                "Skipping large file: {:?} ({} bytes)",
                                path,
                                metadata.len()
                            );
                            continue;
                        }
                    }

                    if self.is_skipped(path) {
                        tracing::debug!("Skipping {:?} (matches skip pattern)", path);
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        Ok(files)
    }

    /// Whether a file name matches any skip pattern
    pub fn is_skipped(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.skip_patterns
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Skip hidden directories below the root
fn should_process_entry(entry: &DirEntry, root: &Path) -> bool {
    let path = entry.path();
    if path == root {
        return true;
    }

    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => !(name.starts_with('.') && entry.file_type().is_dir()),
        None => true,
    }
}
