//! Post-crash index repair.
//!
//! A document is complete only when its chunk sequence ends with a
//! live docInfo marker, and the writer always appends that marker
//! last. An interrupted run therefore leaves at most a tail of text
//! chunks without a marker. The cleaner walks a directory tree,
//! opens every store it finds, tombstones that tail and deletes
//! stores left with no complete documents at all.
//!
//! The pass is idempotent: a consistent store is only read, and an
//! interrupted pass leaves tombstones that the next pass skips.
//! Deleting an emptied store first drops a [`PURGE_MARKER_FILE`]
//! into its directory and removes the backend's own marker file
//! last, so a directory whose deletion was cut short is still
//! recognised and finished by the next pass.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::core::error::{Result, XtIndexError};
use crate::core::storage::store::{ChunkStore, StoreBackend};

/// Present in a store directory while its files are being deleted
pub const PURGE_MARKER_FILE: &str = ".xtindex-purge";

/// Outcome of a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Stores opened and scanned
    pub stores_scanned: usize,

    /// Stores that could not be opened
    pub stores_skipped: usize,

    /// Chunks tombstoned across all stores
    pub fragments_purged: usize,

    /// Stores deleted because no complete document remained
    pub stores_deleted: usize,

    /// Directories removed, including emptied ancestors
    pub dirs_removed: usize,
}

/// Tombstone the incomplete tail of one open store.
///
/// Scans from the highest position down, skipping tombstones, and
/// stops at the first live docInfo marker. Every text chunk passed
/// on the way is tombstoned. The tombstones are committed before
/// returning.
///
/// # Errors
///
/// A failed tombstone or commit is returned as an
/// [`XtIndexError::IntegrityError`] and ends the repair of this
/// store. Chunks already tombstoned stay tombstoned, which only
/// ever removes data from the tail.
pub fn purge_fragments<S: ChunkStore>(store: &mut S) -> Result<usize> {
    let mut purged = 0;

    for pos in (0..store.count()).rev() {
        if store.is_deleted(pos)? {
            continue;
        }
        if store.read_chunk(pos)?.is_doc_info() {
            break;
        }

        store.tombstone(pos).map_err(|e| {
            tracing::error!(
                "Unable to delete chunk {} in [{}]: {}",
                pos,
                store.path().display(),
                e
            );
            XtIndexError::IntegrityError(format!(
                "Failed to tombstone chunk {pos} in {}: {e}",
                store.path().display()
            ))
        })?;
        purged += 1;
    }

    if purged > 0 {
        store.commit().map_err(|e| {
            XtIndexError::IntegrityError(format!(
                "Failed to commit repair of {}: {e}",
                store.path().display()
            ))
        })?;
    }

    Ok(purged)
}

/// Recursive repair pass over a tree of stores
pub struct IndexCleaner<B: StoreBackend> {
    backend: B,
    cancel: Option<Arc<AtomicBool>>,
}

impl<B: StoreBackend> IndexCleaner<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cancel: None,
        }
    }

    /// Stop the walk with [`XtIndexError::Cancelled`] once `flag` is
    /// raised. The flag is checked before each directory and store.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(XtIndexError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Repair every store at or below `root`.
    ///
    /// A directory holding a store is cleaned and not descended
    /// into; any other directory is searched for stores. Empty
    /// directories are pruned upward, never above `root`.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory, on integrity failures
    /// during repair, and on cancellation. Stores that cannot be
    /// opened are logged and skipped.
    pub fn process_dir(&self, root: &Path) -> Result<CleanReport> {
        if !root.is_dir() {
            return Err(XtIndexError::InvalidPath(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let mut report = CleanReport::default();
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        // Store directories are leaves. An ancestor is only removed
        // once empty, so a sibling still pending keeps it alive
        while let Some(dir) = pending.pop() {
            self.check_cancelled()?;

            if !dir.is_dir() {
                continue;
            }

            if dir.join(PURGE_MARKER_FILE).is_file() {
                tracing::info!("Resuming deletion of index [{}]", dir.display());
                self.delete_store(&dir, root, &mut report);
                continue;
            }

            if self.backend.exists(&dir) {
                self.clean_index(&dir, root, &mut report)?;
                continue;
            }

            let mut children = list_subdirs(&dir);
            children.reverse();
            pending.extend(children);
        }

        Ok(report)
    }

    fn clean_index(&self, dir: &Path, root: &Path, report: &mut CleanReport) -> Result<()> {
        tracing::info!("Index: [{}]", dir.display());

        let mut store = match self.backend.open(dir) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Unable to Open Index [{}]: {}", dir.display(), e);
                report.stores_skipped += 1;
                return Ok(());
            }
        };
        report.stores_scanned += 1;

        let purged = purge_fragments(&mut store)?;
        report.fragments_purged += purged;
        if purged > 0 {
            tracing::info!("{} Incomplete Document Fragment(s) Purged.", purged);
        } else {
            tracing::info!("No Incomplete Documents Found.");
        }

        let empty = store.live_count() == 0;
        if let Err(e) = store.close() {
            tracing::warn!("Unable to close index [{}]: {}", dir.display(), e);
            return Ok(());
        }
        drop(store);

        if empty {
            self.delete_store(dir, root, report);
        }

        Ok(())
    }

    /// Remove an emptied store and prune the directories it leaves
    /// empty. Failures are logged and leave the store in place.
    fn delete_store(&self, dir: &Path, root: &Path, report: &mut CleanReport) {
        if self.remove_store_files(dir) {
            report.stores_deleted += 1;
            report.dirs_removed += prune_empty_dirs(dir, root);
            tracing::info!("Empty Index Deleted.");
        }
    }

    /// Delete every file directly inside a store directory.
    ///
    /// The purge marker is written first. The backend's marker file
    /// goes only after every other file is gone, and the purge marker
    /// after that. Returns false if any file survived, in which case
    /// the directory is left alone.
    fn remove_store_files(&self, dir: &Path) -> bool {
        let pending = dir.join(PURGE_MARKER_FILE);
        if !pending.is_file() {
            if let Err(e) = std::fs::write(&pending, b"") {
                tracing::warn!("Unable to mark index [{}] for deletion: {}", dir.display(), e);
                return false;
            }
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Unable to list index files [{}]: {}", dir.display(), e);
                return false;
            }
        };

        let marker = self.backend.marker_file();
        let mut all_removed = true;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == PURGE_MARKER_FILE || name == marker {
                continue;
            }
            if let Err(e) = self.backend.remove_file(&path) {
                tracing::warn!("Unable to delete index file [{}]: {}", path.display(), e);
                all_removed = false;
            }
        }

        let marker_path = dir.join(marker);
        if all_removed && marker_path.is_file() {
            if let Err(e) = self.backend.remove_file(&marker_path) {
                tracing::warn!("Unable to delete index file [{}]: {}", marker_path.display(), e);
                all_removed = false;
            }
        }

        if all_removed {
            if let Err(e) = std::fs::remove_file(&pending) {
                tracing::warn!("Unable to delete index file [{}]: {}", pending.display(), e);
                all_removed = false;
            }
        }

        if !all_removed {
            tracing::info!(
                "Empty index [{}] could not be removed completely",
                dir.display()
            );
        }
        all_removed
    }
}

/// Subdirectories of `dir`, sorted by name. Symlinks are not followed.
fn list_subdirs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Unable to read directory [{}]: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect()
}

/// Remove `dir` and each now-empty ancestor up to and including
/// `root`. Stops at the first directory that is not empty or cannot
/// be removed. Returns the number of directories removed.
fn prune_empty_dirs(dir: &Path, root: &Path) -> usize {
    let mut removed = 0;
    let mut current = Some(dir);

    while let Some(path) = current {
        if !path.starts_with(root) {
            break;
        }
        match std::fs::remove_dir(path) {
            Ok(()) => {
                tracing::debug!("Removed empty directory [{}]", path.display());
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::DirectoryNotEmpty => break,
            Err(e) => {
                tracing::warn!("Unable to delete directory [{}]: {}", path.display(), e);
                break;
            }
        }
        if path == root {
            break;
        }
        current = path.parent();
    }

    removed
}
