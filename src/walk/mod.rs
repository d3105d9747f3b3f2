//! Guarded tree walk.
//!
//! [`TreeGuard`] decides, for every node the walk visits, whether the node is
//! kept, whether the walk continues into it, and whether it is queued for
//! deletion. A directory that holds no kept file is queued as a whole and the
//! walk never visits anything below it.

use crate::error::Result;
use crate::fs::{is_vanished, walk_error};
use crate::keepset::{KeepSet, normalize_path, relative_path};
use std::path::Path;
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Decision for a single visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Kept file; nothing below it.
    Keep,
    /// Kept directory; continue into its children.
    Descend,
    /// Queued for deletion; do not enumerate children.
    Prune,
}

/// Per-node keep/prune policy backed by a [`KeepSet`].
#[derive(Debug)]
pub struct TreeGuard<'a> {
    keep: &'a KeepSet,
    paths_to_delete: Vec<String>,
}

impl<'a> TreeGuard<'a> {
    pub fn new(keep: &'a KeepSet) -> Self {
        Self {
            keep,
            paths_to_delete: Vec::new(),
        }
    }

    /// Decide what happens to the node at root-relative `path`.
    ///
    /// Pruned paths are appended to the delete list in call order. Calling
    /// this twice for the same path appends it twice.
    pub fn visit(&mut self, path: &str, is_dir: bool) -> Visit {
        let path = normalize_path(path);

        if path == "." {
            return Visit::Descend;
        }

        let decision = if is_dir {
            if self.keep.keeps_dir(&path) {
                Visit::Descend
            } else {
                Visit::Prune
            }
        } else if self.keep.keeps_file(&path) {
            Visit::Keep
        } else {
            Visit::Prune
        };

        if decision == Visit::Prune {
            trace!(path = %path, is_dir, "queued for deletion");
            self.paths_to_delete.push(path);
        }
        decision
    }

    pub fn paths_to_delete(&self) -> &[String] {
        &self.paths_to_delete
    }

    pub fn into_paths_to_delete(self) -> Vec<String> {
        self.paths_to_delete
    }
}

/// Walk the tree under `root`, consulting `guard` before entering any node.
///
/// A pruned directory is skipped as a whole, so nothing below it is ever
/// visited. Symlinks are not followed. Siblings are visited in file-name
/// order so the delete list is deterministic.
pub fn walk_tree(root: &Path, guard: &mut TreeGuard<'_>) -> Result<()> {
    let mut it = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_vanished(&err) => {
                warn!("entry vanished during walk: {}", err);
                continue;
            }
            Err(err) => return Err(walk_error(root, err)),
        };

        let is_dir = entry.file_type().is_dir();
        let relative = relative_path(root, entry.path());
        if guard.visit(&relative, is_dir) == Visit::Prune && is_dir {
            it.skip_current_dir();
        }
    }
    Ok(())
}

/// Resolve the delete list for `root` in one pass.
pub fn search_paths_to_delete(root: &Path, keep: &KeepSet) -> Result<Vec<String>> {
    let mut guard = TreeGuard::new(keep);
    walk_tree(root, &mut guard)?;
    Ok(guard.into_paths_to_delete())
}
