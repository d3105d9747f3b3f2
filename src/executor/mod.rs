//! Batch execution of filesystem decisions.
//!
//! Every batch runs on a dedicated rayon pool sized by `jobs`, so the number
//! of open descriptors stays bounded. All operations in a batch run to
//! completion; failures are logged one by one and reported together.

use crate::error::{CleanerError, Result, format_chain};
use crate::fs::FsOps;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Result of a single operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// The path was already gone.
    Skipped,
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped: usize,
}

/// Runs stat, delete, copy and move batches under `root`.
pub struct Executor<'a> {
    root: &'a Path,
    ops: &'a dyn FsOps,
    pool: ThreadPool,
}

impl<'a> Executor<'a> {
    pub fn new(root: &'a Path, ops: &'a dyn FsOps, jobs: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .thread_name(|i| format!("pkg-cleaner-{}", i))
            .build()
            .map_err(|e| CleanerError::Config(format!("failed to start worker pool: {}", e)))?;

        Ok(Self { root, ops, pool })
    }

    /// Return the zero-length files among `candidates`, in input order.
    ///
    /// A candidate that no longer exists (for example a symlink whose target
    /// is gone) counts as empty and is reported with a warning. Any other
    /// stat failure is fatal.
    pub fn search_empty_files(&self, candidates: &[String]) -> Result<Vec<String>> {
        let results: Vec<Result<Option<String>>> = self.pool.install(|| {
            candidates
                .par_iter()
                .map(|path| self.stat_empty(path))
                .collect()
        });

        let mut empty = Vec::new();
        for result in results {
            if let Some(path) = result? {
                empty.push(path);
            }
        }

        debug!(count = empty.len(), "found empty files");
        Ok(empty)
    }

    fn stat_empty(&self, path: &str) -> Result<Option<String>> {
        let full = self.root.join(path);
        match fs::metadata(&full) {
            Ok(meta) if meta.is_file() && meta.len() == 0 => Ok(Some(path.to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("file '{}' does not exist, treating it as empty", full.display());
                Ok(Some(path.to_string()))
            }
            Err(e) => Err(CleanerError::Stat {
                path: full,
                source: e,
            }),
        }
    }

    /// Delete every path, choosing file or tree removal from a fresh stat.
    pub fn delete_paths(&self, paths: &[String]) -> Result<BatchSummary> {
        let results: Vec<Result<Outcome>> = self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.delete_one(path))
                .collect()
        });

        finish("delete", results)
    }

    fn delete_one(&self, path: &str) -> Result<Outcome> {
        let full = self.root.join(path);

        let meta = match fs::symlink_metadata(&full) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("'{}' is already gone, skipping", full.display());
                return Ok(Outcome::Skipped);
            }
            Err(e) => {
                return Err(CleanerError::Stat {
                    path: full,
                    source: e,
                });
            }
        };

        let removed = if meta.is_dir() {
            self.ops.remove_tree(&full)
        } else {
            self.ops.remove_file(&full)
        };

        match removed {
            Ok(()) => Ok(Outcome::Done),
            Err(e) if is_not_found(&e) => {
                warn!("'{}' is already gone, skipping", full.display());
                Ok(Outcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Copy `files` into `dest`, keeping their root-relative layout.
    pub fn copy_files(&self, files: &[String], dest: &Path) -> Result<BatchSummary> {
        self.make_parent_dirs(files, dest)?;

        let results: Vec<Result<Outcome>> = self.pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    self.ops
                        .copy_tree(&self.root.join(file), &dest.join(file))
                        .map(|()| Outcome::Done)
                })
                .collect()
        });

        finish("copy", results)
    }

    /// Move `files` into `dest`, keeping their root-relative layout.
    pub fn move_files(&self, files: &[String], dest: &Path) -> Result<BatchSummary> {
        self.make_parent_dirs(files, dest)?;

        let results: Vec<Result<Outcome>> = self.pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    self.ops
                        .move_file(&self.root.join(file), &dest.join(file))
                        .map(|()| Outcome::Done)
                })
                .collect()
        });

        finish("move", results)
    }

    /// Create `dest` and each distinct parent directory once, shallowest first.
    fn make_parent_dirs(&self, files: &[String], dest: &Path) -> Result<()> {
        let parents: BTreeSet<PathBuf> = files
            .iter()
            .filter_map(|file| file.rsplit_once('/').map(|(parent, _)| dest.join(parent)))
            .collect();

        self.ops.make_tree(dest)?;
        for parent in &parents {
            self.ops.make_tree(parent)?;
        }
        Ok(())
    }
}

fn is_not_found(err: &CleanerError) -> bool {
    matches!(err, CleanerError::Fs { source, .. } if source.kind() == io::ErrorKind::NotFound)
}

fn finish(action: &str, results: Vec<Result<Outcome>>) -> Result<BatchSummary> {
    let total = results.len();
    let mut summary = BatchSummary::default();
    let mut failures = Vec::new();

    for result in results {
        match result {
            Ok(Outcome::Done) => summary.done += 1,
            Ok(Outcome::Skipped) => summary.skipped += 1,
            Err(e) => {
                error!("{} failed: {}", action, format_chain(&e));
                failures.push(e);
            }
        }
    }

    let failed = failures.len();
    match failures.into_iter().next() {
        None => Ok(summary),
        Some(first) => Err(CleanerError::Batch {
            failed,
            total,
            first: Box::new(first),
        }),
    }
}
