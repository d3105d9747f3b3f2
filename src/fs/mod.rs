//! Filesystem layer for pkg-cleaner.
//!
//! Destructive operations go through the [`FsOps`] trait so that a dry run
//! can swap in an implementation that only prints what it would do. The
//! helpers here classify walk errors the same way everywhere.

mod move_file;
pub mod ops;

pub use move_file::move_file;
pub use ops::{DryRunFs, FsOps, RealFs};

use crate::error::CleanerError;
use std::io;
use std::path::Path;

/// Whether a walk error means the entry disappeared between enumeration and
/// stat (for example a dangling symlink or a concurrent delete).
pub fn is_vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// Convert a walk error into a fatal stat error.
pub fn walk_error(root: &Path, err: walkdir::Error) -> CleanerError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    CleanerError::Stat { path, source }
}
