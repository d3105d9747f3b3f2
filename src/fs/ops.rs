//! Destructive filesystem operations behind a swappable interface.
//!
//! [`RealFs`] performs the I/O. [`DryRunFs`] performs none and prints the
//! equivalent shell command instead. One of them is chosen at startup from
//! `--dry-run` and never changes during a run.

use crate::error::{CleanerError, Result};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use walkdir::WalkDir;

/// The operations the executors need from the filesystem.
///
/// Implementations are shared across worker threads.
pub trait FsOps: Send + Sync {
    /// Remove a single file or symlink.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything below it.
    fn remove_tree(&self, path: &Path) -> Result<()>;

    /// Copy a file, or a directory recursively, to `to`.
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create a directory and any missing parents.
    fn make_tree(&self, path: &Path) -> Result<()>;

    /// Move a single file to `to`.
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Performs real I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FsOps for RealFs {
    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| CleanerError::fs("remove", path, e))
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| CleanerError::fs("remove directory", path, e))
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        let meta = fs::symlink_metadata(from).map_err(|e| CleanerError::Stat {
            path: from.to_path_buf(),
            source: e,
        })?;

        if meta.file_type().is_symlink() {
            return copy_symlink(from, to);
        }
        if !meta.is_dir() {
            fs::copy(from, to).map_err(|e| CleanerError::fs("copy", from, e))?;
            return Ok(());
        }

        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| crate::fs::walk_error(from, e))?;
            let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                self.make_tree(&target)?;
            } else if entry.file_type().is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target)
                    .map_err(|e| CleanerError::fs("copy", entry.path(), e))?;
            }
        }
        Ok(())
    }

    fn make_tree(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| CleanerError::fs("create directory", path, e))
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        crate::fs::move_file(from, to)
    }
}

/// Recreate the link at `from` as a link at `to` with the same target.
///
/// The target is never read, so links to directories and dangling links copy
/// like any other entry. An existing entry at `to` is replaced.
#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target = fs::read_link(from).map_err(|e| CleanerError::fs("read link", from, e))?;

    if fs::symlink_metadata(to).is_ok() {
        fs::remove_file(to).map_err(|e| CleanerError::fs("remove", to, e))?;
    }
    std::os::unix::fs::symlink(&target, to).map_err(|e| CleanerError::fs("copy link", from, e))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| CleanerError::fs("copy", from, e))
}

/// Prints the shell equivalent of each operation and touches nothing.
#[derive(Debug, Default)]
pub struct DryRunFs {
    commands: Mutex<Vec<String>>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands printed so far, in the order they were issued.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    fn emit(&self, program: &str, paths: &[&Path]) {
        let mut command = program.to_string();
        for path in paths {
            command.push(' ');
            command.push_str(&shell_words::quote(&path.to_string_lossy()));
        }

        println!("{}", command);
        self.commands
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(command);
    }
}

impl FsOps for DryRunFs {
    fn remove_file(&self, path: &Path) -> Result<()> {
        self.emit("rm", &[path]);
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        self.emit("rm -rf", &[path]);
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        self.emit("cp -R", &[from, to]);
        Ok(())
    }

    fn make_tree(&self, path: &Path) -> Result<()> {
        self.emit("mkdir -p", &[path]);
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.emit("mv", &[from, to]);
        Ok(())
    }
}
