//! File move helper.
//!
//! `move` relocates kept files into the output directory. On POSIX
//! filesystems this is normally a `rename(2)`, but the output directory may
//! live on another mount, which surfaces `EXDEV` ("Invalid cross-device
//! link"). For those cases we fall back to copy + delete.

use crate::error::{CleanerError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Move a single file from `source` to `destination`.
///
/// - Creates missing parent directories of `destination`.
/// - Tries `rename()` first.
/// - Falls back to copy to `destination` + delete of `source` on EXDEV.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| CleanerError::fs("create directory", parent, e))?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => move_file_cross_device(source, destination),
        Err(e) => Err(CleanerError::fs("move", source, e)),
    }
}

fn move_file_cross_device(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).map_err(|e| CleanerError::fs("copy", source, e))?;
    fs::remove_file(source).map_err(|e| CleanerError::fs("remove", source, e))?;
    Ok(())
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
