//! Keep-set resolution.
//!
//! Expands an ordered pattern list against the tree under a root directory
//! into the set of files to keep, and derives the set of directories that
//! must survive because a kept file lives somewhere below them.
//!
//! All paths in a [`KeepSet`] are root-relative, normalized and use `/` as
//! the separator, so membership checks do not depend on how a walk spells
//! its paths.

mod matcher;

pub use matcher::PatternMatcher;

use crate::error::Result;
use crate::fs::{is_vanished, walk_error};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Options for pattern expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Whether wildcards match names starting with `.`.
    pub include_dotfiles: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_dotfiles: true,
        }
    }
}

/// Files to keep and the closure of their ancestor directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepSet {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
}

impl KeepSet {
    /// Build a keep-set from already-resolved file paths.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let files: BTreeSet<String> = files
            .into_iter()
            .map(|f| normalize_path(f.as_ref()))
            .collect();
        let dirs = dirs_to_keep(&files).into_iter().collect();

        Self { files, dirs }
    }

    /// Expand `patterns` against the files under `root`.
    ///
    /// Directories are never kept by a pattern directly; they survive only as
    /// ancestors of kept files. Symlinks are not followed and count as files.
    pub fn resolve(patterns: &[String], root: &Path, options: &ResolveOptions) -> Result<Self> {
        let matcher = PatternMatcher::new(patterns, options.include_dotfiles)?;
        if !patterns.is_empty() && !matcher.has_positive_patterns() {
            warn!("every pattern is a negation; nothing will be kept");
        }

        let mut kept = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if is_vanished(&err) => {
                    warn!("entry vanished during pattern expansion: {}", err);
                    continue;
                }
                Err(err) => return Err(walk_error(root, err)),
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = relative_path(root, entry.path());
            if matcher.is_kept(&path) {
                kept.push(path);
            }
        }

        let keep = Self::from_files(kept);
        debug!(
            files = keep.files.len(),
            dirs = keep.dirs.len(),
            "resolved keep-set"
        );
        Ok(keep)
    }

    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    pub fn dirs(&self) -> &BTreeSet<String> {
        &self.dirs
    }

    pub fn keeps_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    pub fn keeps_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Every proper ancestor directory of every file, sorted and duplicate-free.
///
/// `a/b/c/d/1.txt` contributes `a`, `a/b`, `a/b/c` and `a/b/c/d`. A file at
/// the root contributes nothing.
pub fn dirs_to_keep<I, S>(files: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dirs = BTreeSet::new();

    for file in files {
        let file = normalize_path(file.as_ref());
        let Some((parent, _)) = file.rsplit_once('/') else {
            continue;
        };

        let mut prefix = String::with_capacity(parent.len());
        for segment in parent.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            dirs.insert(prefix.clone());
        }
    }

    dirs.into_iter().collect()
}

/// Lexically normalize a relative path.
///
/// Separators become `/`, empty and `.` segments are dropped, and `..`
/// removes the preceding segment. Leading `..` segments are kept. An empty
/// result is `.`.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Express `path` relative to `root` in normalized form; `root` itself is `.`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    normalize_path(&parts.join("/"))
}
