//! Run context resolution for pkg-cleaner.
//!
//! Turns the command-line options and the optional config file into the
//! settings one run needs. The working directory is kept as an explicit
//! root path that every filesystem call is joined onto; the process working
//! directory is never changed.

use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::{CleanerError, Result};
use crate::fs::{DryRunFs, FsOps, RealFs};
use crate::keepset::{KeepSet, ResolveOptions, normalize_path};
use crate::patterns::PatternSource;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Resolved settings for a single run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the patterns are evaluated against.
    pub root: PathBuf,

    /// Where the pattern list comes from.
    pub source: PatternSource,

    /// Config file values (defaults when no file was given).
    pub config: Config,

    /// Print operations instead of performing them.
    pub dry_run: bool,

    /// Whether wildcards match dotfiles.
    pub include_dotfiles: bool,

    /// Upper bound on concurrent filesystem operations.
    pub jobs: usize,
}

impl RunContext {
    /// Build the run context from command-line options.
    ///
    /// # Returns
    ///
    /// * `Ok(RunContext)` - Working directory exists and config is valid
    /// * `Err(CleanerError::Config)` - Missing working directory, bad config, or bad pattern command
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        let root = match &args.working_dir {
            Some(dir) => require_directory(dir)?,
            None => PathBuf::from("."),
        };

        let config = match &args.config {
            Some(path) => Config::load(root.join(path))?,
            None => Config::default(),
        };

        let source = match (&args.patterns, &args.patterns_cmd) {
            (_, Some(command_line)) => PatternSource::from_command_line(command_line)?,
            (Some(path), None) => PatternSource::from_path(path),
            (None, None) => {
                return Err(CleanerError::Config(
                    "path to file with patterns is not defined".to_string(),
                ));
            }
        };

        let jobs = args.jobs.unwrap_or(config.jobs);
        if jobs == 0 {
            return Err(CleanerError::Config(
                "--jobs must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            root,
            source,
            include_dotfiles: config.include_dotfiles && !args.no_dotfiles,
            dry_run: args.dry_run,
            jobs,
            config,
        })
    }

    /// The filesystem implementation for this run.
    pub fn fs_ops(&self) -> Box<dyn FsOps> {
        if self.dry_run {
            Box::new(DryRunFs::new())
        } else {
            Box::new(RealFs)
        }
    }

    /// Load the patterns and expand them against the root.
    pub fn resolve_keep_set(&self) -> Result<KeepSet> {
        let patterns = self.source.load(&self.root)?;
        if patterns.is_empty() {
            warn!("pattern list is empty; nothing will be kept");
        }
        info!(count = patterns.len(), "loaded patterns");

        let options = ResolveOptions {
            include_dotfiles: self.include_dotfiles,
        };
        let keep = KeepSet::resolve(&patterns, &self.root, &options)?;
        if keep.is_empty() && !patterns.is_empty() {
            warn!("no file under '{}' matches the patterns", self.root.display());
        }
        info!(
            files = keep.files().len(),
            dirs = keep.dirs().len(),
            "resolved files to keep"
        );
        Ok(keep)
    }

    /// Destination directory for `copy` and `move`, resolved against the root.
    pub fn output_dir(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(dir) => self.root.join(dir),
            None => self.root.join(&self.config.output_dir),
        }
    }

    /// Root-relative prefix of `dest` when it lies inside the root.
    pub fn relative_output_dir(&self, dest: &Path) -> Option<String> {
        let relative = match dest.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => {
                let root = self.root.canonicalize().ok()?;
                let dest = absolute_lexical(dest)?;
                dest.strip_prefix(root).ok()?.to_path_buf()
            }
        };

        let relative = normalize_path(&relative.to_string_lossy());
        if relative == "." || relative.starts_with("..") {
            return None;
        }
        Some(relative)
    }
}

fn require_directory(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        return Err(CleanerError::Config(format!(
            "working directory '{}' does not exist",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(CleanerError::Config(format!(
            "working directory '{}' is not a directory",
            dir.display()
        )));
    }
    Ok(dir.to_path_buf())
}

/// Make `path` absolute without touching the filesystem beyond the cwd.
fn absolute_lexical(path: &Path) -> Option<PathBuf> {
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().ok()?
    };

    let mut out = base;
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}
