//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a pkg-cleaner run.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether wildcard segments match entries whose name begins with `.`.
    #[serde(default = "default_true")]
    pub include_dotfiles: bool,

    /// Upper bound on concurrent filesystem operations.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Destination for `copy` and `move` when `--output-dir` is not given.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether `copy` includes zero-byte files.
    #[serde(default = "default_true")]
    pub copy_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_dotfiles: default_true(),
            jobs: default_jobs(),
            output_dir: default_output_dir(),
            copy_empty: default_true(),
        }
    }
}
