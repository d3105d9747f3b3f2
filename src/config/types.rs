//! Default value functions used by the Config struct.

/// Default number of worker threads for stat/delete/copy batches.
pub const DEFAULT_JOBS: usize = 8;

/// Default destination directory for `copy` and `move`.
pub const DEFAULT_OUTPUT_DIR: &str = "./out";

pub fn default_true() -> bool {
    true
}

pub fn default_jobs() -> usize {
    DEFAULT_JOBS
}

pub fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}
