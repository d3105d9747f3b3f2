//! Configuration model for pkg-cleaner.
//!
//! This module defines the Config struct that represents the optional YAML
//! file passed with `--config`. It supports forward-compatible YAML parsing
//! (unknown fields are ignored), sensible defaults for optional fields, and
//! validation of config values. Command-line flags override whatever the
//! file sets.

mod model;
mod operations;
pub mod types;


pub use model::Config;
