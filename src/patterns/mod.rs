//! Pattern list parsing and pattern sources.
//!
//! A pattern list is an ordered sequence of glob patterns describing which
//! files to keep. A leading `!` negates a pattern. Order is significant and
//! is never changed here.
//!
//! Patterns can come from three places:
//! - a plain text file, one glob per line (`#` comments and blank lines ignored)
//! - a `.json` file holding an array of strings
//! - an external command whose stdout is read like a text file

use crate::error::{CleanerError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Parse raw pattern text into an ordered list of patterns.
///
/// Each line is trimmed. Blank lines and lines whose trimmed form starts with
/// `#` are dropped. A `#` elsewhere in a line is part of the pattern. No glob
/// validation happens here.
///
/// # Examples
///
/// ```ignore
/// let patterns = parse_patterns("  lib/**\n\n# docs\n!lib/*.map\n");
/// assert_eq!(patterns, vec!["lib/**", "!lib/*.map"]);
/// ```
pub fn parse_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Where the pattern list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// Plain text file, one glob per line.
    Text(PathBuf),
    /// JSON file containing an array of glob strings.
    Json(PathBuf),
    /// External program; its stdout is parsed like a text file.
    Command(Vec<String>),
}

impl PatternSource {
    /// Pick the source variant for a pattern file from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            PatternSource::Json(path)
        } else {
            PatternSource::Text(path)
        }
    }

    /// Build a command source from a shell-style command line.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let argv = shell_words::split(command_line).map_err(|e| {
            CleanerError::Config(format!(
                "failed to parse pattern command '{}': {}",
                command_line, e
            ))
        })?;

        if argv.is_empty() {
            return Err(CleanerError::Config(
                "pattern command must not be empty".to_string(),
            ));
        }

        Ok(PatternSource::Command(argv))
    }

    /// Produce the ordered pattern list.
    ///
    /// Relative file paths and the command's working directory are both
    /// resolved against `root`.
    pub fn load(&self, root: &Path) -> Result<Vec<String>> {
        match self {
            PatternSource::Text(path) => {
                let content = read_pattern_file(&root.join(path))?;
                Ok(parse_patterns(&content))
            }
            PatternSource::Json(path) => {
                let path = root.join(path);
                let content = read_pattern_file(&path)?;
                parse_json_patterns(&content).map_err(|e| {
                    CleanerError::Config(format!(
                        "failed to parse pattern file '{}': {}",
                        path.display(),
                        e
                    ))
                })
            }
            PatternSource::Command(argv) => run_pattern_command(argv, root),
        }
    }
}

fn read_pattern_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CleanerError::Config(format!(
            "file with patterns '{}' does not exist",
            path.display()
        )));
    }

    std::fs::read_to_string(path).map_err(|e| {
        CleanerError::Config(format!(
            "failed to read pattern file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Parse a JSON array of patterns, trimming entries and dropping empty ones.
fn parse_json_patterns(content: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
    let raw: Vec<String> = serde_json::from_str(content)?;
    Ok(raw
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect())
}

fn run_pattern_command(argv: &[String], root: &Path) -> Result<Vec<String>> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| CleanerError::Config("pattern command must not be empty".to_string()))?;

    debug!(command = %argv.join(" "), "running pattern command");

    let output = Command::new(program)
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| {
            CleanerError::Config(format!(
                "failed to run pattern command '{}': {}",
                argv.join(" "),
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CleanerError::Config(format!(
            "pattern command '{}' failed (exit code {:?}): {}",
            argv.join(" "),
            output.status.code(),
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| {
        CleanerError::Config(format!(
            "pattern command '{}' produced non UTF-8 output: {}",
            argv.join(" "),
            e
        ))
    })?;

    Ok(parse_patterns(&stdout))
}
