//! CLI argument parsing for pkg-cleaner.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// pkg-cleaner: prune a package tree down to a whitelist of glob patterns.
///
/// The pattern file lists the files to KEEP, one glob per line. Lines
/// starting with `#` are comments and `!pattern` excludes files matched by
/// earlier patterns.
#[derive(Parser, Debug)]
#[command(name = "pkg-cleaner")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for pkg-cleaner.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Delete every file that does not match the patterns.
    ///
    /// Directories holding no kept file are removed as a whole.
    Clean(CleanArgs),

    /// Copy every file that matches the patterns to an output directory.
    Copy(CopyArgs),

    /// Move every file that matches the patterns to an output directory.
    Move(MoveArgs),
}

impl Command {
    /// Options shared by every command.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Clean(args) => &args.common,
            Command::Copy(args) => &args.common,
            Command::Move(args) => &args.common,
        }
    }
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the file with patterns (`.json` files hold an array of globs).
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "patterns_cmd",
        conflicts_with = "patterns_cmd"
    )]
    pub patterns: Option<PathBuf>,

    /// Command whose stdout lists the patterns, one per line.
    #[arg(long, value_name = "COMMAND")]
    pub patterns_cmd: Option<String>,

    /// Print the filesystem operations instead of running them.
    #[arg(short, long)]
    pub dry_run: bool,

    /// Directory to operate in (defaults to the current directory).
    #[arg(short, long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// YAML config file with defaults for these options.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not let wildcards match names starting with `.`.
    #[arg(long)]
    pub no_dotfiles: bool,

    /// Maximum number of concurrent filesystem operations.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Also delete kept files that are zero bytes long.
    #[arg(long)]
    pub delete_empty: bool,
}

/// Arguments for the `copy` command.
#[derive(Args, Debug)]
pub struct CopyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Destination directory (default: `./out`).
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip zero-byte files.
    #[arg(long)]
    pub not_copy_empty: bool,
}

/// Arguments for the `move` command.
#[derive(Args, Debug)]
pub struct MoveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Destination directory (default: `./out`).
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Delete zero-byte files instead of moving them.
    #[arg(long)]
    pub delete_empty: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_clean() {
        let cli = Cli::try_parse_from(["pkg-cleaner", "clean", "-p", ".keep"]).unwrap();
        if let Command::Clean(args) = cli.command {
            assert_eq!(args.common.patterns, Some(PathBuf::from(".keep")));
            assert!(!args.common.dry_run);
            assert!(!args.delete_empty);
            assert_eq!(args.common.working_dir, None);
        } else {
            panic!("Expected Clean command");
        }
    }

    #[test]
    fn parse_clean_all_flags() {
        let cli = Cli::try_parse_from([
            "pkg-cleaner",
            "clean",
            "--patterns",
            "keep.txt",
            "--dry-run",
            "--working-dir",
            "build",
            "--delete-empty",
            "--no-dotfiles",
            "-j",
            "3",
            "-vv",
        ])
        .unwrap();
        if let Command::Clean(args) = cli.command {
            assert!(args.common.dry_run);
            assert!(args.delete_empty);
            assert!(args.common.no_dotfiles);
            assert_eq!(args.common.working_dir, Some(PathBuf::from("build")));
            assert_eq!(args.common.jobs, Some(3));
            assert_eq!(args.common.verbose, 2);
        } else {
            panic!("Expected Clean command");
        }
    }

    #[test]
    fn patterns_are_required() {
        assert!(Cli::try_parse_from(["pkg-cleaner", "clean"]).is_err());
    }

    #[test]
    fn patterns_cmd_replaces_patterns() {
        let cli =
            Cli::try_parse_from(["pkg-cleaner", "clean", "--patterns-cmd", "node keep.js"]).unwrap();
        assert_eq!(
            cli.command.common().patterns_cmd.as_deref(),
            Some("node keep.js")
        );
        assert!(cli.command.common().patterns.is_none());
    }

    #[test]
    fn patterns_and_patterns_cmd_conflict() {
        let result = Cli::try_parse_from([
            "pkg-cleaner",
            "clean",
            "-p",
            "keep.txt",
            "--patterns-cmd",
            "node keep.js",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_copy() {
        let cli = Cli::try_parse_from([
            "pkg-cleaner",
            "copy",
            "-p",
            "keep.txt",
            "-o",
            "dist",
            "--not-copy-empty",
        ])
        .unwrap();
        if let Command::Copy(args) = cli.command {
            assert_eq!(args.output_dir, Some(PathBuf::from("dist")));
            assert!(args.not_copy_empty);
        } else {
            panic!("Expected Copy command");
        }
    }

    #[test]
    fn parse_copy_defaults() {
        let cli = Cli::try_parse_from(["pkg-cleaner", "copy", "-p", "keep.txt"]).unwrap();
        if let Command::Copy(args) = cli.command {
            assert_eq!(args.output_dir, None);
            assert!(!args.not_copy_empty);
        } else {
            panic!("Expected Copy command");
        }
    }

    #[test]
    fn parse_move() {
        let cli = Cli::try_parse_from([
            "pkg-cleaner",
            "move",
            "-p",
            "keep.txt",
            "--delete-empty",
            "-d",
        ])
        .unwrap();
        if let Command::Move(args) = cli.command {
            assert!(args.delete_empty);
            assert!(args.common.dry_run);
        } else {
            panic!("Expected Move command");
        }
    }

    #[test]
    fn delete_empty_is_not_a_copy_flag() {
        let result =
            Cli::try_parse_from(["pkg-cleaner", "copy", "-p", "keep.txt", "--delete-empty"]);
        assert!(result.is_err());
    }
}
