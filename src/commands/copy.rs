//! Implementation of the `pkg-cleaner copy` and `pkg-cleaner move` commands.
//!
//! Both resolve the keep-set and transfer exactly those files into the
//! output directory, keeping their layout. Nothing outside the keep-set is
//! touched. Files that already live inside the output directory are left
//! out so a repeated run never copies its own output.
//!
//! Empty files:
//! - `copy` includes them unless `--not-copy-empty` (or `copy_empty: false`).
//! - `move` moves them unless `--delete-empty`, which deletes them from the
//!   source instead.

use crate::cli::{CopyArgs, MoveArgs};
use crate::context::RunContext;
use crate::error::Result;
use crate::executor::{BatchSummary, Executor};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How kept files reach the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    fn verb(self) -> &'static str {
        match self {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        }
    }
}

/// What a copy or move run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub destination: PathBuf,
    /// Root-relative files handed to the transfer, sorted.
    pub files: Vec<String>,
    /// Empty files left out of the transfer.
    pub empty_files: Vec<String>,
    pub summary: BatchSummary,
}

/// Execute the `pkg-cleaner copy` command.
pub fn cmd_copy(args: CopyArgs) -> Result<()> {
    let ctx = RunContext::from_args(&args.common)?;
    let include_empty = ctx.config.copy_empty && !args.not_copy_empty;
    let report = run_transfer(
        &ctx,
        TransferMode::Copy,
        args.output_dir.as_deref(),
        include_empty,
    )?;
    print_report(&ctx, TransferMode::Copy, &report);
    Ok(())
}

/// Execute the `pkg-cleaner move` command.
pub fn cmd_move(args: MoveArgs) -> Result<()> {
    let ctx = RunContext::from_args(&args.common)?;
    let report = run_transfer(
        &ctx,
        TransferMode::Move,
        args.output_dir.as_deref(),
        !args.delete_empty,
    )?;
    print_report(&ctx, TransferMode::Move, &report);
    Ok(())
}

/// Resolve the keep-set and copy or move it into the output directory.
///
/// When `include_empty` is false, zero-byte files are skipped by `copy` and
/// deleted from the source by `move`.
pub fn run_transfer(
    ctx: &RunContext,
    mode: TransferMode,
    output_dir: Option<&Path>,
    include_empty: bool,
) -> Result<TransferReport> {
    let keep = ctx.resolve_keep_set()?;
    let destination = ctx.output_dir(output_dir);

    let mut files: Vec<String> = keep.files().iter().cloned().collect();
    if let Some(prefix) = ctx.relative_output_dir(&destination) {
        let inside = format!("{}/", prefix);
        files.retain(|f| !f.starts_with(&inside));
        debug!(output = %prefix, "excluded files inside the output directory");
    }

    let ops = ctx.fs_ops();
    let executor = Executor::new(&ctx.root, ops.as_ref(), ctx.jobs)?;

    let mut empty_files = Vec::new();
    if !include_empty {
        empty_files = executor.search_empty_files(&files)?;
        let empty: HashSet<&str> = empty_files.iter().map(String::as_str).collect();
        files.retain(|f| !empty.contains(f.as_str()));
        info!(count = empty_files.len(), "empty files left out");
    }

    let summary = match mode {
        TransferMode::Copy => executor.copy_files(&files, &destination)?,
        TransferMode::Move => {
            let summary = executor.move_files(&files, &destination)?;
            executor.delete_paths(&empty_files)?;
            summary
        }
    };

    Ok(TransferReport {
        destination,
        files,
        empty_files,
        summary,
    })
}

fn print_report(ctx: &RunContext, mode: TransferMode, report: &TransferReport) {
    println!();
    if ctx.dry_run {
        println!(
            "Dry-run mode: {} file(s) would go to {}, no changes made.",
            report.files.len(),
            report.destination.display()
        );
        return;
    }

    println!(
        "{} {} file(s) to {}",
        mode.verb(),
        report.summary.done,
        report.destination.display()
    );
    if !report.empty_files.is_empty() {
        let action = match mode {
            TransferMode::Copy => "Skipped",
            TransferMode::Move => "Deleted",
        };
        println!("{} {} empty file(s)", action, report.empty_files.len());
    }
}
