//! Implementation of the `pkg-cleaner clean` command.
//!
//! Deletes everything under the root that the patterns do not keep:
//! 1. Load the patterns and resolve the keep-set.
//! 2. Walk the tree once; unwanted directories are queued whole and never
//!    entered.
//! 3. With `--delete-empty`, queue zero-byte kept files as well.
//! 4. Delete the queue concurrently.
//!
//! With `--dry-run` step 4 prints `rm`/`rm -rf` lines instead.

use crate::cli::CleanArgs;
use crate::context::RunContext;
use crate::error::Result;
use crate::executor::{BatchSummary, Executor};
use crate::walk::search_paths_to_delete;
use tracing::info;

/// What a clean run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Paths queued for deletion, in walk order, empty files last.
    pub paths_to_delete: Vec<String>,
    /// Number of kept files that were queued because they are empty.
    pub empty_files: usize,
    pub summary: BatchSummary,
}

/// Execute the `pkg-cleaner clean` command.
pub fn cmd_clean(args: CleanArgs) -> Result<()> {
    let ctx = RunContext::from_args(&args.common)?;
    let report = run_clean(&ctx, args.delete_empty)?;

    if report.paths_to_delete.is_empty() {
        println!("Nothing to delete.");
        return Ok(());
    }

    println!();
    if ctx.dry_run {
        println!(
            "Dry-run mode: {} path(s) would be removed, no changes made.",
            report.paths_to_delete.len()
        );
    } else {
        println!("Clean complete:");
        println!("  Removed: {} path(s)", report.summary.done);
        if report.empty_files > 0 {
            println!("  Empty files among them: {}", report.empty_files);
        }
        if report.summary.skipped > 0 {
            println!("  Already gone: {} path(s)", report.summary.skipped);
        }
    }

    Ok(())
}

/// Resolve, walk and delete for one run.
pub fn run_clean(ctx: &RunContext, delete_empty: bool) -> Result<CleanReport> {
    let keep = ctx.resolve_keep_set()?;
    let mut paths_to_delete = search_paths_to_delete(&ctx.root, &keep)?;
    info!(count = paths_to_delete.len(), "paths queued for deletion");

    let ops = ctx.fs_ops();
    let executor = Executor::new(&ctx.root, ops.as_ref(), ctx.jobs)?;

    let mut empty_files = 0;
    if delete_empty {
        let candidates: Vec<String> = keep.files().iter().cloned().collect();
        let empty = executor.search_empty_files(&candidates)?;
        info!(count = empty.len(), "empty kept files queued for deletion");
        empty_files = empty.len();
        paths_to_delete.extend(empty);
    }

    let summary = executor.delete_paths(&paths_to_delete)?;

    Ok(CleanReport {
        paths_to_delete,
        empty_files,
        summary,
    })
}
