//! End-to-end tests for the clean, copy and move pipelines.

use super::clean::run_clean;
use super::copy::{TransferMode, run_transfer};
use crate::cli::CommonArgs;
use crate::context::RunContext;
use crate::error::CleanerError;
use crate::test_support::{create_package_tree, list_files, write_file};
use clap::Parser;
use std::path::Path;

#[derive(Parser)]
struct Wrapper {
    #[command(flatten)]
    common: CommonArgs,
}

fn context(root: &Path, extra: &[&str]) -> RunContext {
    let mut argv = vec!["pkg-cleaner", "-w", root.to_str().unwrap()];
    argv.extend_from_slice(extra);
    let common = Wrapper::try_parse_from(argv).unwrap().common;
    RunContext::from_args(&common).unwrap()
}

const PUBLISH_PATTERNS: &str = "\
# published files
package.json
README.md
lib/**
!lib/**/*.map
";

// =========================================================================
// clean
// =========================================================================

#[test]
fn test_clean_keeps_only_matching_files() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", PUBLISH_PATTERNS);

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_clean(&ctx, false).unwrap();

    assert_eq!(
        report.paths_to_delete,
        vec![
            ".keep",
            ".npmignore",
            "lib/index.js.map",
            "lib/util/strings.js.map",
            "node_modules",
            "src",
        ]
    );
    assert_eq!(
        list_files(root),
        vec![
            "README.md",
            "lib/index.js",
            "lib/util/.gitkeep",
            "lib/util/strings.js",
            "package.json",
        ]
    );
}

#[test]
fn test_clean_delete_empty_removes_empty_kept_files() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/**\n!lib/**/*.map\n.keep\n");

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_clean(&ctx, true).unwrap();

    assert_eq!(report.empty_files, 1);
    assert_eq!(report.paths_to_delete.last().unwrap(), "lib/util/.gitkeep");
    assert_eq!(
        list_files(root),
        vec![".keep", "lib/index.js", "lib/util/strings.js"]
    );
}

#[test]
fn test_clean_dry_run_changes_nothing() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", PUBLISH_PATTERNS);
    let before = list_files(root);

    let ctx = context(root, &["-p", ".keep", "--dry-run"]);
    let report = run_clean(&ctx, true).unwrap();

    assert!(!report.paths_to_delete.is_empty());
    assert_eq!(list_files(root), before);
}

#[test]
fn test_clean_without_dotfiles() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "*\nlib/**\n");

    let ctx = context(root, &["-p", ".keep", "--no-dotfiles"]);
    run_clean(&ctx, false).unwrap();

    let files = list_files(root);
    assert!(!files.contains(&".npmignore".to_string()));
    assert!(!files.contains(&"lib/util/.gitkeep".to_string()));
    assert!(files.contains(&"lib/index.js".to_string()));
    assert!(files.contains(&"package.json".to_string()));
}

#[test]
fn test_clean_with_json_patterns() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, "keep.json", r#"["package.json", "keep.json"]"#);

    let ctx = context(root, &["-p", "keep.json"]);
    run_clean(&ctx, false).unwrap();

    assert_eq!(list_files(root), vec!["keep.json", "package.json"]);
}

#[test]
fn test_clean_missing_pattern_file_fails_before_mutation() {
    let temp = create_package_tree();
    let root = temp.path();
    let before = list_files(root);

    let ctx = context(root, &["-p", "missing.txt"]);
    let err = run_clean(&ctx, false).unwrap_err();

    assert!(matches!(err, CleanerError::Config(_)));
    assert_eq!(list_files(root), before);
}

#[test]
fn test_clean_invalid_pattern_fails_before_mutation() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/[a-\n");
    let before = list_files(root);

    let ctx = context(root, &["-p", ".keep"]);
    let err = run_clean(&ctx, false).unwrap_err();

    assert_eq!(err.exit_code(), crate::exit_codes::PATTERN_ERROR);
    assert_eq!(list_files(root), before);
}

// =========================================================================
// copy / move
// =========================================================================

#[test]
fn test_copy_includes_empty_files_by_default() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/**\n!lib/**/*.map\n");

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_transfer(&ctx, TransferMode::Copy, None, true).unwrap();

    assert_eq!(report.summary.done, 3);
    assert_eq!(
        list_files(&root.join("out")),
        vec!["lib/index.js", "lib/util/.gitkeep", "lib/util/strings.js"]
    );
    // Source is untouched.
    assert!(root.join("lib/index.js.map").exists());
    assert!(root.join("lib/index.js").exists());
}

#[test]
fn test_copy_can_skip_empty_files() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/**\n!lib/**/*.map\n");

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_transfer(&ctx, TransferMode::Copy, Some(Path::new("dist")), false).unwrap();

    assert_eq!(report.empty_files, vec!["lib/util/.gitkeep"]);
    assert_eq!(
        list_files(&root.join("dist")),
        vec!["lib/index.js", "lib/util/strings.js"]
    );
}

#[test]
fn test_repeated_copy_does_not_copy_output_into_itself() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "**/*.js\n!node_modules/**\n");

    let ctx = context(root, &["-p", ".keep"]);
    run_transfer(&ctx, TransferMode::Copy, None, true).unwrap();
    let report = run_transfer(&ctx, TransferMode::Copy, None, true).unwrap();

    assert_eq!(report.files, vec!["lib/index.js", "lib/util/strings.js"]);
    assert!(!root.join("out/out").exists());
}

#[test]
fn test_move_with_delete_empty() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/**\n!lib/**/*.map\n");

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_transfer(&ctx, TransferMode::Move, None, false).unwrap();

    assert_eq!(report.summary.done, 2);
    assert_eq!(
        list_files(&root.join("out")),
        vec!["lib/index.js", "lib/util/strings.js"]
    );
    assert!(!root.join("lib/index.js").exists());
    assert!(!root.join("lib/util/.gitkeep").exists());
    assert!(root.join("lib/index.js.map").exists());
}

#[test]
fn test_dry_run_copy_changes_nothing() {
    let temp = create_package_tree();
    let root = temp.path();
    write_file(root, ".keep", "lib/**\n");
    let before = list_files(root);

    let ctx = context(root, &["-p", ".keep", "-d"]);
    let report = run_transfer(&ctx, TransferMode::Move, None, false).unwrap();

    assert!(!report.files.is_empty());
    assert!(!root.join("out").exists());
    assert_eq!(list_files(root), before);
}

#[cfg(unix)]
fn link_package_tree() -> tempfile::TempDir {
    let temp = create_package_tree();
    let root = temp.path();
    std::os::unix::fs::symlink("util", root.join("lib/util-link")).unwrap();
    std::os::unix::fs::symlink("gone.js", root.join("lib/dangling.js")).unwrap();
    write_file(root, ".keep", "lib/**\n!lib/**/*.map\n");
    temp
}

#[cfg(unix)]
#[test]
fn test_copy_recreates_kept_symlinks() {
    let temp = link_package_tree();
    let root = temp.path();

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_transfer(&ctx, TransferMode::Copy, None, true).unwrap();

    assert_eq!(report.summary.done, 5);
    let out = root.join("out/lib");
    assert_eq!(std::fs::read_link(out.join("util-link")).unwrap(), Path::new("util"));
    assert_eq!(
        std::fs::read_link(out.join("dangling.js")).unwrap(),
        Path::new("gone.js")
    );
    assert!(root.join("lib/util-link").exists());

    // A second run replaces the links it created the first time.
    run_transfer(&ctx, TransferMode::Copy, None, true).unwrap();
    assert_eq!(std::fs::read_link(out.join("util-link")).unwrap(), Path::new("util"));
}

#[cfg(unix)]
#[test]
fn test_copy_skips_dangling_symlink_as_empty() {
    let temp = link_package_tree();
    let root = temp.path();

    let ctx = context(root, &["-p", ".keep"]);
    let report = run_transfer(&ctx, TransferMode::Copy, None, false).unwrap();

    assert_eq!(report.empty_files, vec!["lib/dangling.js", "lib/util/.gitkeep"]);
    assert!(std::fs::symlink_metadata(root.join("out/lib/dangling.js")).is_err());
    assert_eq!(std::fs::read_link(root.join("out/lib/util-link")).unwrap(), Path::new("util"));
}
