use std::path::Path;
use tempfile::TempDir;

/// Write `content` to `root/path`, creating parent directories.
pub(crate) fn write_file(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

/// A small published-package layout with build output, sources and
/// dependencies side by side.
pub(crate) fn create_package_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(root, "package.json", "{\"name\": \"pkg\"}");
    write_file(root, "README.md", "# pkg\n");
    write_file(root, ".npmignore", "src\n");
    write_file(root, "lib/index.js", "module.exports = 1;\n");
    write_file(root, "lib/index.js.map", "{}");
    write_file(root, "lib/util/strings.js", "exports.s = 1;\n");
    write_file(root, "lib/util/strings.js.map", "{}");
    write_file(root, "lib/util/.gitkeep", "");
    write_file(root, "src/index.ts", "export = 1;\n");
    write_file(root, "node_modules/dep/index.js", "x");
    write_file(root, "node_modules/dep/package.json", "{}");

    temp_dir
}

/// Every file under `root`, root-relative with `/` separators, sorted.
pub(crate) fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| crate::keepset::relative_path(root, entry.path()))
        .collect();
    files.sort();
    files
}
