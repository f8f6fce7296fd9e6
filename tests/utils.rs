#![allow(dead_code)]

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Writes `files` (relative path, content) under `root`, creating parents.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, content).unwrap();
    }
}

/// Makes `path` executable.
#[cfg(unix)]
pub fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn relative_files(dir: &Path) -> std::collections::BTreeSet<std::path::PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
pub fn print_dir_diff(actual: &Path, expected: &Path) {
    let actual_files = relative_files(actual);
    let expected_files = relative_files(expected);

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {actual:?}");
    println!("Expected output: {expected:?}");

    for file in actual_files.difference(&expected_files) {
        println!("  + {file:?}");
    }
    for file in expected_files.difference(&actual_files) {
        println!("  - {file:?}");
    }
    for file in actual_files.intersection(&expected_files) {
        let left = fs::read_to_string(actual.join(file)).unwrap_or_default();
        let right = fs::read_to_string(expected.join(file)).unwrap_or_default();
        if left != right {
            println!("\n  File: {file:?}\n  --- Actual content:\n{left}\n  --- Expected content:\n{right}");
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Asserts that `actual` holds exactly `expected` (relative path, content).
pub fn assert_dir_matches(actual: &Path, expected: &[(&str, &str)]) {
    let expected_dir = tempfile::tempdir().unwrap();
    write_files(expected_dir.path(), expected);

    if dir_diff::is_different(actual, expected_dir.path()).unwrap() {
        print_dir_diff(actual, expected_dir.path());
        panic!("Directories differ. See above for details.");
    }
}
