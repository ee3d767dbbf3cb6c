//! Recursive enumeration of the files in a distribution tree.

use crate::Result;
use std::path::Path;
use walkdir::WalkDir;

/// List every regular file under `root` as a path relative to `root`.
///
/// The result is sorted so that callers emit entries in a stable order
/// regardless of filesystem iteration order. Two listings of an unchanged
/// tree are equal. A missing or unreadable directory is an error carrying
/// the offending path.
pub fn collect_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .to_string();
        files.push(relative);
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_collects_nested_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Release"));
        touch(&tmp.path().join("universe/dists-amd64/app.deb"));
        touch(&tmp.path().join("universe/dists-amd64/Packages.gz"));
        touch(&tmp.path().join("universe/dists-i386/app.deb"));

        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(
            files,
            vec![
                "Release",
                "universe/dists-amd64/Packages.gz",
                "universe/dists-amd64/app.deb",
                "universe/dists-i386/app.deb",
            ]
        );
    }

    #[test]
    fn test_directories_are_not_listed() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("universe/dists-amd64")).unwrap();

        let files = collect_files(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_repeated_listing_is_stable() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/one"));
        touch(&tmp.path().join("b/two"));
        touch(&tmp.path().join("three"));

        let first = collect_files(tmp.path()).unwrap();
        let second = collect_files(tmp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        assert!(collect_files(&missing).is_err());
    }
}
