#![cfg(feature = "git")]

use anyhow::{Context, Result};
use git2::Repository;
use log::info;
use std::path::Path;

/// Opens the repository whose working tree is exactly `root`.
///
/// Returns `None` for plain directories and for subdirectories of a
/// repository; only a source directory that is itself a working tree
/// contributes repository ignore rules.
pub fn open(root: &Path) -> Option<Repository> {
    let repo = Repository::open(root).ok()?;
    let workdir = repo.workdir()?.canonicalize().ok()?;
    if workdir == root.canonicalize().ok()? {
        info!("Using git ignore rules from {:?}", root);
        Some(repo)
    } else {
        None
    }
}

/// Checks a path (relative to the working tree) against every ignore source
/// git knows about: nested `.gitignore` files, `info/exclude` and the
/// user's global excludes file.
pub fn is_ignored(repo: &Repository, relative_path: &Path) -> Result<bool> {
    repo.is_path_ignored(relative_path)
        .with_context(|| format!("Failed to check ignore status of {:?}", relative_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn nested_gitignore_is_respected() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/.gitignore"), "*.tmp\n").unwrap();
        fs::write(dir.path().join("sub/a.tmp"), "x").unwrap();

        assert!(is_ignored(&repo, Path::new("sub/a.tmp")).unwrap());
        assert!(!is_ignored(&repo, Path::new("sub/.gitignore")).unwrap());
    }

    #[test]
    fn subdirectory_of_a_repository_is_not_opened() {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(open(dir.path()).is_some());
        assert!(open(&dir.path().join("sub")).is_none());
    }
}
