//! Small filesystem helpers shared by the exclude and include resolvers.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ignore::{DirEntry, WalkBuilder};

/// Directory name that is never listed, walked or reported.
pub const VCS_DIR: &str = ".git";

/// Lists the direct children of `dir`, sorted by file name, skipping `.git`.
///
/// No ignore filtering is applied here; callers decide what to drop.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut out = Vec::new();
    for res in WalkBuilder::new(dir)
        .standard_filters(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
    {
        let entry = res.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.depth() == 0 || entry.file_name() == VCS_DIR {
            continue;
        }
        out.push(entry);
    }
    Ok(out)
}

/// Walks every entry below `root` (hidden files included, `.git` pruned) in
/// file-name order and returns the regular files.
pub fn walk_files(root: &Path) -> Result<Vec<DirEntry>> {
    let mut out = Vec::new();
    for res in WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|e| e.file_name() != VCS_DIR)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
    {
        let entry = res.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_some_and(|ft| !ft.is_dir()) {
            out.push(entry);
        }
    }
    Ok(out)
}

/// Walks `root` honouring git ignore sources (nested `.gitignore` files,
/// `.git/info/exclude` and the global excludes file) and returns the paths
/// of the files that survive, relative to `root`.
///
/// Callers decide whether `root` is a repository; the walker does not
/// look for one.
pub fn walk_unignored_files(root: &Path) -> Result<HashSet<PathBuf>> {
    let mut out = HashSet::new();
    for res in WalkBuilder::new(root)
        .standard_filters(false)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(true)
        .require_git(false)
        .filter_entry(|e| e.file_name() != VCS_DIR)
        .build()
    {
        let entry = res.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_some_and(|ft| !ft.is_dir()) {
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            out.insert(rel.to_path_buf());
        }
    }
    Ok(out)
}

/// Whether `rel` and every directory between it and `root` are readable by
/// all users. `root` itself is not checked.
pub fn readable_below(root: &Path, rel: &Path) -> bool {
    rel.ancestors()
        .filter(|a| !a.as_os_str().is_empty())
        .all(|a| readable_by_all(&root.join(a)))
}

/// Whether `path` can be read by every user.
///
/// Directories additionally need the search bit. Paths whose metadata cannot
/// be read (dangling symlinks, permission errors) count as unreadable.
#[cfg(unix)]
pub fn readable_by_all(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(md) => {
            let mode = md.permissions().mode();
            let readable = mode & 0o004 != 0;
            if md.is_dir() {
                readable && mode & 0o001 != 0
            } else {
                readable
            }
        }
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn readable_by_all(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn list_dir_is_sorted_and_skips_git() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("b.rb"), "b").unwrap();
        fs::write(dir.path().join("a.rb"), "a").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();

        let names: Vec<String> = list_dir(dir.path())
            .unwrap()
            .iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.rb", "b.rb", "lib"]);
    }

    #[test]
    fn walk_files_descends_and_prunes_git() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/x.rb"), "x").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();

        let files: Vec<_> = walk_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.path().strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            files,
            vec![
                std::path::PathBuf::from(".hidden"),
                std::path::PathBuf::from("sub/x.rb")
            ]
        );
    }

    #[test]
    fn unignored_walk_reads_nested_gitignore_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/.gitignore"), "*.tmp\n").unwrap();
        fs::write(dir.path().join("sub/a.tmp"), "x").unwrap();
        fs::write(dir.path().join("sub/b.rb"), "x").unwrap();

        let kept = walk_unignored_files(dir.path()).unwrap();
        assert!(kept.contains(Path::new("sub/b.rb")));
        assert!(kept.contains(Path::new("sub/.gitignore")));
        assert!(!kept.contains(Path::new("sub/a.tmp")));
    }

    #[cfg(unix)]
    #[test]
    fn private_parent_makes_children_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("priv")).unwrap();
        fs::write(dir.path().join("priv/a.rb"), "a").unwrap();
        fs::set_permissions(dir.path().join("priv/a.rb"), fs::Permissions::from_mode(0o644))
            .unwrap();
        fs::set_permissions(dir.path().join("priv"), fs::Permissions::from_mode(0o700)).unwrap();

        assert!(readable_by_all(&dir.path().join("priv/a.rb")));
        assert!(!readable_below(dir.path(), Path::new("priv/a.rb")));
    }

    #[cfg(unix)]
    #[test]
    fn owner_only_files_are_not_readable_by_all() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let secret = dir.path().join("secret");
        fs::write(&secret, "s").unwrap();
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o600)).unwrap();
        let public = dir.path().join("public");
        fs::write(&public, "p").unwrap();
        fs::set_permissions(&public, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!readable_by_all(&secret));
        assert!(readable_by_all(&public));
        assert!(!readable_by_all(&dir.path().join("missing")));
    }
}
