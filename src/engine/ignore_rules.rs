//! This module contains the logic for computing the exclude list of an engine
//! from version-control ignore rules, configured patterns and file permissions.
#[cfg(feature = "colors")]
use colored::*;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, warn};
use std::path::Path;

use anyhow::{Context, Result};

use crate::common::{
    fs::{VCS_DIR, readable_below, walk_files, walk_unignored_files},
    path,
};

/// Whether `root` is itself the top of a git working tree.
pub fn is_repository(root: &Path) -> bool {
    #[cfg(feature = "git")]
    if crate::engine::git::open(root).is_some() {
        return true;
    }
    root.join(VCS_DIR).exists()
}

/// Builds the matcher for the configured `patterns` (gitignore syntax,
/// relative to `root`). Returns `None` when there are none.
///
/// Repository ignore files are not read here; [`exclude_paths`] gets those
/// from the ignore-aware walk.
pub fn build_matcher(root: &Path, patterns: &[String]) -> Result<Option<Gitignore>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .with_context(|| format!("Invalid exclude pattern {pattern:?}"))?;
    }
    Ok(Some(builder.build().context("Failed to build ignore rules")?))
}

/// Determines whether a file (relative to the matcher root) is ignored by
/// the matcher, either directly or through one of its parent directories.
pub fn should_exclude_file(relative_path: &Path, matcher: &Gitignore) -> bool {
    let path_str = path::to_fwd_slash(relative_path);
    let excluded = matcher
        .matched_path_or_any_parents(relative_path, false)
        .is_ignore();

    #[cfg(feature = "colors")]
    debug!(
        "Checking path: {:?}, {}: {}",
        path_str,
        "excluded".bold().red(),
        excluded
    );
    #[cfg(not(feature = "colors"))]
    debug!("Checking path: {:?}, excluded: {}", path_str, excluded);
    excluded
}

/// Computes the exclude list for one engine.
///
/// Every file under `root` that is ignored (by repository rules or by
/// `patterns`) or that is not readable by everyone, directly or through a
/// parent directory, is listed as a forward-slash path relative to `root`,
/// in walk order.
pub fn exclude_paths(root: &Path, patterns: &[String]) -> Result<Vec<String>> {
    let matcher = build_matcher(root, patterns)?;
    let kept = if is_repository(root) {
        Some(walk_unignored_files(root)?)
    } else {
        None
    };
    #[cfg(feature = "git")]
    let repo = crate::engine::git::open(root);

    let mut out = Vec::new();
    for entry in walk_files(root)? {
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());

        let ignored = kept.as_ref().is_some_and(|k| !k.contains(rel))
            || matcher
                .as_ref()
                .is_some_and(|m| should_exclude_file(rel, m));
        #[cfg(feature = "git")]
        let ignored = ignored
            || match &repo {
                Some(repo) => crate::engine::git::is_ignored(repo, rel)?,
                None => false,
            };

        if ignored {
            out.push(path::to_fwd_slash(rel));
        } else if !readable_below(root, rel) {
            warn!("Excluding {} (not readable by all users)", rel.display());
            out.push(path::to_fwd_slash(rel));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    #[test]
    fn plain_directory_has_no_rules() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".gitignore", "*.log\n");
        write(dir.path(), "debug.log", "x");

        assert!(!is_repository(dir.path()));
        assert!(build_matcher(dir.path(), &[]).unwrap().is_none());
        assert!(
            build_matcher(dir.path(), &["*.log".to_string()])
                .unwrap()
                .is_some()
        );
        assert!(exclude_paths(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn repository_gitignore_and_info_exclude() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/info")).unwrap();
        write(dir.path(), ".git/info/exclude", "secret.txt\n");
        write(dir.path(), ".gitignore", "*.log\nnode_modules/\n");
        write(dir.path(), "app.rb", "x");
        write(dir.path(), "debug.log", "x");
        write(dir.path(), "secret.txt", "x");
        write(dir.path(), "node_modules/pkg/index.js", "x");

        assert_eq!(
            exclude_paths(dir.path(), &[]).unwrap(),
            vec!["debug.log", "node_modules/pkg/index.js", "secret.txt"]
        );
    }

    #[test]
    fn configured_patterns_apply_without_a_repository() {
        let dir = tempdir().unwrap();
        write(dir.path(), "lib/a.rb", "x");
        write(dir.path(), "spec/a_spec.rb", "x");
        write(dir.path(), "vendor/gem/b.rb", "x");

        let patterns = vec!["spec/**".to_string(), "vendor/".to_string()];
        assert_eq!(
            exclude_paths(dir.path(), &patterns).unwrap(),
            vec!["spec/a_spec.rb", "vendor/gem/b.rb"]
        );
    }

    #[test]
    fn negated_rules_are_honoured() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        write(dir.path(), ".gitignore", "*.yml\n!keep.yml\n");
        write(dir.path(), "drop.yml", "x");
        write(dir.path(), "keep.yml", "x");

        assert_eq!(exclude_paths(dir.path(), &[]).unwrap(), vec!["drop.yml"]);
    }

    #[test]
    fn nested_gitignore_files_are_honoured() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        write(dir.path(), "sub/.gitignore", "*.tmp\n");
        write(dir.path(), "sub/a.tmp", "x");
        write(dir.path(), "sub/b.rb", "x");
        write(dir.path(), "top.tmp", "x");

        assert_eq!(exclude_paths(dir.path(), &[]).unwrap(), vec!["sub/a.tmp"]);
    }

    #[cfg(unix)]
    #[test]
    fn files_under_private_directories_are_excluded() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write(dir.path(), "priv/a.rb", "x");
        write(dir.path(), "b.rb", "x");
        fs::set_permissions(dir.path().join("priv/a.rb"), fs::Permissions::from_mode(0o644))
            .unwrap();
        fs::set_permissions(dir.path().join("b.rb"), fs::Permissions::from_mode(0o644)).unwrap();
        fs::set_permissions(dir.path().join("priv"), fs::Permissions::from_mode(0o700)).unwrap();

        assert_eq!(exclude_paths(dir.path(), &[]).unwrap(), vec!["priv/a.rb"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_files_are_excluded() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write(dir.path(), "open.rb", "x");
        write(dir.path(), "closed.rb", "x");
        fs::set_permissions(
            dir.path().join("closed.rb"),
            fs::Permissions::from_mode(0o600),
        )
        .unwrap();
        fs::set_permissions(dir.path().join("open.rb"), fs::Permissions::from_mode(0o644))
            .unwrap();

        assert_eq!(exclude_paths(dir.path(), &[]).unwrap(), vec!["closed.rb"]);
    }
}
