//! Include-path resolution: the smallest list of path prefixes that covers
//! every analyzable file once the excludes are taken out.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::common::{
    fs::{list_dir, readable_by_all},
    path::{dir_marker, join_rel, normalize_relative},
};

/// Turns an exclude list and the caller's requested paths into the include
/// list of one engine.
pub trait IncludePathsResolver {
    fn build(&self, exclude_paths: &[String], requested_paths: &[String]) -> Result<Vec<String>>;
}

/// Resolves include paths by listing the source tree.
///
/// A directory in which nothing was dropped collapses to its marker (`./`
/// for the root, `dir/` below it); otherwise its surviving children are
/// listed individually, recursing into subdirectories.
#[derive(Debug, Clone)]
pub struct IncludePathsBuilder {
    root: PathBuf,
}

struct Resolved {
    paths: Vec<String>,
    complete: bool,
}

impl IncludePathsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn abs(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    fn resolve_dir(&self, rel: &str, excluded: &HashSet<String>) -> Result<Resolved> {
        let mut paths = Vec::new();
        let mut complete = true;

        for entry in list_dir(&self.abs(rel))? {
            let name = entry.file_name().to_string_lossy();
            let child = join_rel(rel, &name);

            if excluded.contains(&child) {
                complete = false;
                continue;
            }
            if !readable_by_all(entry.path()) {
                debug!("Skipping {child} (not readable by all users)");
                complete = false;
                continue;
            }

            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                let sub = self.resolve_dir(&child, excluded)?;
                if sub.complete {
                    paths.push(dir_marker(&child));
                } else {
                    complete = false;
                    paths.extend(sub.paths);
                }
            } else {
                paths.push(child);
            }
        }

        Ok(Resolved { paths, complete })
    }

    fn resolve_root(&self, excluded: &HashSet<String>) -> Result<Vec<String>> {
        let resolved = self.resolve_dir("", excluded)?;
        if resolved.complete {
            Ok(vec![dir_marker("")])
        } else {
            Ok(resolved.paths)
        }
    }

    fn resolve_requested(&self, rel: &str, excluded: &HashSet<String>) -> Result<Vec<String>> {
        if rel.is_empty() {
            return self.resolve_root(excluded);
        }
        if is_excluded_or_under(rel, excluded) {
            debug!("Requested path {rel} is excluded");
            return Ok(Vec::new());
        }

        let full = self.abs(rel);
        let md = match std::fs::symlink_metadata(&full) {
            Ok(md) => md,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Requested path {rel} does not exist, skipping");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to inspect {}", full.display()));
            }
        };
        if !readable_by_all(&full) {
            warn!("Requested path {rel} is not readable by all users, skipping");
            return Ok(Vec::new());
        }

        if md.is_dir() {
            let sub = self.resolve_dir(rel, excluded)?;
            if sub.complete {
                Ok(vec![dir_marker(rel)])
            } else {
                Ok(sub.paths)
            }
        } else {
            Ok(vec![rel.to_owned()])
        }
    }
}

/// `rel` itself or one of its parent directories is in the exclude set.
fn is_excluded_or_under(rel: &str, excluded: &HashSet<String>) -> bool {
    let mut prefix = rel;
    loop {
        if excluded.contains(prefix) {
            return true;
        }
        match prefix.rfind('/') {
            Some(idx) => prefix = &prefix[..idx],
            None => return false,
        }
    }
}

impl IncludePathsResolver for IncludePathsBuilder {
    fn build(&self, exclude_paths: &[String], requested_paths: &[String]) -> Result<Vec<String>> {
        let excluded: HashSet<String> = exclude_paths
            .iter()
            .map(|p| normalize_relative(p))
            .filter(|p| !p.is_empty())
            .collect();

        if requested_paths.is_empty() {
            return self.resolve_root(&excluded);
        }

        let mut resolved = Vec::new();
        for raw in requested_paths {
            let rel = normalize_relative(raw);
            resolved.extend(self.resolve_requested(&rel, &excluded)?);
        }
        Ok(drop_covered(resolved))
    }
}

/// Removes duplicates and entries that sit under a directory marker also in
/// `paths` (`./` covers everything). First occurrence order is kept.
fn drop_covered(paths: Vec<String>) -> Vec<String> {
    let markers: Vec<&str> = paths
        .iter()
        .filter(|p| p.ends_with('/'))
        .map(String::as_str)
        .collect();
    let covered = |p: &str| {
        markers
            .iter()
            .any(|m| *m != p && (*m == "./" || p.starts_with(m)))
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in &paths {
        if !covered(p) && seen.insert(p.as_str()) {
            out.push(p.clone());
        }
    }
    out
}
