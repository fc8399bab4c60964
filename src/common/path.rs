use std::path::Path;

/// "foo\\bar" -> "foo/bar"
pub fn to_fwd_slash(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

/// Normalises a caller-supplied relative path for comparison against
/// resolved include/exclude entries.
///
/// "./lib/", "lib/" and "lib" all become "lib"; "." and "./" become "".
pub fn normalize_relative(raw: &str) -> String {
    let mut s = raw.replace('\\', "/");
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_owned();
    }
    let trimmed = s.trim_end_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_owned()
    }
}

/// Joins a relative prefix and a child name with a forward slash.
pub fn join_rel(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

/// The include marker for a fully included directory: "./" for the root,
/// "sub/dir/" otherwise.
pub fn dir_marker(prefix: &str) -> String {
    if prefix.is_empty() {
        "./".to_owned()
    } else {
        format!("{prefix}/")
    }
}
