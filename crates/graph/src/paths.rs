//! Lexical path helpers shared by the builder and relationship classification.
//!
//! All paths are treated as `/`-separated strings; nothing here touches the
//! filesystem.

/// Derive a graph node id from a file path.
///
/// Backslashes become `/`, `.` segments are dropped and `..` segments are
/// collapsed against their parent where one exists.
#[must_use]
pub fn node_id_for_path(path: &str) -> String {
    normalize(path)
}

/// Lexically normalize a path.
#[must_use]
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Directory part of a path (empty for a bare file name).
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final path segment.
#[must_use]
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Resolve `specifier` against the directory `base_dir`.
#[must_use]
pub fn resolve_relative(base_dir: &str, specifier: &str) -> String {
    if specifier.starts_with('/') || base_dir.is_empty() {
        normalize(specifier)
    } else {
        normalize(&format!("{base_dir}/{specifier}"))
    }
}

/// Whether the final segment carries an extension (`foo.ts`, not `.env` or `foo`).
#[must_use]
pub fn has_extension(path: &str) -> bool {
    let name = file_name(path);
    matches!(name.rfind('.'), Some(idx) if idx > 0 && idx + 1 < name.len())
}
