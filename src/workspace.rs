//! Workspace-root handling for path filter clauses.
//!
//! A `?folder` clause names a folder either absolutely or relative to the
//! current workspace root. Resolution produces the absolute, normalized
//! folder path that tab locations are compared against.

use std::path::Path;

/// Resolve a path-filter argument to an absolute, normalized folder path.
///
/// Relative input is joined against the workspace root; without a root a
/// relative path cannot be resolved and `None` is returned, which makes the
/// clause match nothing.
pub fn resolve_filter_path(input: &str, workspace_root: Option<&Path>) -> Option<String> {
    let input = input.trim();

    let joined = if is_absolute(input) {
        input.to_string()
    } else {
        let root = workspace_root?.to_string_lossy().into_owned();
        if input.is_empty() {
            root
        } else {
            format!("{}/{}", root.trim_end_matches(['/', '\\']), input)
        }
    };

    Some(normalize(&joined))
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    // Windows drive form: "C:" / "C:\..." / "C:/..."
    let mut chars = path.chars();
    matches!((chars.next(), chars.next()), (Some(c), Some(':')) if c.is_ascii_alphabetic())
}

/// Normalize to forward slashes, resolve `.`/`..` segments, lowercase a
/// leading drive letter (`/C:` -> `/c:`) and strip any trailing slash.
fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    // Drive paths gain a leading slash so "/c:/x" and "c:/x" compare equal.
    let unified = if !unified.starts_with('/') {
        format!("/{}", unified)
    } else {
        unified
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut result = format!("/{}", segments.join("/"));

    // Lowercase the drive letter so paths compare equal regardless of how
    // the host capitalized it.
    let drive = {
        let b = result.as_bytes();
        (b.len() >= 3 && b[2] == b':' && b[1].is_ascii_uppercase())
            .then(|| (b[1] as char).to_ascii_lowercase())
    };
    if let Some(c) = drive {
        result.replace_range(1..2, &c.to_string());
    }

    if result.len() > 1 {
        result.truncate(result.trim_end_matches('/').len());
    }
    result
}
