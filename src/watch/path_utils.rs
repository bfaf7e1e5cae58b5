// src/watch/path_utils.rs

//! Path helpers: relativizing event paths against the watch root, and
//! translating local paths into the convention the action expects.

use std::path::Path;

use crate::types::PathStyle;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Only if both attempts fail do we give up.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        let s = rel.to_string_lossy().replace('\\', "/");
        return Some(s);
    }

    // macOS in particular reports /private/var/... for /var/... roots.
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            let s = rel.to_string_lossy().replace('\\', "/");
            return Some(s);
        }
    }

    None
}

/// Translates local filesystem paths into the path convention handed to the
/// action.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTranslator {
    style: PathStyle,
}

impl PathTranslator {
    pub fn new(style: PathStyle) -> Self {
        Self { style }
    }

    /// Translate `local_path` according to the configured style.
    ///
    /// `PathStyle::Auto` picks the Windows translation only on Windows hosts.
    pub fn translate(&self, local_path: &Path) -> String {
        let local = local_path.to_string_lossy();
        match self.style {
            PathStyle::Posix => translate_posix(&local),
            PathStyle::Windows => translate_windows(&local),
            PathStyle::Auto if cfg!(windows) => translate_windows(&local),
            PathStyle::Auto => translate_posix(&local),
        }
    }
}

/// Identity translation used on POSIX hosts.
pub fn translate_posix(local_path: &str) -> String {
    local_path.to_string()
}

/// `C:\path\to\watch` becomes `/c/path/to/watch/`.
///
/// Total and infallible: input without a drive letter still goes through the
/// same substitution (everything before the first `:` is treated as the
/// drive), which can produce odd but harmless output. Not idempotent.
pub fn translate_windows(local_path: &str) -> String {
    let (drive, rest) = local_path.split_once(':').unwrap_or((local_path, ""));
    let drive = drive.to_lowercase();
    let rest = rest.replace('\\', "/");
    let rest = rest.trim_matches('/');
    format!("/{drive}/{rest}/")
}
