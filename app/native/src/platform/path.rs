//! Path helpers for locating the resource bundle.

use std::path::{Path, PathBuf};

/// Directory name of bundled resources, relative to the executable's `Contents` dir.
const RESOURCES_DIR_NAME: &str = "Resources";

/// Expands a leading `~` to the user's home directory.
///
/// Empty or whitespace-only input yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

/// Expands `path` and resolves it against `base_dir` when it is relative.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

/// Candidate resource directories when none is configured, in priority order.
///
/// 1. `<exe>/../Resources` (the layout of a macOS `.app` bundle)
/// 2. `<exe dir>/Resources`
/// 3. `./Resources`
#[must_use]
pub fn default_resource_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        if let Some(contents) = exe_dir.parent() {
            dirs.push(contents.join(RESOURCES_DIR_NAME));
        }
        dirs.push(exe_dir.join(RESOURCES_DIR_NAME));
    }

    dirs.push(PathBuf::from(RESOURCES_DIR_NAME));
    dirs
}

/// Picks the resource directory to use.
///
/// A non-empty `configured` value wins, resolved against `base_dir` if relative.
/// Otherwise the first existing entry of [`default_resource_dirs`] is used.
#[must_use]
pub fn resolve_resource_dir(configured: &str, base_dir: &Path) -> Option<PathBuf> {
    let configured = expand_and_resolve(configured, base_dir);
    if !configured.as_os_str().is_empty() {
        return Some(configured);
    }

    default_resource_dirs().into_iter().find(|dir| dir.is_dir())
}
