//! Directory-backed resource bundle.

use std::fs;
use std::path::{Path, PathBuf};

use natord::compare;

use super::{AssetKind, ResourceProvider};

/// Resources stored as plain files in one directory.
///
/// An asset named `parrot1` of kind [`AssetKind::Image`] is read from
/// `parrot1.png` (or `.jpg`/`.jpeg`); GIF set `fiestaparrot` from
/// `fiestaparrot.gif`; data `Offsets` from `Offsets.json`.
#[derive(Debug, Clone)]
pub struct BundleDir {
    root: PathBuf,
}

impl BundleDir {
    /// Creates a bundle rooted at `root`. The directory is not required to exist.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Returns the bundle directory.
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Returns the path of the file backing `name`, if any.
    #[must_use]
    pub fn path_of(&self, name: &str, kind: AssetKind) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return None;
        }

        kind.extensions()
            .iter()
            .map(|ext| self.root.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl ResourceProvider for BundleDir {
    fn lookup(&self, name: &str, kind: AssetKind) -> Option<Vec<u8>> {
        let path = self.path_of(name, kind)?;

        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read resource");
                None
            }
        }
    }

    fn names(&self, kind: AssetKind) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(
                    path = %self.root.display(),
                    error = %err,
                    "failed to read resource directory"
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| kind.matches_extension(ext))
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();

        names.sort_by(|a, b| compare(a, b));
        names.dedup();
        names
    }
}
