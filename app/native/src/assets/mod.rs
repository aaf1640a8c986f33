//! Resource lookup.
//!
//! The engine never touches the filesystem directly. Everything it needs
//! (numbered still frames, GIF containers, the offsets configuration) is
//! resolved by logical name through a [`ResourceProvider`], so tests can
//! swap in a [`MemoryBundle`].

mod bundle;
mod memory;

pub use bundle::BundleDir;
pub use memory::MemoryBundle;

/// Kind of a bundled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A still raster image (`png`, `jpg`, `jpeg`).
    Image,
    /// A GIF container.
    Gif,
    /// A JSON data file.
    Data,
}

impl AssetKind {
    /// File extensions accepted for this kind, in lookup priority order.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["png", "jpg", "jpeg"],
            Self::Gif => &["gif"],
            Self::Data => &["json"],
        }
    }

    /// Returns `true` if `ext` (case-insensitive) belongs to this kind.
    #[must_use]
    pub fn matches_extension(self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.extensions().contains(&ext.as_str())
    }
}

/// Resolves logical asset names to raw bytes.
pub trait ResourceProvider: Send + Sync {
    /// Returns the bytes of `name` for `kind`, or `None` if it does not exist.
    fn lookup(&self, name: &str, kind: AssetKind) -> Option<Vec<u8>>;

    /// Lists the logical names available for `kind`.
    fn names(&self, kind: AssetKind) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_by_kind() {
        assert_eq!(AssetKind::Gif.extensions(), &["gif"]);
        assert_eq!(AssetKind::Data.extensions(), &["json"]);
        assert!(AssetKind::Image.extensions().contains(&"png"));
    }

    #[test]
    fn test_matches_extension_is_case_insensitive() {
        assert!(AssetKind::Gif.matches_extension("GIF"));
        assert!(AssetKind::Image.matches_extension("Png"));
        assert!(AssetKind::Image.matches_extension("JPEG"));
        assert!(!AssetKind::Image.matches_extension("gif"));
        assert!(!AssetKind::Data.matches_extension("jsonc"));
    }
}
