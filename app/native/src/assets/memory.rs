//! In-memory resource bundle.

use std::collections::HashMap;

use natord::compare;
use parking_lot::RwLock;

use super::{AssetKind, ResourceProvider};

/// A mutable, in-memory [`ResourceProvider`].
///
/// Assets can be inserted and removed while the engine is running, which makes
/// it possible to observe that empty results are not cached.
#[derive(Debug, Default)]
pub struct MemoryBundle {
    assets: RwLock<HashMap<(AssetKind, String), Vec<u8>>>,
}

impl MemoryBundle {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Adds or replaces an asset.
    pub fn insert(&self, name: impl Into<String>, kind: AssetKind, bytes: Vec<u8>) {
        self.assets.write().insert((kind, name.into()), bytes);
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(self, name: impl Into<String>, kind: AssetKind, bytes: Vec<u8>) -> Self {
        self.insert(name, kind, bytes);
        self
    }

    /// Removes an asset, returning its bytes.
    pub fn remove(&self, name: &str, kind: AssetKind) -> Option<Vec<u8>> {
        self.assets.write().remove(&(kind, name.to_string()))
    }

    /// Number of stored assets.
    #[must_use]
    pub fn len(&self) -> usize { self.assets.read().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.assets.read().is_empty() }
}

impl ResourceProvider for MemoryBundle {
    fn lookup(&self, name: &str, kind: AssetKind) -> Option<Vec<u8>> {
        self.assets.read().get(&(kind, name.to_string())).cloned()
    }

    fn names(&self, kind: AssetKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .assets
            .read()
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort_by(|a, b| compare(a, b));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let bundle = MemoryBundle::new().with("parrot1", AssetKind::Image, vec![1, 2, 3]);

        assert_eq!(bundle.lookup("parrot1", AssetKind::Image), Some(vec![1, 2, 3]));
        assert!(bundle.lookup("parrot1", AssetKind::Gif).is_none());
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_assets_can_appear_later() {
        let bundle = MemoryBundle::new();
        assert!(bundle.lookup("fiestaparrot", AssetKind::Gif).is_none());

        bundle.insert("fiestaparrot", AssetKind::Gif, vec![0x47]);
        assert!(bundle.lookup("fiestaparrot", AssetKind::Gif).is_some());

        assert!(bundle.remove("fiestaparrot", AssetKind::Gif).is_some());
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_names_by_kind() {
        let bundle = MemoryBundle::new()
            .with("parrot10", AssetKind::Image, vec![])
            .with("parrot9", AssetKind::Image, vec![])
            .with("dealwithit", AssetKind::Gif, vec![]);

        assert_eq!(bundle.names(AssetKind::Image), vec!["parrot9", "parrot10"]);
        assert_eq!(bundle.names(AssetKind::Gif), vec!["dealwithit"]);
    }
}
