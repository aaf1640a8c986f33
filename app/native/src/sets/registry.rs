//! Discovery of available sets and the menu built from them.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::assets::{AssetKind, ResourceProvider};
use crate::imaging::base_name;

/// Action bound to a discovered set. Invoking it selects that set.
pub type SetCommand = Arc<dyn Fn() + Send + Sync>;

/// One row of the set menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Set(String),
    /// Separator before the all-lowercase names, which are listed in a submenu.
    MoreSets,
}

/// Maps every GIF in the bundle to the command that selects it.
pub struct SetRegistry {
    commands: HashMap<String, SetCommand>,
}

impl SetRegistry {
    /// Builds the registry from the provider's GIF names.
    pub fn discover<F>(provider: &dyn ResourceProvider, make_command: F) -> Self
    where F: Fn(&str) -> SetCommand {
        let commands: HashMap<String, SetCommand> = provider
            .names(AssetKind::Gif)
            .into_iter()
            .map(|name| {
                let command = make_command(&name);
                (name, command)
            })
            .collect();

        tracing::debug!(count = commands.len(), "discovered gif sets");
        Self { commands }
    }

    /// Runs the command registered for `name`. Returns `false` for unknown names.
    pub fn activate(&self, name: &str) -> bool {
        let Some(command) = self.commands.get(name) else {
            tracing::warn!(set = name, "no command registered for set");
            return false;
        };

        command();
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool { self.commands.contains_key(name) }

    /// Registered names in natural order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort_by(|a, b| natord::compare(a, b));
        names
    }

    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Menu layout: names in natural order, with [`MenuEntry::MoreSets`]
    /// inserted once, before the first all-lowercase name.
    ///
    /// Uppercase letters order before lowercase ones, so the capitalized sets
    /// end up above the separator.
    #[must_use]
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        let names = self.names();
        let mut entries = Vec::with_capacity(names.len() + 1);
        let mut separated = false;

        for name in names {
            if !separated && is_all_lowercase(&name) {
                entries.push(MenuEntry::MoreSets);
                separated = true;
            }
            entries.push(MenuEntry::Set(name));
        }
        entries
    }
}

impl std::fmt::Debug for SetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetRegistry").field("names", &self.names()).finish()
    }
}

fn is_all_lowercase(name: &str) -> bool { !name.chars().any(char::is_uppercase) }

/// Unique base names of the still images in the bundle, in natural order.
#[must_use]
pub fn static_set_names(provider: &dyn ResourceProvider) -> Vec<String> {
    let unique: BTreeSet<String> = provider
        .names(AssetKind::Image)
        .iter()
        .map(|name| base_name(name))
        .filter(|base| !base.is_empty())
        .map(str::to_string)
        .collect();

    let mut names: Vec<String> = unique.into_iter().collect();
    names.sort_by(|a, b| natord::compare(a, b));
    names
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::assets::MemoryBundle;

    fn bundle_with_gifs(names: &[&str]) -> MemoryBundle {
        let bundle = MemoryBundle::new();
        for name in names {
            bundle.insert(*name, AssetKind::Gif, vec![0]);
        }
        bundle
    }

    fn noop(_: &str) -> SetCommand { Arc::new(|| {}) }

    #[test]
    fn test_discover_registers_every_gif() {
        let bundle = bundle_with_gifs(&["FiestaParrot", "aussieparrot", "Parrot2"]);
        let registry = SetRegistry::discover(&bundle, noop);

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("aussieparrot"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_activate_runs_bound_command() {
        let bundle = bundle_with_gifs(&["FiestaParrot", "aussieparrot"]);
        let selected = Arc::new(Mutex::new(Vec::new()));

        let registry = SetRegistry::discover(&bundle, |name| {
            let selected = Arc::clone(&selected);
            let name = name.to_string();
            Arc::new(move || selected.lock().push(name.clone()))
        });

        assert!(registry.activate("aussieparrot"));
        assert!(registry.activate("FiestaParrot"));
        assert!(!registry.activate("nope"));

        assert_eq!(*selected.lock(), vec!["aussieparrot".to_string(), "FiestaParrot".to_string()]);
    }

    #[test]
    fn test_activate_unknown_runs_nothing() {
        let bundle = bundle_with_gifs(&["FiestaParrot"]);
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = SetRegistry::discover(&bundle, |_| {
            let calls = Arc::clone(&calls);
            Arc::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        });

        assert!(!registry.activate("fiestaparrot"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_names_use_natural_order() {
        let bundle = bundle_with_gifs(&["parrot10", "parrot2", "parrot1"]);
        let registry = SetRegistry::discover(&bundle, noop);

        assert_eq!(registry.names(), vec!["parrot1", "parrot2", "parrot10"]);
    }

    #[test]
    fn test_menu_puts_lowercase_names_after_separator() {
        let bundle = bundle_with_gifs(&["aussieparrot", "FiestaParrot", "BeerParrot", "congaparrot"]);
        let registry = SetRegistry::discover(&bundle, noop);

        assert_eq!(registry.menu_entries(), vec![
            MenuEntry::Set("BeerParrot".to_string()),
            MenuEntry::Set("FiestaParrot".to_string()),
            MenuEntry::MoreSets,
            MenuEntry::Set("aussieparrot".to_string()),
            MenuEntry::Set("congaparrot".to_string()),
        ]);
    }

    #[test]
    fn test_menu_keeps_sorted_order_around_separator() {
        let bundle = bundle_with_gifs(&["congaparrot", "aussieParrot", "FiestaParrot", "zParrot"]);
        let registry = SetRegistry::discover(&bundle, noop);

        assert_eq!(registry.menu_entries(), vec![
            MenuEntry::Set("FiestaParrot".to_string()),
            MenuEntry::Set("aussieParrot".to_string()),
            MenuEntry::MoreSets,
            MenuEntry::Set("congaparrot".to_string()),
            MenuEntry::Set("zParrot".to_string()),
        ]);
    }

    #[test]
    fn test_menu_without_lowercase_names_has_no_separator() {
        let bundle = bundle_with_gifs(&["FiestaParrot"]);
        let registry = SetRegistry::discover(&bundle, noop);

        assert_eq!(registry.menu_entries(), vec![MenuEntry::Set("FiestaParrot".to_string())]);
    }

    #[test]
    fn test_empty_bundle() {
        let registry = SetRegistry::discover(&MemoryBundle::new(), noop);
        assert!(registry.is_empty());
        assert!(registry.menu_entries().is_empty());
    }

    #[test]
    fn test_static_set_names_are_unique_bases() {
        let bundle = MemoryBundle::new()
            .with("parrot1", AssetKind::Image, vec![0])
            .with("parrot2", AssetKind::Image, vec![0])
            .with("parrot10", AssetKind::Image, vec![0])
            .with("shuffleparrot1", AssetKind::Image, vec![0])
            .with("fiestaparrot", AssetKind::Gif, vec![0]);

        assert_eq!(static_set_names(&bundle), vec!["parrot", "shuffleparrot"]);
    }
}
