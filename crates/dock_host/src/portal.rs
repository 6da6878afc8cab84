//! Tab node-portal boundary.
//!
//! Rendered tab content is owned by the surrounding UI. The dock runtime only decides which window
//! a tab belongs to and reports relocations through [`TabPortal`]; [`TabNodeRegistry`] is the
//! in-memory registry a UI layer can use to keep node handles keyed by tab id and track where each
//! node is currently mounted.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

/// Receiver for logical tab ownership changes.
pub trait TabPortal {
    /// `tab_id` now belongs to `window_id`; its rendered node should follow.
    fn relocate(&self, tab_id: &str, window_id: &str);

    /// `tab_id` no longer belongs to any window; its node should be parked off-screen.
    fn release(&self, tab_id: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Portal that ignores every relocation. Used by headless hosts.
pub struct NoopTabPortal;

impl TabPortal for NoopTabPortal {
    fn relocate(&self, _tab_id: &str, _window_id: &str) {}

    fn release(&self, _tab_id: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a registered tab node is currently mounted.
pub enum TabPlacement {
    /// Mounted in the content area of the named window.
    Window(String),
    /// Parked in the hidden stash container.
    Stash,
}

struct RegistryInner<N> {
    nodes: HashMap<String, N>,
    placements: HashMap<String, TabPlacement>,
}

/// Registry of externally-owned tab nodes keyed by tab id.
///
/// Clones share the same registry.
pub struct TabNodeRegistry<N> {
    inner: Rc<RefCell<RegistryInner<N>>>,
}

impl<N> Default for TabNodeRegistry<N> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                nodes: HashMap::new(),
                placements: HashMap::new(),
            })),
        }
    }
}

impl<N> Clone for TabNodeRegistry<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N> fmt::Debug for TabNodeRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TabNodeRegistry")
            .field("nodes", &inner.nodes.len())
            .field("placements", &inner.placements)
            .finish()
    }
}

impl<N: Clone + PartialEq> TabNodeRegistry<N> {
    /// Registers (or replaces) the node rendered for `tab_id`.
    pub fn register_node(&self, tab_id: impl Into<String>, node: N) {
        self.inner.borrow_mut().nodes.insert(tab_id.into(), node);
    }

    /// Removes the node for `tab_id`.
    ///
    /// When `node` is given, the entry is only removed if it still holds that exact node, so a
    /// stale unmount cannot drop a node registered by a newer mount. Returns whether an entry was
    /// removed.
    pub fn unregister_node(&self, tab_id: &str, node: Option<&N>) -> bool {
        let mut inner = self.inner.borrow_mut();
        match (inner.nodes.get(tab_id), node) {
            (None, _) => return false,
            (Some(existing), Some(expected)) if existing != expected => return false,
            _ => {}
        }
        inner.nodes.remove(tab_id);
        inner.placements.remove(tab_id);
        true
    }

    /// Returns the node registered for `tab_id`.
    pub fn node(&self, tab_id: &str) -> Option<N> {
        self.inner.borrow().nodes.get(tab_id).cloned()
    }

    /// Records the node for `tab_id` as mounted in `window_id`.
    ///
    /// Returns `false` when no node is registered for the tab.
    pub fn mount(&self, tab_id: &str, window_id: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(tab_id) {
            log::debug!("mount skipped: no node registered for tab {tab_id}");
            return false;
        }
        inner
            .placements
            .insert(tab_id.to_string(), TabPlacement::Window(window_id.to_string()));
        true
    }

    /// Parks the node for `tab_id` in the stash. No-op if the tab has no node.
    pub fn stash(&self, tab_id: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.nodes.contains_key(tab_id) {
            inner
                .placements
                .insert(tab_id.to_string(), TabPlacement::Stash);
        }
    }

    /// Returns where the node for `tab_id` is mounted, if it has been placed.
    pub fn placement(&self, tab_id: &str) -> Option<TabPlacement> {
        self.inner.borrow().placements.get(tab_id).cloned()
    }

    /// Returns the ids of tabs mounted in `window_id`, sorted.
    pub fn mounted_in(&self, window_id: &str) -> Vec<String> {
        let inner = self.inner.borrow();
        let mut tabs = inner
            .placements
            .iter()
            .filter(|(_, placement)| {
                matches!(placement, TabPlacement::Window(id) if id == window_id)
            })
            .map(|(tab_id, _)| tab_id.clone())
            .collect::<Vec<_>>();
        tabs.sort();
        tabs
    }
}

impl<N: Clone + PartialEq> TabPortal for TabNodeRegistry<N> {
    fn relocate(&self, tab_id: &str, window_id: &str) {
        self.mount(tab_id, window_id);
    }

    fn release(&self, tab_id: &str) {
        self.stash(tab_id);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mount_requires_registered_node() {
        let registry = TabNodeRegistry::<u32>::default();
        assert!(!registry.mount("t1", "w1"));

        registry.register_node("t1", 7);
        assert!(registry.mount("t1", "w1"));
        assert_eq!(
            registry.placement("t1"),
            Some(TabPlacement::Window("w1".to_string()))
        );
    }

    #[test]
    fn unregister_ignores_stale_node_handles() {
        let registry = TabNodeRegistry::<u32>::default();
        registry.register_node("t1", 1);
        registry.register_node("t1", 2);

        assert!(!registry.unregister_node("t1", Some(&1)));
        assert_eq!(registry.node("t1"), Some(2));
        assert!(registry.unregister_node("t1", Some(&2)));
        assert_eq!(registry.node("t1"), None);
        assert!(!registry.unregister_node("t1", None));
    }

    #[test]
    fn portal_trait_relocates_and_stashes() {
        let registry = TabNodeRegistry::<&'static str>::default();
        registry.register_node("a", "node-a");
        registry.register_node("b", "node-b");
        let portal: &dyn TabPortal = &registry;

        portal.relocate("a", "w2");
        portal.relocate("b", "w2");
        assert_eq!(registry.mounted_in("w2"), vec!["a".to_string(), "b".to_string()]);

        portal.release("a");
        assert_eq!(registry.placement("a"), Some(TabPlacement::Stash));
        assert_eq!(registry.mounted_in("w2"), vec!["b".to_string()]);
    }
}
