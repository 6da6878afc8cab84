//! The dock store: one App snapshot, synchronous observers, and best-effort persistence.
//!
//! [`DockStore`] is a cheap-to-clone handle owned by the application's composition root. Every
//! mutation is a single read-compute-write through [`reduce_dock`]; observers run synchronously in
//! subscription order right after a new snapshot is installed. Observers must not dispatch from
//! inside their callback: the state borrow is released first so this re-enters rather than panics,
//! but the outer notification loop keeps delivering the older snapshot.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use crate::{
    host::DockHostContext,
    model::{Bounds, DockApp, MTab, MWindow, TabId, WindowId, WindowPatch},
    options::DockOptions,
    persistence,
    reducer::{reduce_dock, DockAction, DockEffect},
    sanitize::sanitize,
};

type Observer = Rc<dyn Fn(&DockApp)>;

struct StoreInner {
    state: RefCell<DockApp>,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_observer_id: Cell<u64>,
    host: DockHostContext,
    options: DockOptions,
}

#[derive(Clone)]
/// Shared handle to the window/tab state container.
pub struct DockStore {
    inner: Rc<StoreInner>,
}

/// Handle returned by [`DockStore::subscribe`].
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Stops delivering snapshots to the observer.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .observers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl DockStore {
    /// Creates a store holding the empty App, without loading or persisting anything.
    pub fn new(host: DockHostContext, options: DockOptions) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(DockApp::default()),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(1),
                host,
                options,
            }),
        }
    }

    /// Boots the store: installs the persisted snapshot (or else `default_app`) after sanitizing
    /// it, then persists every snapshot from here on.
    pub fn boot(host: DockHostContext, options: DockOptions, default_app: Option<DockApp>) -> Self {
        let store = Self::new(host, options);
        let persisted = persistence::load_boot_snapshot(
            store.inner.host.storage(),
            &store.inner.options.storage_key,
        );
        if let Some(initial) = persisted.or(default_app) {
            *store.inner.state.borrow_mut() = sanitize(initial);
        }
        store.install_persistence();
        store
    }

    fn install_persistence(&self) {
        let storage = Rc::clone(&self.inner.host.storage);
        let key = self.inner.options.storage_key.clone();
        // The subscription lives as long as the store.
        let _ = self.subscribe(move |app| {
            if let Err(err) = persistence::persist_snapshot(storage.as_ref(), &key, app) {
                log::error!("persist dock snapshot failed: {err}");
            }
        });
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> DockApp {
        self.inner.state.borrow().clone()
    }

    /// Reads the current snapshot without cloning it.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&DockApp) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Installs `next` as the current snapshot and notifies observers.
    pub fn replace(&self, next: DockApp) {
        *self.inner.state.borrow_mut() = next;
        self.notify();
    }

    /// Computes the next snapshot from the current one and installs it.
    pub fn update(&self, f: impl FnOnce(&DockApp) -> DockApp) {
        let next = self.with_snapshot(f);
        self.replace(next);
    }

    /// Registers `observer` and immediately delivers the current snapshot to it.
    pub fn subscribe(&self, observer: impl Fn(&DockApp) + 'static) -> Subscription {
        let id = self.inner.next_observer_id.get();
        self.inner.next_observer_id.set(id + 1);
        let observer: Observer = Rc::new(observer);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::clone(&observer)));

        let current = self.snapshot();
        observer(&current);

        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    fn notify(&self) {
        let observers = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect::<Vec<_>>();
        let current = self.snapshot();
        for observer in observers {
            observer(&current);
        }
    }

    /// Applies `action`, publishes the resulting snapshot, and forwards tab relocations to the
    /// portal.
    ///
    /// Returns the effects of the action. No-op actions are logged, publish nothing, and return
    /// no effects.
    pub fn dispatch(&self, action: DockAction) -> Vec<DockEffect> {
        let mut next = self.snapshot();
        match reduce_dock(&mut next, self.inner.host.ids.as_ref(), action) {
            Ok(effects) => {
                self.replace(next);
                self.run_effects(&effects);
                effects
            }
            Err(err) => {
                log::log!(err.log_level(), "dock action ignored: {err}");
                Vec::new()
            }
        }
    }

    fn run_effects(&self, effects: &[DockEffect]) {
        let portal = &self.inner.host.portal;
        for effect in effects {
            match effect {
                DockEffect::RelocateTab { tab_id, window_id } => {
                    portal.relocate(tab_id.as_str(), window_id.as_str());
                }
                DockEffect::ReleaseTab(tab_id) => portal.release(tab_id.as_str()),
                DockEffect::FocusWindow(_) => {}
            }
        }
    }

    /// Declares `window`, or refreshes the configuration of an already known one.
    pub fn register_window(&self, window: MWindow) {
        self.dispatch(DockAction::RegisterWindow(window));
    }

    /// Declares `tab` inside `window_id` unless another window already owns it.
    pub fn register_tab(&self, window_id: impl Into<WindowId>, tab: MTab) {
        self.dispatch(DockAction::RegisterTab {
            window_id: window_id.into(),
            tab,
        });
    }

    /// Removes `window_id` and parks its tab nodes.
    pub fn unregister_window(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DockAction::UnregisterWindow {
            window_id: window_id.into(),
        });
    }

    /// Shallow-merges `patch` into `window_id`.
    pub fn update_window(&self, window_id: impl Into<WindowId>, patch: WindowPatch) {
        self.dispatch(DockAction::UpdateWindow {
            window_id: window_id.into(),
            patch,
        });
    }

    /// Raises `window_id` above every other window and focuses it.
    pub fn bring_to_front(&self, window_id: impl Into<WindowId>) {
        self.dispatch(DockAction::BringToFront {
            window_id: window_id.into(),
        });
    }

    /// Merges every tab of `source` into `target` and discards `source`.
    pub fn group_windows(&self, target: impl Into<WindowId>, source: impl Into<WindowId>) {
        self.dispatch(DockAction::GroupWindows {
            target: target.into(),
            source: source.into(),
        });
    }

    /// Splits `tab_id` out of `window_id` into a new window and returns the new window's id.
    pub fn ungroup_tab(
        &self,
        window_id: impl Into<WindowId>,
        tab_id: impl Into<TabId>,
        bounds: Bounds,
    ) -> Option<WindowId> {
        self.dispatch(DockAction::UngroupTab {
            window_id: window_id.into(),
            tab_id: tab_id.into(),
            bounds,
        })
        .into_iter()
        .find_map(|effect| match effect {
            DockEffect::RelocateTab { window_id, .. } => Some(window_id),
            _ => None,
        })
    }

    /// Makes `tab_id` the only active tab of `window_id`.
    pub fn set_active_tab(&self, window_id: impl Into<WindowId>, tab_id: impl Into<TabId>) {
        self.dispatch(DockAction::SetActiveTab {
            window_id: window_id.into(),
            tab_id: tab_id.into(),
        });
    }

    /// Focuses `window_id`, or clears focus with `None`, without restacking.
    pub fn set_active_window(&self, window_id: Option<WindowId>) {
        self.dispatch(DockAction::SetActiveWindow { window_id });
    }

    /// Replaces the state with a sanitized `snapshot`.
    pub fn hydrate(&self, snapshot: DockApp) {
        self.dispatch(DockAction::Hydrate { snapshot });
    }

    /// Deletes the persisted snapshot. The in-memory state is untouched and is written again by
    /// the next mutation.
    pub fn clear_persisted(&self) {
        if let Err(err) =
            persistence::clear_snapshot(self.inner.host.storage(), &self.inner.options.storage_key)
        {
            log::error!("clear dock snapshot failed: {err}");
        }
    }
}
