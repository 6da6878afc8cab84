//! Host service bundle injected into the dock store.
//!
//! The store never touches the environment directly: persistence, split-window id generation, and
//! tab node relocation all go through the ports collected here.

use std::rc::Rc;

use dock_host::{
    IdGenerator, MemorySnapshotStorage, NoopTabPortal, SequentialIds, SnapshotStorage, TabPortal,
    UuidIds, WebSnapshotStorage,
};

use crate::options::DockOptions;

#[derive(Clone)]
/// Host service bundle for dock store side effects.
pub struct DockHostContext {
    pub(crate) storage: Rc<dyn SnapshotStorage>,
    pub(crate) ids: Rc<dyn IdGenerator>,
    pub(crate) portal: Rc<dyn TabPortal>,
}

impl Default for DockHostContext {
    /// Browser wiring: `localStorage`, random ids, and no portal.
    fn default() -> Self {
        Self::new(
            Rc::new(WebSnapshotStorage),
            Rc::new(UuidIds),
            Rc::new(NoopTabPortal),
        )
    }
}

impl DockHostContext {
    pub fn new(
        storage: Rc<dyn SnapshotStorage>,
        ids: Rc<dyn IdGenerator>,
        portal: Rc<dyn TabPortal>,
    ) -> Self {
        Self {
            storage,
            ids,
            portal,
        }
    }

    /// Headless wiring backed by `storage` with deterministic ids from `options`.
    pub fn in_memory(storage: MemorySnapshotStorage, options: &DockOptions) -> Self {
        Self::new(
            Rc::new(storage),
            Rc::new(SequentialIds::new(options.split_window_prefix.clone())),
            Rc::new(NoopTabPortal),
        )
    }

    pub fn with_portal(mut self, portal: Rc<dyn TabPortal>) -> Self {
        self.portal = portal;
        self
    }

    pub fn storage(&self) -> &dyn SnapshotStorage {
        self.storage.as_ref()
    }
}
