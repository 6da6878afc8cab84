//! Snapshot persistence for boot hydration and per-mutation saves.
//!
//! Persistence is best-effort: load failures degrade to "no prior state" and save failures are
//! reported to the caller, which logs them without touching the in-memory state.

use dock_host::{load_snapshot_with, save_snapshot_with, SnapshotStorage, StorageError};

use crate::model::DockApp;

/// Default storage key for the persisted App snapshot.
pub const DOCK_STATE_KEY: &str = "dock.app_state.v1";

/// Loads the persisted App snapshot stored under `key`.
///
/// Returns `None` when nothing is stored, storage is unreachable, or the stored JSON is corrupt.
/// The last two cases are logged.
pub fn load_boot_snapshot(storage: &dyn SnapshotStorage, key: &str) -> Option<DockApp> {
    match load_snapshot_with::<_, DockApp>(storage, key) {
        Ok(snapshot) => snapshot,
        Err(err @ StorageError::Decode(_)) => {
            log::warn!("discarding unreadable dock snapshot under {key}: {err}");
            None
        }
        Err(err) => {
            log::warn!("dock snapshot load failed: {err}");
            None
        }
    }
}

/// Persists `app` under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the storage write fails.
pub fn persist_snapshot(
    storage: &dyn SnapshotStorage,
    key: &str,
    app: &DockApp,
) -> Result<(), StorageError> {
    save_snapshot_with(storage, key, app)
}

/// Removes the persisted snapshot so the next boot starts from the default layout.
///
/// # Errors
///
/// Returns an error when the storage delete fails.
pub fn clear_snapshot(storage: &dyn SnapshotStorage, key: &str) -> Result<(), StorageError> {
    storage.delete(key)
}

#[cfg(test)]
mod tests {
    use dock_host::MemorySnapshotStorage;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Bounds, MTab, MWindow};

    #[test]
    fn persisted_snapshot_loads_back() {
        let storage = MemorySnapshotStorage::default();
        let app = DockApp::default().with_window(
            MWindow::declarative("w1", Bounds::default()).with_tab(MTab::new("t1", "T")),
        );

        persist_snapshot(&storage, DOCK_STATE_KEY, &app).expect("persist");
        assert_eq!(load_boot_snapshot(&storage, DOCK_STATE_KEY), Some(app));

        clear_snapshot(&storage, DOCK_STATE_KEY).expect("clear");
        assert_eq!(load_boot_snapshot(&storage, DOCK_STATE_KEY), None);
    }

    #[test]
    fn corrupt_snapshot_is_treated_as_absent() {
        let storage = MemorySnapshotStorage::with_entry(DOCK_STATE_KEY, "{\"mwindows\": 3");
        assert_eq!(load_boot_snapshot(&storage, DOCK_STATE_KEY), None);
    }
}
