//! Repair pass applied to loaded or declared snapshots before they are installed.

use std::collections::HashSet;

use crate::model::{DockApp, TabId, WindowId};

/// Repairs `state` into a valid snapshot.
///
/// Tombstoned windows are dropped, tabs claimed more than once keep only their first occurrence
/// (window order, then strip order), windows left without tabs are dropped, and a dangling
/// `active_window_id` falls back to the first surviving window. The pass is idempotent.
pub fn sanitize(state: DockApp) -> DockApp {
    let DockApp {
        id,
        mwindows,
        active_window_id,
        removed_window_ids,
    } = state;

    let mut tombstones = HashSet::new();
    let removed_window_ids = removed_window_ids
        .into_iter()
        .filter(|window_id| tombstones.insert(window_id.clone()))
        .collect::<Vec<WindowId>>();

    let mut seen_tabs: HashSet<TabId> = HashSet::new();
    let mwindows = mwindows
        .into_iter()
        .filter(|window| !tombstones.contains(&window.id))
        .map(|mut window| {
            window.mtabs.retain(|tab| seen_tabs.insert(tab.id.clone()));
            window
        })
        .filter(|window| !window.mtabs.is_empty())
        .collect::<Vec<_>>();

    let active_window_id = match active_window_id {
        Some(active) if mwindows.iter().any(|w| w.id == active) => Some(active),
        _ => mwindows.first().map(|w| w.id.clone()),
    };

    DockApp {
        id,
        mwindows,
        active_window_id,
        removed_window_ids,
    }
}
