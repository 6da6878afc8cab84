//! Shared stacking and tab-focus helpers used by the dock reducer.

use crate::model::{DockApp, MTab, TabId, WindowId};

/// Raises `window_id` above every other window and makes it the active window.
///
/// The other windows keep their relative order (stable sort by current z-index) and the whole
/// stack is renumbered `1..=N`, so the target ends with `N`. Returns `false` when the window is
/// absent.
pub fn bring_to_front(app: &mut DockApp, window_id: &WindowId) -> bool {
    let Some(target_index) = app.window_index(window_id) else {
        return false;
    };

    let mut order = stacking_order(app);
    order.retain(|&idx| idx != target_index);
    order.push(target_index);
    assign_z_indices(app, &order);
    app.active_window_id = Some(window_id.clone());
    true
}

/// Renumbers z-indices to `1..=N` following the current stacking order.
///
/// Windows sharing a z-index keep their insertion order. Returns the highest assigned index.
pub fn normalize_z_order(app: &mut DockApp) -> u32 {
    let order = stacking_order(app);
    assign_z_indices(app, &order);
    order.len() as u32
}

/// Returns whether the z-indices form a gap-free permutation of `1..=N`.
pub fn is_contiguous_stack(app: &DockApp) -> bool {
    let mut z = app.mwindows.iter().map(|w| w.z_index).collect::<Vec<_>>();
    z.sort_unstable();
    z.iter().enumerate().all(|(idx, &z)| z == idx as u32 + 1)
}

fn stacking_order(app: &DockApp) -> Vec<usize> {
    let mut order = (0..app.mwindows.len()).collect::<Vec<_>>();
    order.sort_by_key(|&idx| app.mwindows[idx].z_index);
    order
}

fn assign_z_indices(app: &mut DockApp, order: &[usize]) {
    for (rank, &idx) in order.iter().enumerate() {
        app.mwindows[idx].z_index = rank as u32 + 1;
    }
}

/// Marks exactly the tab named `tab_id` active. An unknown id leaves every tab inactive.
pub fn activate_only(tabs: &mut [MTab], tab_id: &TabId) {
    for tab in tabs {
        tab.active = &tab.id == tab_id;
    }
}

/// Enforces a single active tab: the first active tab wins, and when none is active the first tab
/// is activated.
pub fn ensure_single_active(tabs: &mut [MTab]) {
    let mut seen_active = false;
    for tab in tabs.iter_mut() {
        if tab.active {
            if seen_active {
                tab.active = false;
            }
            seen_active = true;
        }
    }
    if !seen_active {
        if let Some(first) = tabs.first_mut() {
            first.active = true;
        }
    }
}
