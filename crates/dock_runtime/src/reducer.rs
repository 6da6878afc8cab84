//! Reducer actions, side-effect intents, and transition logic for the dock runtime.

use dock_host::IdGenerator;
use thiserror::Error;

use crate::{
    model::{Bounds, DockApp, MTab, MWindow, TabId, WindowId, WindowPatch},
    sanitize::sanitize,
    window_manager::{activate_only, bring_to_front, ensure_single_active, normalize_z_order},
};

/// Upper bound on id-generator draws before a split gives up on finding a free id.
const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_dock`] to mutate [`DockApp`].
pub enum DockAction {
    /// Declare a window, or refresh the configuration of an already known one.
    RegisterWindow(MWindow),
    /// Declare a tab inside a registered window.
    RegisterTab {
        /// Window expected to own the tab.
        window_id: WindowId,
        /// Declared tab.
        tab: MTab,
    },
    /// Remove a window and all of its tabs.
    UnregisterWindow {
        /// Window to remove.
        window_id: WindowId,
    },
    /// Shallow-merge field overrides into a window.
    UpdateWindow {
        /// Window to update.
        window_id: WindowId,
        /// Fields to override.
        patch: WindowPatch,
    },
    /// Raise a window above all others and focus it.
    BringToFront {
        /// Window to raise.
        window_id: WindowId,
    },
    /// Move every tab of `source` into `target` and discard `source`.
    GroupWindows {
        /// Window receiving the tabs.
        target: WindowId,
        /// Window being absorbed.
        source: WindowId,
    },
    /// Split one tab out into a brand-new window.
    UngroupTab {
        /// Window currently owning the tab.
        window_id: WindowId,
        /// Tab to split out.
        tab_id: TabId,
        /// Bounds of the new window.
        bounds: Bounds,
    },
    /// Make one tab the foreground tab of its window.
    SetActiveTab {
        /// Window owning the tab strip.
        window_id: WindowId,
        /// Tab to activate; an unknown id deactivates every tab.
        tab_id: TabId,
    },
    /// Set or clear the active window without restacking.
    SetActiveWindow {
        /// Window to focus, or `None` to clear focus.
        window_id: Option<WindowId>,
    },
    /// Replace the whole state with a sanitized snapshot.
    Hydrate {
        /// Snapshot to install.
        snapshot: DockApp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_dock`] for the host to execute.
pub enum DockEffect {
    /// A tab's logical owner changed; its rendered node should follow.
    RelocateTab {
        /// Moved tab.
        tab_id: TabId,
        /// New owner.
        window_id: WindowId,
    },
    /// A tab left the model entirely; its rendered node should be parked.
    ReleaseTab(TabId),
    /// Move input focus into the given window.
    FocusWindow(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an action left the state untouched.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),
    /// The tab is not part of the named window.
    #[error("tab {tab_id} not found in window {window_id}")]
    TabNotFound {
        /// Window searched.
        window_id: WindowId,
        /// Missing tab.
        tab_id: TabId,
    },
    /// The window was absorbed by grouping and may not be declared again.
    #[error("window {0} was merged away and stays removed")]
    WindowTombstoned(WindowId),
    /// The tab already lives in another window.
    #[error("tab {tab_id} already belongs to window {owner}")]
    TabOwnedElsewhere {
        /// Declared tab.
        tab_id: TabId,
        /// Current owner.
        owner: WindowId,
    },
    /// A window cannot be grouped into itself.
    #[error("cannot group window {0} into itself")]
    SameWindow(WindowId),
    /// The id generator kept returning ids that are already taken.
    #[error("id generator produced no free window id")]
    IdExhausted,
}

impl ReducerError {
    /// Log level for the store to report this no-op at.
    ///
    /// Tombstoned windows and relocated tabs are the normal outcome of re-declaring a layout the
    /// user has rearranged, so they only show up at `debug`.
    pub fn log_level(&self) -> log::Level {
        match self {
            Self::WindowTombstoned(_) | Self::TabOwnedElsewhere { .. } => log::Level::Debug,
            Self::IdExhausted => log::Level::Error,
            _ => log::Level::Warn,
        }
    }
}

/// Applies a [`DockAction`] to the dock state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for windows and tabs. Every action
/// either completes or leaves `app` untouched.
///
/// # Errors
///
/// Returns a [`ReducerError`] describing why the action was a no-op (missing window or tab,
/// tombstoned window, tab owned elsewhere, self-grouping, or id exhaustion).
pub fn reduce_dock(
    app: &mut DockApp,
    ids: &dyn IdGenerator,
    action: DockAction,
) -> Result<Vec<DockEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DockAction::RegisterWindow(window) => register_window(app, window)?,
        DockAction::RegisterTab { window_id, tab } => register_tab(app, window_id, tab)?,
        DockAction::UnregisterWindow { window_id } => {
            let index = app
                .window_index(&window_id)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let removed = app.mwindows.remove(index);
            effects.extend(removed.mtabs.into_iter().map(|t| DockEffect::ReleaseTab(t.id)));
            if app.active_window_id.as_ref() == Some(&window_id) {
                app.active_window_id = app.frontmost_window().map(|w| w.id.clone());
            }
        }
        DockAction::UpdateWindow { window_id, patch } => {
            let window = app
                .window_mut(&window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            patch.apply(window);
        }
        DockAction::BringToFront { window_id } => {
            if !bring_to_front(app, &window_id) {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            effects.push(DockEffect::FocusWindow(window_id));
        }
        DockAction::GroupWindows { target, source } => {
            effects.extend(group_windows(app, target, source)?);
        }
        DockAction::UngroupTab {
            window_id,
            tab_id,
            bounds,
        } => {
            effects.extend(ungroup_tab(app, ids, window_id, tab_id, bounds)?);
        }
        DockAction::SetActiveTab { window_id, tab_id } => {
            let window = app
                .window_mut(&window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            activate_only(&mut window.mtabs, &tab_id);
        }
        DockAction::SetActiveWindow { window_id } => {
            if let Some(window_id) = &window_id {
                if app.window(window_id).is_none() {
                    return Err(ReducerError::WindowNotFound(window_id.clone()));
                }
                effects.push(DockEffect::FocusWindow(window_id.clone()));
            }
            app.active_window_id = window_id;
        }
        DockAction::Hydrate { snapshot } => {
            let next = sanitize(snapshot);
            effects.extend(ownership_changes(app, &next));
            *app = next;
        }
    }

    Ok(effects)
}

fn register_window(app: &mut DockApp, mut window: MWindow) -> Result<(), ReducerError> {
    if app.is_tombstoned(&window.id) {
        return Err(ReducerError::WindowTombstoned(window.id));
    }

    if let Some(existing) = app.window_mut(&window.id) {
        // Bounds, stacking, and the tab strip are user-driven; only configuration is refreshed.
        existing.movable = window.movable;
        existing.resizable = window.resizable;
        existing.bounds_limits = window.bounds_limits;
        existing.is_declarative = window.is_declarative;
        if existing.is_header_visible.is_none() {
            existing.is_header_visible = window.is_header_visible;
        }
        return Ok(());
    }

    let mut claimed = app.tab_ids().into_iter().cloned().collect::<Vec<_>>();
    window.mtabs.retain(|tab| {
        if claimed.contains(&tab.id) {
            false
        } else {
            claimed.push(tab.id.clone());
            true
        }
    });
    // Declared flags may name several active tabs, or none once an owned tab was dropped.
    ensure_single_active(&mut window.mtabs);
    app.mwindows.push(window);
    Ok(())
}

fn register_tab(app: &mut DockApp, window_id: WindowId, tab: MTab) -> Result<(), ReducerError> {
    if app.is_tombstoned(&window_id) {
        return Err(ReducerError::WindowTombstoned(window_id));
    }
    if let Some(owner) = app.tab_owner(&tab.id) {
        if owner.id != window_id {
            return Err(ReducerError::TabOwnedElsewhere {
                tab_id: tab.id,
                owner: owner.id.clone(),
            });
        }
    }

    let window = app
        .window_mut(&window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))?;

    if let Some(existing) = window.mtabs.iter_mut().find(|t| t.id == tab.id) {
        // Visibility and focus are user-driven; the declaration only refreshes the title.
        existing.title = tab.title;
        return Ok(());
    }

    if tab.active {
        for sibling in &mut window.mtabs {
            sibling.active = false;
        }
    }
    window.mtabs.push(tab);
    Ok(())
}

fn group_windows(
    app: &mut DockApp,
    target: WindowId,
    source: WindowId,
) -> Result<Vec<DockEffect>, ReducerError> {
    if target == source {
        return Err(ReducerError::SameWindow(target));
    }
    if app.window(&target).is_none() {
        return Err(ReducerError::WindowNotFound(target));
    }
    let source_index = app
        .window_index(&source)
        .ok_or(ReducerError::WindowNotFound(source))?;

    let absorbed = app.mwindows.remove(source_index);
    let mut moved = absorbed.mtabs;
    // Keeps the source's focused tab; a source without one gets its first tab focused.
    ensure_single_active(&mut moved);

    let effects = moved
        .iter()
        .map(|tab| DockEffect::RelocateTab {
            tab_id: tab.id.clone(),
            window_id: target.clone(),
        })
        .chain(std::iter::once(DockEffect::FocusWindow(target.clone())))
        .collect::<Vec<_>>();

    if let Some(receiver) = app.window_mut(&target) {
        for tab in &mut receiver.mtabs {
            tab.active = false;
        }
        receiver.mtabs.extend(moved);
    }

    if absorbed.is_declarative {
        app.tombstone(absorbed.id);
    }
    app.active_window_id = Some(target);
    Ok(effects)
}

fn ungroup_tab(
    app: &mut DockApp,
    ids: &dyn IdGenerator,
    window_id: WindowId,
    tab_id: TabId,
    bounds: Bounds,
) -> Result<Vec<DockEffect>, ReducerError> {
    let source_index = app
        .window_index(&window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
    let Some(tab_index) = app.mwindows[source_index]
        .mtabs
        .iter()
        .position(|t| t.id == tab_id)
    else {
        return Err(ReducerError::TabNotFound { window_id, tab_id });
    };
    let new_id = next_free_window_id(app, ids)?;

    let source = &mut app.mwindows[source_index];
    let mut tab = source.mtabs.remove(tab_index);
    if tab.active {
        if let Some(first) = source.mtabs.first_mut() {
            first.active = true;
        }
    }
    let bounds_limits = source.bounds_limits;
    if source.mtabs.is_empty() {
        app.mwindows.remove(source_index);
    }

    let top = normalize_z_order(app);
    tab.active = true;
    app.mwindows.push(MWindow {
        id: new_id.clone(),
        movable: true,
        resizable: true,
        bounds,
        bounds_limits,
        z_index: top + 1,
        is_declarative: false,
        is_header_visible: None,
        mtabs: vec![tab],
    });
    app.active_window_id = Some(new_id.clone());

    Ok(vec![
        DockEffect::RelocateTab {
            tab_id,
            window_id: new_id.clone(),
        },
        DockEffect::FocusWindow(new_id),
    ])
}

/// Portal effects for swapping `before` for `after`: releases for tabs that disappeared, then
/// relocations for tabs whose owner changed or that are new.
fn ownership_changes(before: &DockApp, after: &DockApp) -> Vec<DockEffect> {
    let released = before
        .tab_ids()
        .into_iter()
        .filter(|tab_id| after.tab_owner(tab_id).is_none())
        .map(|tab_id| DockEffect::ReleaseTab(tab_id.clone()));
    let relocated = after
        .mwindows
        .iter()
        .flat_map(|window| window.mtabs.iter().map(move |tab| (window, tab)))
        .filter(|(window, tab)| {
            before.tab_owner(&tab.id).map(|owner| &owner.id) != Some(&window.id)
        })
        .map(|(window, tab)| DockEffect::RelocateTab {
            tab_id: tab.id.clone(),
            window_id: window.id.clone(),
        });
    released.chain(relocated).collect()
}

fn next_free_window_id(app: &DockApp, ids: &dyn IdGenerator) -> Result<WindowId, ReducerError> {
    (0..MAX_ID_ATTEMPTS)
        .map(|_| WindowId::from(ids.next_id()))
        .find(|id| app.window(id).is_none() && !app.is_tombstoned(id))
        .ok_or(ReducerError::IdExhausted)
}
