//! Property-based invariant tests for the dock reducer and sanitizer.
//!
//! For arbitrary operation sequences over a small id pool:
//!
//! 1. Every tab id appears in exactly one window.
//! 2. Grouping and ungrouping never lose or duplicate tabs.
//! 3. No window is left without tabs, except a declared window still waiting for its tabs.
//! 4. At most one tab per window is active; a freshly declared window has exactly one.
//! 5. The active window id, when set, names an existing window.
//! 6. After raising a window the stack is `1..=N` with the target on top.
//! 7. `sanitize` is idempotent and removes tombstoned windows and duplicate tabs.

use std::collections::HashSet;

use dock_host::SequentialIds;
use dock_runtime::{
    reduce_dock, sanitize, window_manager::is_contiguous_stack, Bounds, DockAction, DockApp, MTab,
    MWindow, TabId, WindowId, WindowPatch,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const WINDOW_POOL: usize = 6;
const TAB_POOL: usize = 12;

fn window_name(idx: usize) -> WindowId {
    if idx < 3 {
        WindowId::new(format!("w{idx}"))
    } else {
        // Ids the split generator hands out, so later ops can target split windows.
        WindowId::new(format!("split-{}", idx - 2))
    }
}

fn tab_name(idx: usize) -> TabId {
    TabId::new(format!("t{idx}"))
}

fn initial_layout() -> DockApp {
    (0..3).fold(DockApp::default(), |app, w| {
        let window = (0..3).fold(
            MWindow::declarative(window_name(w), Bounds::default()).with_z_index(w as u32 + 1),
            |window, t| {
                let tab = MTab::new(tab_name(w * 3 + t), "tab");
                window.with_tab(if t == 0 { tab.activated() } else { tab })
            },
        );
        app.with_window(window)
    })
}

#[derive(Debug, Clone)]
enum Op {
    Raise(usize),
    Group(usize, usize),
    Ungroup(usize, usize),
    ActivateTab(usize, usize),
    Unregister(usize),
    AddTab(usize, usize),
    Declare(usize, Vec<(usize, bool)>),
    Move(usize, i32, i32),
    Focus(Option<usize>),
    /// Reinstall a snapshot seen earlier in the run, as a reload would.
    Hydrate(prop::sample::Index),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..WINDOW_POOL).prop_map(Op::Raise),
        (0..WINDOW_POOL, 0..WINDOW_POOL).prop_map(|(a, b)| Op::Group(a, b)),
        (0..WINDOW_POOL, 0..TAB_POOL).prop_map(|(w, t)| Op::Ungroup(w, t)),
        (0..WINDOW_POOL, 0..TAB_POOL).prop_map(|(w, t)| Op::ActivateTab(w, t)),
        (0..WINDOW_POOL).prop_map(Op::Unregister),
        (0..WINDOW_POOL, 0..TAB_POOL).prop_map(|(w, t)| Op::AddTab(w, t)),
        (
            0..WINDOW_POOL,
            prop::collection::vec((0..TAB_POOL, any::<bool>()), 0..4),
        )
            .prop_map(|(w, tabs)| Op::Declare(w, tabs)),
        (0..WINDOW_POOL, -50i32..50, -50i32..50).prop_map(|(w, x, y)| Op::Move(w, x, y)),
        prop::option::of(0..WINDOW_POOL).prop_map(Op::Focus),
        any::<prop::sample::Index>().prop_map(Op::Hydrate),
    ]
}

fn declared_window(w: usize, tabs: &[(usize, bool)]) -> MWindow {
    tabs.iter().fold(
        MWindow::declarative(window_name(w), Bounds::default()),
        |window, &(t, active)| {
            let tab = MTab::new(tab_name(t), "declared");
            window.with_tab(if active { tab.activated() } else { tab })
        },
    )
}

fn to_action(op: &Op, history: &[DockApp]) -> DockAction {
    match *op {
        Op::Raise(w) => DockAction::BringToFront {
            window_id: window_name(w),
        },
        Op::Group(a, b) => DockAction::GroupWindows {
            target: window_name(a),
            source: window_name(b),
        },
        Op::Ungroup(w, t) => DockAction::UngroupTab {
            window_id: window_name(w),
            tab_id: tab_name(t),
            bounds: Bounds::new(10, 10, 200, 150),
        },
        Op::ActivateTab(w, t) => DockAction::SetActiveTab {
            window_id: window_name(w),
            tab_id: tab_name(t),
        },
        Op::Unregister(w) => DockAction::UnregisterWindow {
            window_id: window_name(w),
        },
        Op::AddTab(w, t) => DockAction::RegisterTab {
            window_id: window_name(w),
            tab: MTab::new(tab_name(t), "added"),
        },
        Op::Declare(w, ref tabs) => DockAction::RegisterWindow(declared_window(w, tabs)),
        Op::Move(w, x, y) => DockAction::UpdateWindow {
            window_id: window_name(w),
            patch: WindowPatch::bounds(Bounds::new(x, y, 300, 200)),
        },
        Op::Focus(w) => DockAction::SetActiveWindow {
            window_id: w.map(window_name),
        },
        Op::Hydrate(pick) => DockAction::Hydrate {
            snapshot: history[pick.index(history.len())].clone(),
        },
    }
}

fn sorted_tabs(app: &DockApp) -> Vec<TabId> {
    let mut tabs = app.tab_ids().into_iter().cloned().collect::<Vec<_>>();
    tabs.sort();
    tabs
}

fn check_invariants(
    app: &DockApp,
    awaiting_tabs: &HashSet<WindowId>,
) -> Result<(), TestCaseError> {
    let tabs = app.tab_ids();
    let unique = tabs.iter().collect::<HashSet<_>>();
    prop_assert_eq!(unique.len(), tabs.len(), "duplicate tab ids in {:?}", app);

    for window in &app.mwindows {
        prop_assert!(
            !window.mtabs.is_empty() || awaiting_tabs.contains(&window.id),
            "empty window {}",
            window.id
        );
        let active = window.mtabs.iter().filter(|t| t.active).count();
        prop_assert!(active <= 1, "window {} has {} active tabs", window.id, active);
    }

    if let Some(active) = &app.active_window_id {
        prop_assert!(app.window(active).is_some(), "dangling active window {}", active);
    }
    Ok(())
}

fn arbitrary_app() -> impl Strategy<Value = DockApp> {
    let window = (
        0..WINDOW_POOL,
        prop::collection::vec((0..TAB_POOL, any::<bool>()), 0..5),
        1u32..10,
    )
        .prop_map(|(w, tabs, z)| {
            tabs.into_iter().fold(
                MWindow::declarative(window_name(w), Bounds::default()).with_z_index(z),
                |window, (t, active)| {
                    let tab = MTab::new(tab_name(t), "tab");
                    window.with_tab(if active { tab.activated() } else { tab })
                },
            )
        });
    (
        prop::collection::vec(window, 0..6),
        prop::collection::vec(0..WINDOW_POOL, 0..3),
        prop::option::of(0..WINDOW_POOL),
    )
        .prop_map(|(mwindows, removed, active)| DockApp {
            mwindows,
            removed_window_ids: removed.into_iter().map(window_name).collect(),
            active_window_id: active.map(window_name),
            ..DockApp::default()
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1-5. Reducer invariants over operation sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn operation_sequences_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let ids = SequentialIds::new("split-");
        let mut app = initial_layout();
        let mut history = vec![app.clone()];
        let mut awaiting_tabs = HashSet::new();
        check_invariants(&app, &awaiting_tabs)?;

        for op in &ops {
            let before = app.clone();
            let result = reduce_dock(&mut app, &ids, to_action(op, &history));
            if result.is_err() {
                prop_assert_eq!(&app, &before, "rejected {:?} mutated state", op);
            }

            if let (Op::Declare(w, _), Ok(_)) = (op, &result) {
                let declared = window_name(*w);
                if before.window(&declared).is_none() {
                    let window = app.window(&declared).expect("declared window");
                    if window.mtabs.is_empty() {
                        awaiting_tabs.insert(declared);
                    } else {
                        let active = window.mtabs.iter().filter(|t| t.active).count();
                        prop_assert_eq!(active, 1, "declared window {} focus", window.id);
                    }
                }
            }
            awaiting_tabs.retain(|id| app.window(id).is_some_and(|w| w.mtabs.is_empty()));
            check_invariants(&app, &awaiting_tabs)?;
            history.push(app.clone());

            if matches!(op, Op::Group(..) | Op::Ungroup(..) | Op::ActivateTab(..) | Op::Raise(..)) {
                prop_assert_eq!(sorted_tabs(&app), sorted_tabs(&before), "{:?} changed the tab set", op);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Raising a window yields a contiguous stack with the target on top
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bring_to_front_yields_contiguous_stack(
        zs in prop::collection::vec(1u32..50, 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut app = zs.iter().enumerate().fold(DockApp::default(), |app, (idx, z)| {
            app.with_window(
                MWindow::declarative(WindowId::new(format!("w{idx}")), Bounds::default())
                    .with_z_index(*z)
                    .with_tab(MTab::new(format!("t{idx}"), "tab")),
            )
        });
        let target = app.mwindows[pick.index(zs.len())].id.clone();
        let ids = SequentialIds::new("split-");

        reduce_dock(&mut app, &ids, DockAction::BringToFront { window_id: target.clone() })
            .expect("target exists");

        prop_assert!(is_contiguous_stack(&app));
        prop_assert_eq!(app.z_index_of(&target), zs.len() as u32);
        prop_assert_eq!(app.active_window_id.as_ref(), Some(&target));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Sanitize is idempotent and removes tombstones and duplicates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sanitize_is_idempotent(app in arbitrary_app()) {
        let once = sanitize(app);
        prop_assert_eq!(sanitize(once.clone()), once);
    }

    #[test]
    fn sanitize_removes_tombstones_and_duplicates(app in arbitrary_app()) {
        let clean = sanitize(app);
        for window in &clean.mwindows {
            prop_assert!(!clean.removed_window_ids.contains(&window.id));
            prop_assert!(!window.mtabs.is_empty());
        }
        let tabs = clean.tab_ids();
        prop_assert_eq!(tabs.iter().collect::<HashSet<_>>().len(), tabs.len());
        match &clean.active_window_id {
            Some(active) => prop_assert!(clean.window(active).is_some()),
            None => prop_assert!(clean.mwindows.is_empty()),
        }
    }
}
