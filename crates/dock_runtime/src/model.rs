use std::fmt;

use serde::{Deserialize, Serialize};

/// Constant id of the [`DockApp`] root.
pub const APP_ROOT_ID: &str = "app-root";
pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&WindowId> for WindowId {
    fn from(id: &WindowId) -> Self {
        id.clone()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TabId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&TabId> for TabId {
    fn from(id: &TabId) -> Self {
        id.clone()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamps the size into `limits`, keeping the position.
    pub fn clamped_to(self, limits: &BoundsLimits) -> Self {
        let clamp = |value: i32, min: Option<i32>, max: Option<i32>| {
            let value = max.map_or(value, |max| value.min(max));
            min.map_or(value, |min| value.max(min))
        };
        Self {
            width: clamp(self.width, limits.min_width, limits.max_width),
            height: clamp(self.height, limits.min_height, limits.max_height),
            ..self
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<i32>,
}

/// A unit of content owned by exactly one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MTab {
    pub id: TabId,
    pub title: String,
    pub visible: bool,
    pub active: bool,
}

impl MTab {
    /// Creates a visible, inactive tab.
    pub fn new(id: impl Into<TabId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            visible: true,
            active: false,
        }
    }

    pub fn activated(self) -> Self {
        Self {
            active: true,
            ..self
        }
    }
}

/// A floating container holding an ordered strip of tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MWindow {
    pub id: WindowId,
    pub movable: bool,
    pub resizable: bool,
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_limits: Option<BoundsLimits>,
    pub z_index: u32,
    #[serde(default)]
    pub is_declarative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_header_visible: Option<bool>,
    #[serde(default)]
    pub mtabs: Vec<MTab>,
}

impl MWindow {
    /// Creates an empty, movable and resizable window declared by application configuration.
    pub fn declarative(id: impl Into<WindowId>, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            movable: true,
            resizable: true,
            bounds,
            bounds_limits: None,
            z_index: 1,
            is_declarative: true,
            is_header_visible: None,
            mtabs: Vec::new(),
        }
    }

    pub fn with_tab(mut self, tab: MTab) -> Self {
        self.mtabs.push(tab);
        self
    }

    pub fn with_limits(mut self, limits: BoundsLimits) -> Self {
        self.bounds_limits = Some(limits);
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn tab(&self, tab_id: &TabId) -> Option<&MTab> {
        self.mtabs.iter().find(|t| &t.id == tab_id)
    }

    pub fn has_tab(&self, tab_id: &TabId) -> bool {
        self.tab(tab_id).is_some()
    }

    pub fn active_tab(&self) -> Option<&MTab> {
        self.mtabs.iter().find(|t| t.active)
    }
}

/// Optional field overrides applied by `updateWindow`.
///
/// Ids and tab strips are deliberately absent: tabs only move through grouping and ungrouping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPatch {
    #[serde(default)]
    pub movable: Option<bool>,
    #[serde(default)]
    pub resizable: Option<bool>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
    /// `Some(None)` clears the limits.
    #[serde(default)]
    pub bounds_limits: Option<Option<BoundsLimits>>,
    #[serde(default)]
    pub z_index: Option<u32>,
    #[serde(default)]
    pub is_declarative: Option<bool>,
    /// `Some(None)` clears the flag.
    #[serde(default)]
    pub is_header_visible: Option<Option<bool>>,
}

impl WindowPatch {
    pub fn bounds(bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, window: &mut MWindow) {
        if let Some(movable) = self.movable {
            window.movable = movable;
        }
        if let Some(resizable) = self.resizable {
            window.resizable = resizable;
        }
        if let Some(bounds) = self.bounds {
            window.bounds = bounds;
        }
        if let Some(bounds_limits) = self.bounds_limits {
            window.bounds_limits = bounds_limits;
        }
        if let Some(z_index) = self.z_index {
            window.z_index = z_index;
        }
        if let Some(is_declarative) = self.is_declarative {
            window.is_declarative = is_declarative;
        }
        if let Some(is_header_visible) = self.is_header_visible {
            window.is_header_visible = is_header_visible;
        }
    }
}

/// Root of the persisted dock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockApp {
    pub id: String,
    /// All windows in insertion order (not z-order).
    pub mwindows: Vec<MWindow>,
    pub active_window_id: Option<WindowId>,
    /// Declarative windows absorbed by grouping; never resurrected by registration.
    #[serde(default)]
    pub removed_window_ids: Vec<WindowId>,
}

impl Default for DockApp {
    fn default() -> Self {
        Self {
            id: APP_ROOT_ID.to_string(),
            mwindows: Vec::new(),
            active_window_id: None,
            removed_window_ids: Vec::new(),
        }
    }
}

impl DockApp {
    pub fn with_window(mut self, window: MWindow) -> Self {
        self.mwindows.push(window);
        self
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&MWindow> {
        self.mwindows.iter().find(|w| &w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: &WindowId) -> Option<&mut MWindow> {
        self.mwindows.iter_mut().find(|w| &w.id == window_id)
    }

    pub fn window_index(&self, window_id: &WindowId) -> Option<usize> {
        self.mwindows.iter().position(|w| &w.id == window_id)
    }

    /// Returns the window currently owning `tab_id`.
    pub fn tab_owner(&self, tab_id: &TabId) -> Option<&MWindow> {
        self.mwindows.iter().find(|w| w.has_tab(tab_id))
    }

    pub fn active_tab(&self, window_id: &WindowId) -> Option<&MTab> {
        self.window(window_id)?.active_tab()
    }

    /// Returns the window with the highest z-index; ties go to the later window.
    pub fn frontmost_window(&self) -> Option<&MWindow> {
        self.mwindows.iter().max_by_key(|w| w.z_index)
    }

    /// Returns the z-index of `window_id`, or `0` when the window is absent.
    pub fn z_index_of(&self, window_id: &WindowId) -> u32 {
        self.window(window_id).map(|w| w.z_index).unwrap_or(0)
    }

    pub fn is_tombstoned(&self, window_id: &WindowId) -> bool {
        self.removed_window_ids.contains(window_id)
    }

    pub fn tombstone(&mut self, window_id: WindowId) {
        if !self.is_tombstoned(&window_id) {
            self.removed_window_ids.push(window_id);
        }
    }

    /// All tab ids in window order, then strip order.
    pub fn tab_ids(&self) -> Vec<&TabId> {
        self.mwindows
            .iter()
            .flat_map(|w| w.mtabs.iter().map(|t| &t.id))
            .collect()
    }
}
