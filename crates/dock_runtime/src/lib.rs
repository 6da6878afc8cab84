//! Window/tab docking state core.
//!
//! Tracks floating windows that each own an ordered strip of tabs, and the drag-driven
//! restructuring between them: grouping one window into another, splitting a tab out into a new
//! window, raising windows, and activating tabs. State is persisted through the host storage port
//! and reconciled against the layout the application declares on every boot.

pub mod host;
pub mod model;
pub mod options;
pub mod persistence;
pub mod reducer;
pub mod sanitize;
#[cfg(feature = "leptos")]
pub mod signal;
pub mod store;
pub mod window_manager;

pub use host::DockHostContext;
pub use model::*;
pub use options::DockOptions;
pub use persistence::{clear_snapshot, load_boot_snapshot, persist_snapshot, DOCK_STATE_KEY};
pub use reducer::{reduce_dock, DockAction, DockEffect, ReducerError};
pub use sanitize::sanitize;
#[cfg(feature = "leptos")]
pub use signal::bind_app_signal;
pub use store::{DockStore, Subscription};
