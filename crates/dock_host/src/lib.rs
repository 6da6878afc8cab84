//! Typed host-port contracts used by the dock runtime.
//!
//! This crate is the boundary between the window/tab state core and its environment. It exposes
//! the snapshot storage port with in-memory, no-op, and browser `localStorage` adapters, the id
//! generator used for dynamically split windows, and the tab node-portal registry that physically
//! relocates rendered tab content when logical ownership changes.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod ids;
pub mod portal;
pub mod storage;

pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use portal::{NoopTabPortal, TabNodeRegistry, TabPlacement, TabPortal};
pub use storage::{
    load_snapshot_with, save_snapshot_with, MemorySnapshotStorage, NoopSnapshotStorage,
    SnapshotStorage, StorageError, WebSnapshotStorage,
};
