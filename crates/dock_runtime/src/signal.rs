//! Leptos bridge exposing the dock store as a reactive signal.

use leptos::{create_rw_signal, RwSignal, SignalSet};

use crate::{
    model::DockApp,
    store::{DockStore, Subscription},
};

/// Mirrors every published snapshot of `store` into a Leptos signal for reactive views.
///
/// Views read the signal; mutations still go through the store so they are persisted. Call
/// [`Subscription::unsubscribe`] when the owning view is disposed.
pub fn bind_app_signal(store: &DockStore) -> (RwSignal<DockApp>, Subscription) {
    let signal = create_rw_signal(store.snapshot());
    let subscription = store.subscribe(move |app| signal.set(app.clone()));
    (signal, subscription)
}
