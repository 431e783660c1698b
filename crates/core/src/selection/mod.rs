//! Selection state: the single source of truth for the active place.
//!
//! The map view and detail panel subscribe independently; updates replace
//! the whole value through a watch channel, so a consumer can never observe
//! a torn selection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::place::Place;

/// The fixed fallback location used by [`SelectionState::bootstrap`].
pub fn default_place() -> Place {
    Place {
        id: "default-london".to_string(),
        label: "London".to_string(),
        full_label: Some("London, United Kingdom".to_string()),
        latitude: Some(51.5074),
        longitude: Some(-0.1278),
        country: Some("United Kingdom".to_string()),
    }
}

/// Shared handle to the current selection.
///
/// Cheaply cloneable. There is no history: only the latest selection is
/// retained. `None` means "no selection yet", which is distinct from an
/// empty search.
#[derive(Clone)]
pub struct SelectionState {
    inner: Arc<Inner>,
}

struct Inner {
    tx: watch::Sender<Option<Place>>,
    bootstrapped: AtomicBool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                tx,
                bootstrapped: AtomicBool::new(false),
            }),
        }
    }

    /// Replace the current selection.
    ///
    /// All subscribers observe the new value as a whole.
    pub fn select(&self, place: Place) {
        debug!("Selection changed: {}", place.display_name());
        self.inner.tx.send_replace(Some(place));
    }

    /// Seed the session with the default place.
    ///
    /// Runs at most once per session and never overrides an existing
    /// selection; re-invoking it is a no-op either way.
    pub fn bootstrap(&self) {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.current().is_some() {
            return;
        }
        self.select(default_place());
    }

    /// Snapshot of the current selection.
    pub fn current(&self) -> Option<Place> {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to selection changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Place>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_initial_selection_is_none() {
        let selection = SelectionState::new();
        assert!(selection.current().is_none());
    }

    #[test]
    fn test_bootstrap_sets_default_place() {
        let selection = SelectionState::new();
        selection.bootstrap();

        let place = selection.current().expect("Bootstrap should select");
        assert_eq!(place.label, "London");
        assert_eq!(place.country.as_deref(), Some("United Kingdom"));
        assert_eq!(place.latitude, Some(51.5074));
        assert_eq!(place.longitude, Some(-0.1278));
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let selection = SelectionState::new();
        selection.bootstrap();
        selection.select(fixtures::paris());

        selection.bootstrap();
        assert_eq!(selection.current().unwrap().label, "Paris");
    }

    #[test]
    fn test_bootstrap_never_overrides_existing_selection() {
        let selection = SelectionState::new();
        selection.select(fixtures::paris());

        selection.bootstrap();
        assert_eq!(selection.current().unwrap().label, "Paris");
    }

    #[test]
    fn test_select_replaces_whole_value() {
        let selection = SelectionState::new();
        selection.select(fixtures::london());
        selection.select(fixtures::paris());

        assert_eq!(selection.current().unwrap().label, "Paris");
    }

    #[test]
    fn test_incomplete_place_is_a_valid_selection() {
        let selection = SelectionState::new();
        selection.select(fixtures::incomplete_place("Atlantis"));

        let place = selection.current().unwrap();
        assert!(place.coordinates().is_none());
    }

    #[tokio::test]
    async fn test_independent_subscribers_observe_changes() {
        let selection = SelectionState::new();
        let mut map_view = selection.subscribe();
        let mut detail_panel = selection.subscribe();

        selection.select(fixtures::paris());

        map_view.changed().await.unwrap();
        detail_panel.changed().await.unwrap();
        assert_eq!(map_view.borrow().as_ref().unwrap().label, "Paris");
        assert_eq!(detail_panel.borrow().as_ref().unwrap().label, "Paris");
    }

    #[test]
    fn test_cloned_handles_share_state() {
        let selection = SelectionState::new();
        let other = selection.clone();

        other.select(fixtures::london());
        assert_eq!(selection.current().unwrap().label, "London");
    }
}
