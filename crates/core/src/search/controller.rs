//! The debounced query controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::{QueryOptions, QueryPhase, QuerySnapshot};
use crate::geocoder::Geocoder;
use crate::metrics;
use crate::notify::{Notice, NotificationHandle};
use crate::place::Place;
use crate::selection::SelectionState;

/// Converts raw keystrokes into a low-churn stream of geocode requests.
///
/// At most one request is scheduled per quiescence window; each request is
/// tagged with a monotonically increasing sequence number at issue time and
/// a response is applied only if its number is still the highest issued.
/// Arrival order is irrelevant: last issued wins.
///
/// Provider failures never escape the controller; they collapse into the
/// `Failed` phase plus a [`Notice`] on the side channel.
///
/// Methods are synchronous (a keystroke handler cannot await) but the
/// controller must live inside a tokio runtime, since the debounce timer
/// and requests run as spawned tasks.
pub struct QueryController {
    inner: Arc<Inner>,
}

struct Inner {
    geocoder: Arc<dyn Geocoder>,
    selection: SelectionState,
    notices: NotificationHandle,
    options: QueryOptions,
    snapshot: watch::Sender<QuerySnapshot>,
    /// Highest request sequence number issued so far. Bumped at issue time
    /// and by clear/blank/select so that in-flight responses turn stale.
    issued: AtomicU64,
    /// Pending debounce timer, replaced on every keystroke.
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl QueryController {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        selection: SelectionState,
        notices: NotificationHandle,
        options: QueryOptions,
    ) -> Self {
        let (snapshot, _rx) = watch::channel(QuerySnapshot::new(String::new()));
        Self {
            inner: Arc::new(Inner {
                geocoder,
                selection,
                notices,
                options,
                snapshot,
                issued: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Record a keystroke.
    ///
    /// The term updates synchronously so the textbox stays responsive.
    /// Blank input (after trimming) goes straight to `Idle` without any
    /// network activity; non-blank input shows `Pending` immediately and
    /// restarts the debounce timer, so only the final text value of a burst
    /// survives to trigger a request.
    pub fn on_input_change(&self, text: &str) {
        let inner = &self.inner;
        inner.cancel_timer();

        if text.trim().is_empty() {
            // No request for blank input; bump the sequence so anything
            // still in flight is stale on arrival.
            inner.issued.fetch_add(1, Ordering::SeqCst);
            inner.snapshot.send_modify(|s| {
                s.term = text.to_string();
                s.candidates.clear();
                s.phase = QueryPhase::Idle;
            });
            return;
        }

        inner.snapshot.send_modify(|s| {
            s.term = text.to_string();
            s.phase = QueryPhase::Pending;
        });

        let task_inner = Arc::clone(inner);
        let term = text.trim().to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(task_inner.options.debounce_window).await;
            // Detach the request from the timer: cancelling the timer must
            // not cancel a request that already left. A superseded request
            // keeps running and its response dies on the sequence check.
            tokio::spawn(Inner::run_search(task_inner, term));
        });
        *inner.timer.lock().expect("timer mutex poisoned") = Some(handle);
    }

    /// Select a candidate from the dropdown.
    ///
    /// Delegates to the selection state, then sets the term to the place's
    /// display name, clears the candidates and closes the dropdown in one
    /// snapshot update, with the selection already in place when it lands.
    pub fn select_candidate(&self, place: Place) {
        let inner = &self.inner;
        inner.cancel_timer();
        inner.issued.fetch_add(1, Ordering::SeqCst);
        inner.selection.select(place.clone());
        inner.snapshot.send_modify(|s| {
            s.term = place.display_name().to_string();
            s.candidates.clear();
            s.phase = QueryPhase::Idle;
        });
    }

    /// Reset to the empty state.
    ///
    /// The sequence bump guarantees a response arriving after the clear is
    /// discarded, no matter when its request was issued.
    pub fn clear(&self) {
        let inner = &self.inner;
        inner.cancel_timer();
        inner.issued.fetch_add(1, Ordering::SeqCst);
        inner.snapshot.send_modify(|s| {
            s.term.clear();
            s.candidates.clear();
            s.phase = QueryPhase::Idle;
        });
    }

    /// Close the dropdown without touching the term (focus left the
    /// search widget).
    pub fn dismiss(&self) {
        let inner = &self.inner;
        inner.cancel_timer();
        inner.issued.fetch_add(1, Ordering::SeqCst);
        inner.snapshot.send_modify(|s| {
            s.candidates.clear();
            s.phase = QueryPhase::Idle;
        });
    }

    /// Re-synchronize an externally supplied term.
    ///
    /// Updates the visible text only; never schedules a request. Seeding a
    /// default selection is the caller's job via
    /// [`SelectionState::bootstrap`], not the controller's.
    pub fn sync_term(&self, text: &str) {
        self.inner.snapshot.send_modify(|s| {
            s.term = text.to_string();
        });
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.inner.snapshot.subscribe()
    }
}

impl Inner {
    fn cancel_timer(&self) {
        if let Some(handle) = self.timer.lock().expect("timer mutex poisoned").take() {
            handle.abort();
        }
    }

    /// Issue one geocode request and apply the response unless it has been
    /// superseded by then.
    async fn run_search(inner: Arc<Inner>, term: String) {
        let seq = inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Issuing geocode request #{} for '{}'", seq, term);

        match inner.geocoder.search(&term).await {
            Ok(mut places) => {
                metrics::SEARCH_REQUESTS.with_label_values(&["ok"]).inc();
                if inner.issued.load(Ordering::SeqCst) != seq {
                    debug!("Discarding superseded response #{}", seq);
                    metrics::record_stale_response("search");
                    return;
                }
                places.truncate(inner.options.max_candidates);
                metrics::CANDIDATES_RETURNED.observe(places.len() as f64);
                inner.snapshot.send_modify(|s| {
                    s.candidates = places;
                    s.phase = QueryPhase::Ready;
                });
            }
            Err(err) => {
                metrics::SEARCH_REQUESTS.with_label_values(&["error"]).inc();
                if inner.issued.load(Ordering::SeqCst) != seq {
                    metrics::record_stale_response("search");
                    return;
                }
                warn!("Geocode request #{} failed: {}", seq, err);
                inner.snapshot.send_modify(|s| {
                    s.candidates.clear();
                    s.phase = QueryPhase::Failed;
                });
                inner
                    .notices
                    .try_emit(Notice::error(format!("Place search failed: {}", err)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGeocoder;

    fn controller() -> (QueryController, SelectionState) {
        let selection = SelectionState::new();
        let (notices, _rx) = NotificationHandle::channel(16);
        let controller = QueryController::new(
            Arc::new(MockGeocoder::new()),
            selection.clone(),
            notices,
            QueryOptions::default(),
        );
        (controller, selection)
    }

    #[tokio::test]
    async fn test_initial_snapshot() {
        let (controller, _) = controller();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.term, "");
        assert!(snapshot.candidates.is_empty());
        assert_eq!(snapshot.phase, QueryPhase::Idle);
        assert!(!snapshot.dropdown_visible());
    }

    #[tokio::test]
    async fn test_keystroke_shows_pending_immediately() {
        let (controller, _) = controller();
        controller.on_input_change("Par");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.term, "Par");
        assert_eq!(snapshot.phase, QueryPhase::Pending);
        assert!(snapshot.dropdown_visible());
    }

    #[tokio::test]
    async fn test_whitespace_input_is_blank() {
        let (controller, _) = controller();
        controller.on_input_change("   ");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.term, "   ");
        assert_eq!(snapshot.phase, QueryPhase::Idle);
    }

    #[tokio::test]
    async fn test_sync_term_does_not_change_phase() {
        let (controller, _) = controller();
        controller.sync_term("London, United Kingdom");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.term, "London, United Kingdom");
        assert_eq!(snapshot.phase, QueryPhase::Idle);
    }
}
