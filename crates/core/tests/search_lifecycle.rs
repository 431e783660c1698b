//! Query controller lifecycle integration tests.
//!
//! These tests run under a paused tokio clock: debounce windows and mock
//! latencies resolve deterministically, so request ordering and staleness
//! can be asserted exactly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use wayfarer_core::{
    testing::{fixtures, MockGeocoder},
    GeocodeError, Geocoder, Notice, NoticeLevel, NotificationHandle, QueryController,
    QueryOptions, QueryPhase, SelectionState,
};

/// Long enough for the default 300ms debounce window to elapse.
const SETTLE: Duration = Duration::from_millis(400);

/// Test helper wiring a controller to a mock geocoder.
struct TestHarness {
    geocoder: Arc<MockGeocoder>,
    selection: SelectionState,
    controller: QueryController,
    notice_rx: mpsc::Receiver<Notice>,
}

impl TestHarness {
    fn new() -> Self {
        let geocoder = Arc::new(MockGeocoder::new());
        let selection = SelectionState::new();
        let (notices, notice_rx) = NotificationHandle::channel(16);
        let controller = QueryController::new(
            Arc::clone(&geocoder) as Arc<dyn Geocoder>,
            selection.clone(),
            notices,
            QueryOptions::default(),
        );
        Self {
            geocoder,
            selection,
            controller,
            notice_rx,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_keystrokes_coalesce_into_one_request() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::london()]).await;

    for text in ["L", "Lo", "Lon", "Lond", "London"] {
        harness.controller.on_input_change(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(SETTLE).await;

    let queries = harness.geocoder.recorded_queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query, "London");

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase, QueryPhase::Ready);
    assert_eq!(snapshot.candidates[0].label, "London");
    assert!(snapshot.dropdown_visible());
}

#[tokio::test(start_paused = true)]
async fn test_last_issued_request_wins_regardless_of_arrival_order() {
    let harness = TestHarness::new();
    harness
        .geocoder
        .set_query_handler(|query| match query {
            "Lon" => Some(vec![fixtures::place("stale", "Lonfield", 1.0, 1.0)]),
            "London" => Some(vec![fixtures::london()]),
            _ => Some(vec![]),
        })
        .await;
    harness
        .geocoder
        .set_delay("Lon", Duration::from_secs(5))
        .await;
    harness
        .geocoder
        .set_delay("London", Duration::from_millis(50))
        .await;

    harness.controller.on_input_change("Lon");
    tokio::time::sleep(SETTLE).await; // "Lon" request now in flight, slow

    harness.controller.on_input_change("London");
    tokio::time::sleep(SETTLE).await; // "London" issued after it, resolved first

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase, QueryPhase::Ready);
    assert_eq!(snapshot.candidates.len(), 1);
    assert_eq!(snapshot.candidates[0].label, "London");

    // The slow first response finally arrives and must be discarded.
    tokio::time::sleep(Duration::from_secs(6)).await;
    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.candidates.len(), 1);
    assert_eq!(snapshot.candidates[0].label, "London");
    assert_eq!(harness.geocoder.query_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_in_flight_response() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::paris()]).await;
    harness
        .geocoder
        .set_delay("Paris", Duration::from_millis(500))
        .await;

    harness.controller.on_input_change("Paris");
    tokio::time::sleep(SETTLE).await; // request issued, still in flight

    harness.controller.clear();
    tokio::time::sleep(Duration::from_secs(1)).await; // response arrives too late

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.term, "");
    assert!(snapshot.candidates.is_empty());
    assert_eq!(snapshot.phase, QueryPhase::Idle);
    assert_eq!(harness.geocoder.query_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_issues_no_request() {
    let harness = TestHarness::new();

    harness.controller.on_input_change("   ");
    tokio::time::sleep(SETTLE).await;

    assert_eq!(harness.geocoder.query_count().await, 0);
    assert_eq!(harness.controller.snapshot().phase, QueryPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_provider_failure_sets_failed_phase_and_emits_notice() {
    let mut harness = TestHarness::new();
    harness
        .geocoder
        .set_next_error(GeocodeError::RateLimited)
        .await;

    harness.controller.on_input_change("Tokyo");
    tokio::time::sleep(SETTLE).await;

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase, QueryPhase::Failed);
    assert!(snapshot.candidates.is_empty());
    assert!(!snapshot.dropdown_visible());

    let notice = harness.notice_rx.try_recv().expect("expected a notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("search failed"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_results_are_ready_with_hidden_dropdown() {
    let harness = TestHarness::new();

    harness.controller.on_input_change("zzzz");
    tokio::time::sleep(SETTLE).await;

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.phase, QueryPhase::Ready);
    assert!(snapshot.candidates.is_empty());
    assert!(!snapshot.dropdown_visible());
}

#[tokio::test(start_paused = true)]
async fn test_candidates_are_capped() {
    let harness = TestHarness::new();
    let many: Vec<_> = (0..8)
        .map(|i| fixtures::place(&format!("p{}", i), &format!("Springfield {}", i), 40.0, -90.0))
        .collect();
    harness.geocoder.set_results(many).await;

    harness.controller.on_input_change("Springfield");
    tokio::time::sleep(SETTLE).await;

    assert_eq!(harness.controller.snapshot().candidates.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_select_candidate_publishes_selection_and_closes_dropdown() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::london()]).await;

    harness.controller.on_input_change("Lond");
    tokio::time::sleep(SETTLE).await;

    let candidate = harness.controller.snapshot().candidates[0].clone();
    harness.controller.select_candidate(candidate);

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.term, "London, United Kingdom");
    assert!(snapshot.candidates.is_empty());
    assert!(!snapshot.dropdown_visible());

    let selected = harness.selection.current().expect("selection missing");
    assert_eq!(selected.id, "test-london");
}

#[tokio::test(start_paused = true)]
async fn test_response_arriving_after_selection_is_discarded() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::paris()]).await;
    harness
        .geocoder
        .set_delay("Paris", Duration::from_millis(500))
        .await;

    harness.controller.on_input_change("Paris");
    tokio::time::sleep(SETTLE).await; // request in flight

    harness.controller.select_candidate(fixtures::london());
    tokio::time::sleep(Duration::from_secs(1)).await; // stale response lands

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.term, "London, United Kingdom");
    assert!(snapshot.candidates.is_empty());
    assert_eq!(
        harness.selection.current().expect("selection missing").label,
        "London"
    );
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_keeps_term_but_closes_dropdown() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::paris()]).await;

    harness.controller.on_input_change("Paris");
    tokio::time::sleep(SETTLE).await;
    assert!(harness.controller.snapshot().dropdown_visible());

    harness.controller.dismiss();

    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.term, "Paris");
    assert!(snapshot.candidates.is_empty());
    assert!(!snapshot.dropdown_visible());
}

#[tokio::test(start_paused = true)]
async fn test_sync_term_never_issues_a_request() {
    let harness = TestHarness::new();

    harness.controller.sync_term("Rome");
    tokio::time::sleep(SETTLE).await;

    assert_eq!(harness.geocoder.query_count().await, 0);
    let snapshot = harness.controller.snapshot();
    assert_eq!(snapshot.term, "Rome");
    assert_eq!(snapshot.phase, QueryPhase::Idle);
}
