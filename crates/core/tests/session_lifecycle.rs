//! End-to-end session tests: search box, selection and detail panel wired
//! together, driven under a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use wayfarer_core::{
    testing::{fixtures, MockGeocoder, MockPhotoProvider, MockWeatherProvider},
    ExploreSession, FetchState, Geocoder, Notice, PhotoProvider, QueryOptions, QueryPhase,
    WeatherError, WeatherProvider,
};

/// Test helper wiring a full session to mock providers.
struct TestHarness {
    geocoder: Arc<MockGeocoder>,
    weather: Arc<MockWeatherProvider>,
    photos: Arc<MockPhotoProvider>,
    session: ExploreSession,
    _notice_rx: mpsc::Receiver<Notice>,
}

impl TestHarness {
    fn new() -> Self {
        let geocoder = Arc::new(MockGeocoder::new());
        let weather = Arc::new(MockWeatherProvider::new());
        let photos = Arc::new(MockPhotoProvider::new());
        let (session, notice_rx) = ExploreSession::new(
            Arc::clone(&geocoder) as Arc<dyn Geocoder>,
            Arc::clone(&weather) as Arc<dyn WeatherProvider>,
            Arc::clone(&photos) as Arc<dyn PhotoProvider>,
            QueryOptions::default(),
        );
        Self {
            geocoder,
            weather,
            photos,
            session,
            _notice_rx: notice_rx,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_seeds_default_place_without_searching() {
    let harness = TestHarness::new();
    harness.session.bootstrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let selected = harness.session.selection.current().expect("no selection");
    assert_eq!(selected.label, "London");
    assert_eq!(selected.country.as_deref(), Some("United Kingdom"));

    // The detail panel reacted to the seeded selection.
    assert!(matches!(
        harness.session.details.weather_state(),
        FetchState::Ready(_)
    ));
    assert!(matches!(
        harness.session.details.photo_state(),
        FetchState::Ready(_)
    ));
    assert_eq!(
        harness.weather.recorded_calls().await,
        vec![(51.5074, -0.1278)]
    );

    // Seeding the selection never touches the geocoder.
    assert_eq!(harness.geocoder.query_count().await, 0);
    assert_eq!(harness.session.search.snapshot().term, "");
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_is_a_noop_after_explicit_selection() {
    let harness = TestHarness::new();
    harness.session.selection.select(fixtures::paris());

    harness.session.bootstrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let selected = harness.session.selection.current().expect("no selection");
    assert_eq!(selected.label, "Paris");
}

#[tokio::test(start_paused = true)]
async fn test_search_select_and_detail_flow() {
    let harness = TestHarness::new();
    harness.geocoder.set_results(vec![fixtures::paris()]).await;
    harness.weather.set_delay(Duration::from_millis(200)).await;
    harness.session.bootstrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Three quick keystrokes collapse into a single request.
    harness.session.search.on_input_change("P");
    harness.session.search.on_input_change("Pa");
    harness.session.search.on_input_change("Paris");
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(harness.geocoder.query_count().await, 1);
    let snapshot = harness.session.search.snapshot();
    assert_eq!(snapshot.phase, QueryPhase::Ready);
    let candidate = snapshot.candidates[0].clone();

    harness.session.search.select_candidate(candidate);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = harness.session.search.snapshot();
    assert_eq!(snapshot.term, "Paris, Île-de-France, France");
    assert!(!snapshot.dropdown_visible());
    assert_eq!(
        harness.session.selection.current().expect("no selection").label,
        "Paris"
    );

    // Weather is still loading behind the mock latency; photos resolve
    // independently.
    assert_eq!(harness.session.details.weather_state(), FetchState::Loading);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(
        harness.session.details.weather_state(),
        FetchState::Ready(_)
    ));
    assert!(matches!(
        harness.session.details.photo_state(),
        FetchState::Ready(_)
    ));
    assert_eq!(
        harness.photos.recorded_queries().await.last().map(String::as_str),
        Some("Paris")
    );
}

#[tokio::test(start_paused = true)]
async fn test_place_without_coordinates_skips_weather_only() {
    let harness = TestHarness::new();
    harness
        .session
        .selection
        .select(fixtures::incomplete_place("Atlantis"));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        harness.session.details.weather_state(),
        FetchState::Unavailable
    );
    assert!(harness.weather.recorded_calls().await.is_empty());

    // Photos only need the name and still resolve.
    assert!(matches!(
        harness.session.details.photo_state(),
        FetchState::Ready(_)
    ));
    assert_eq!(harness.photos.recorded_queries().await, vec!["Atlantis"]);
}

#[tokio::test(start_paused = true)]
async fn test_selection_switch_drops_stale_detail_results() {
    let harness = TestHarness::new();
    harness.weather.set_delay(Duration::from_millis(500)).await;
    // The first (London) weather call fails; if staleness were broken the
    // failure would surface as the final state.
    harness.weather.set_next_error(WeatherError::RateLimited).await;

    harness.session.selection.select(fixtures::london());
    tokio::time::sleep(Duration::from_millis(10)).await;
    harness.session.selection.select(fixtures::paris());
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(matches!(
        harness.session.details.weather_state(),
        FetchState::Ready(_)
    ));
    assert_eq!(harness.weather.recorded_calls().await.len(), 2);
}
