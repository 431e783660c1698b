//! Detail panel coordination: weather and photos for the selected place.
//!
//! The two fetches are fully independent: each has its own loading/error
//! cycle and they may complete in any order. What is coordinated is
//! staleness: every selection change bumps an epoch, and a fetch applies
//! its result only if its epoch is still current when it completes. The
//! underlying request is not aborted, only its effect suppressed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::metrics;
use crate::notify::{Notice, NotificationHandle};
use crate::photos::{Photo, PhotoProvider};
use crate::place::Place;
use crate::selection::SelectionState;
use crate::weather::{CurrentWeather, WeatherProvider};

/// State of one independent fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing selected yet.
    Idle,
    Loading,
    Ready(T),
    Failed(String),
    /// The selection lacks the data this fetch needs (e.g. coordinates
    /// for weather). Shown as an explanatory state, never an error.
    Unavailable,
}

/// Drives the weather and photo views for the current selection.
pub struct DetailPanel {
    inner: Arc<Inner>,
}

struct Inner {
    weather: Arc<dyn WeatherProvider>,
    photos: Arc<dyn PhotoProvider>,
    notices: NotificationHandle,
    weather_state: watch::Sender<FetchState<CurrentWeather>>,
    photo_state: watch::Sender<FetchState<Vec<Photo>>>,
    /// Selection epoch. Bumped on every selection change; a fetch result
    /// is applied only if the epoch it was started under is still current.
    epoch: AtomicU64,
}

impl DetailPanel {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        photos: Arc<dyn PhotoProvider>,
        notices: NotificationHandle,
    ) -> Self {
        let (weather_state, _) = watch::channel(FetchState::Idle);
        let (photo_state, _) = watch::channel(FetchState::Idle);
        Self {
            inner: Arc::new(Inner {
                weather,
                photos,
                notices,
                weather_state,
                photo_state,
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// React to a selection change: start one weather fetch and one photo
    /// fetch for the place.
    ///
    /// A place without coordinates gets `Unavailable` weather with no
    /// provider call; photos only need the place name and proceed either
    /// way.
    pub fn show_place(&self, place: &Place) {
        let inner = &self.inner;
        let epoch = inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Detail panel showing '{}'", place.display_name());

        match place.coordinates() {
            Some(coords) => {
                inner.weather_state.send_replace(FetchState::Loading);
                let task_inner = Arc::clone(inner);
                tokio::spawn(async move {
                    Inner::fetch_weather(task_inner, epoch, coords.lat, coords.lon).await;
                });
            }
            None => {
                inner.weather_state.send_replace(FetchState::Unavailable);
            }
        }

        inner.photo_state.send_replace(FetchState::Loading);
        let task_inner = Arc::clone(inner);
        let place_name = place.label.clone();
        tokio::spawn(async move {
            Inner::fetch_photos(task_inner, epoch, place_name).await;
        });
    }

    /// Return both views to `Idle` (no selection).
    pub fn reset(&self) {
        let inner = &self.inner;
        inner.epoch.fetch_add(1, Ordering::SeqCst);
        inner.weather_state.send_replace(FetchState::Idle);
        inner.photo_state.send_replace(FetchState::Idle);
    }

    /// Spawn the glue task that re-renders the panel on every selection
    /// change.
    pub fn watch_selection(&self, selection: &SelectionState) -> JoinHandle<()> {
        let panel = Self {
            inner: Arc::clone(&self.inner),
        };
        let mut rx = selection.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.borrow_and_update().clone() {
                    Some(place) => panel.show_place(&place),
                    None => panel.reset(),
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Current weather view state.
    pub fn weather_state(&self) -> FetchState<CurrentWeather> {
        self.inner.weather_state.borrow().clone()
    }

    /// Current photo view state.
    pub fn photo_state(&self) -> FetchState<Vec<Photo>> {
        self.inner.photo_state.borrow().clone()
    }

    /// Subscribe to weather view changes.
    pub fn subscribe_weather(&self) -> watch::Receiver<FetchState<CurrentWeather>> {
        self.inner.weather_state.subscribe()
    }

    /// Subscribe to photo view changes.
    pub fn subscribe_photos(&self) -> watch::Receiver<FetchState<Vec<Photo>>> {
        self.inner.photo_state.subscribe()
    }
}

impl Inner {
    async fn fetch_weather(inner: Arc<Inner>, epoch: u64, lat: f64, lon: f64) {
        let result = inner.weather.current_weather(lat, lon).await;

        if inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Dropping weather result for a superseded selection");
            metrics::record_stale_response("weather");
            return;
        }

        match result {
            Ok(weather) => {
                inner.weather_state.send_replace(FetchState::Ready(weather));
            }
            Err(err) => {
                warn!("Weather fetch failed: {}", err);
                inner
                    .weather_state
                    .send_replace(FetchState::Failed(err.to_string()));
                inner
                    .notices
                    .try_emit(Notice::error(format!("Weather unavailable: {}", err)));
            }
        }
    }

    async fn fetch_photos(inner: Arc<Inner>, epoch: u64, place_name: String) {
        let result = inner.photos.search_photos(&place_name).await;

        if inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Dropping photo results for a superseded selection");
            metrics::record_stale_response("photos");
            return;
        }

        match result {
            Ok(photos) => {
                // An empty photo list is a valid Ready state.
                inner.photo_state.send_replace(FetchState::Ready(photos));
            }
            Err(err) => {
                warn!("Photo search failed: {}", err);
                inner
                    .photo_state
                    .send_replace(FetchState::Failed(err.to_string()));
                inner
                    .notices
                    .try_emit(Notice::error(format!("Photos unavailable: {}", err)));
            }
        }
    }
}
