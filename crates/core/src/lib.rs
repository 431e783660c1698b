pub mod config;
pub mod detail;
pub mod geocoder;
pub mod metrics;
pub mod notify;
pub mod photos;
pub mod place;
pub mod search;
pub mod selection;
pub mod session;
pub mod testing;
pub mod weather;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GeocoderBackend,
};
pub use detail::{DetailPanel, FetchState};
pub use geocoder::{GeocodeError, Geocoder, MapboxGeocoder, NominatimGeocoder};
pub use notify::{Notice, NoticeLevel, NotificationHandle};
pub use photos::{Photo, PhotoError, PhotoProvider, UnsplashProvider};
pub use place::{Coordinates, Place};
pub use search::{QueryController, QueryOptions, QueryPhase, QuerySnapshot};
pub use selection::{default_place, SelectionState};
pub use session::ExploreSession;
pub use weather::{CurrentWeather, OpenWeatherProvider, WeatherError, WeatherProvider};
