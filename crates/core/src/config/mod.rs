//! Configuration for the external providers.
//!
//! Provider credentials are explicit configuration injected into the
//! clients at construction, never ambient globals read at call time. A
//! missing key is a configuration error surfaced to the user once, before
//! any network call.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::{Config, GeocoderBackend, GeocoderConfig};
pub use validate::validate_config;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Missing API key for {0}")]
    MissingKey(&'static str),

    #[error("Failed to initialize {provider}: {message}")]
    ProviderInit {
        provider: &'static str,
        message: String,
    },
}
