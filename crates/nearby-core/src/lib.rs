//! Shared domain model for the nearby-places workspace.
//!
//! Holds the place/category types exchanged between the proxy server, the
//! HTTP client, and the search orchestrator, together with the normalized
//! error taxonomy, the provider traits, and environment configuration.

pub mod app_config;
pub mod categories;
pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use categories::builtin_categories;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ErrorKind, NearbyError};
pub use provider::{GeolocationProvider, PlacesProvider};
pub use types::{Category, Coordinates, LatLng, NearbyQuery, PlaceRecord, SearchFilters};
