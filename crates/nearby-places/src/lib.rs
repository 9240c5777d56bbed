//! HTTP clients for nearby-place data.
//!
//! [`PlacesClient`] talks to the places proxy and is what the mobile-side
//! orchestrator uses. [`GooglePlacesClient`] talks to the upstream Google
//! Places web service and is used by the proxy itself.

pub mod client;
pub mod error;
pub mod google;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use google::{upstream_message, GooglePlacesClient};
pub use types::{DataResponse, ErrorResponse, HealthResponse, NearbyResponse};
