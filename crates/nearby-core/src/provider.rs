//! Seams between the search orchestrator and the outside world.
//!
//! Implementations are expected to normalize their own failures into
//! [`NearbyError`] and to enforce their own request timeouts; an expired
//! timeout should surface as [`NearbyError::Network`].

use async_trait::async_trait;

use crate::error::NearbyError;
use crate::types::{Category, Coordinates, NearbyQuery, PlaceRecord};

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Places within `query.radius_meters` of `query.origin`, optionally
    /// constrained by category token and free-text keyword.
    ///
    /// An empty list is a successful answer, not an error.
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<PlaceRecord>, NearbyError>;

    async fn get_details(&self, place_id: &str) -> Result<PlaceRecord, NearbyError>;

    async fn list_categories(&self) -> Result<Vec<Category>, NearbyError>;
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Current device position, prompting for permission if needed.
    ///
    /// Fails with [`NearbyError::PermissionDenied`] or
    /// [`NearbyError::LocationUnavailable`].
    async fn current_location(&self) -> Result<Coordinates, NearbyError>;
}
