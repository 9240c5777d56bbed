//! Wire envelopes of the places proxy API.
//!
//! The server serializes these; [`crate::PlacesClient`] deserializes them.

use nearby_core::{LatLng, PlaceRecord};
use serde::{Deserialize, Serialize};

/// `GET /places/nearby` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub success: bool,
    pub data: Vec<PlaceRecord>,
    pub count: usize,
    pub location: LatLng,
    pub radius: u32,
}

/// `{ "success": true, "data": ... }` body used by details and categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure body: `{ "success": false, "error": .., "message": .. }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            message,
            path: None,
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}
