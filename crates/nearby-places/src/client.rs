//! HTTP client for the places proxy API.
//!
//! Wraps `reqwest` with envelope handling (`{ success, data }` /
//! `{ success: false, error, message }`), request timeouts, and typed
//! response deserialization. Implements [`PlacesProvider`] so the search
//! orchestrator can drive it directly.

use std::time::Duration;

use async_trait::async_trait;
use nearby_core::{Category, NearbyError, NearbyQuery, PlaceRecord, PlacesProvider};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::types::{DataResponse, ErrorResponse, NearbyResponse};

/// Client for the places proxy (`{API_URL}/places/...`).
///
/// Use [`PlacesClient::new`] with the configured API URL, or point it at a
/// wiremock server in tests.
pub struct PlacesClient {
    client: Client,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client for the proxy rooted at `base_url` (e.g.
    /// `http://localhost:3001/api`).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("nearby/0.1 (places-client)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(PlacesError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Searches for places around `query.origin`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::InvalidRequest`] if the origin is not a valid coordinate.
    /// - [`PlacesError::Api`] if the proxy answers with an error envelope.
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::Deserialize`] if the body does not match the contract.
    pub async fn nearby_places(
        &self,
        query: &NearbyQuery,
    ) -> Result<Vec<PlaceRecord>, PlacesError> {
        if !query.origin.is_valid() {
            return Err(PlacesError::InvalidRequest(
                "Latitude and longitude must be valid numbers".to_string(),
            ));
        }

        let mut url = self.endpoint(&["places", "nearby"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("lat", &query.origin.latitude.to_string());
            pairs.append_pair("lng", &query.origin.longitude.to_string());
            pairs.append_pair("radius", &query.radius_meters.to_string());
            if let Some(kind) = query.category.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("type", kind);
            }
            if let Some(keyword) = query.keyword.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("keyword", keyword);
            }
        }

        let body: NearbyResponse = self.get_json(url).await?;
        tracing::debug!(count = body.count, radius = body.radius, "nearby places fetched");
        Ok(body.data)
    }

    /// Fetches the full record for one place.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_places`]; an empty `place_id` is
    /// rejected with [`PlacesError::InvalidRequest`].
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceRecord, PlacesError> {
        if place_id.trim().is_empty() {
            return Err(PlacesError::InvalidRequest("Missing placeId".to_string()));
        }
        let url = self.endpoint(&["places", "details", place_id]);
        let body: DataResponse<PlaceRecord> = self.get_json(url).await?;
        Ok(body.data)
    }

    /// Fetches the category list served by the proxy.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_places`].
    pub async fn place_categories(&self) -> Result<Vec<Category>, PlacesError> {
        let url = self.endpoint(&["places", "categories"]);
        let body: DataResponse<Vec<Category>> = self.get_json(url).await?;
        Ok(body.data)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a GET request and decodes a success envelope into `T`.
    ///
    /// Non-2xx statuses and `"success": false` bodies both become
    /// [`PlacesError::Api`] carrying the proxy's `error` and `message`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let envelope: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(api_error(status, envelope));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: url.path().to_string(),
                source: e,
            })?;

        if value.get("success").and_then(serde_json::Value::as_bool) != Some(true) {
            let envelope: ErrorResponse = serde_json::from_value(value).unwrap_or_default();
            return Err(api_error(status, envelope));
        }

        serde_json::from_value(value).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

fn api_error(status: StatusCode, envelope: ErrorResponse) -> PlacesError {
    let default_message = if status == StatusCode::BAD_REQUEST {
        "Invalid request parameters"
    } else {
        "Failed to fetch places"
    };
    PlacesError::Api {
        http_status: status.as_u16(),
        code: envelope
            .error
            .unwrap_or_else(|| status.as_u16().to_string()),
        message: envelope
            .message
            .unwrap_or_else(|| default_message.to_string()),
    }
}

#[async_trait]
impl PlacesProvider for PlacesClient {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<PlaceRecord>, NearbyError> {
        self.nearby_places(query).await.map_err(|e| {
            tracing::warn!(error = %e, "nearby search failed");
            NearbyError::from(e)
        })
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceRecord, NearbyError> {
        self.place_details(place_id).await.map_err(|e| {
            tracing::warn!(place_id, error = %e, "place details failed");
            NearbyError::from(e)
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, NearbyError> {
        self.place_categories().await.map_err(|e| {
            tracing::warn!(error = %e, "category fetch failed");
            NearbyError::from(e)
        })
    }
}
