//! Client for the upstream Google Places web service.
//!
//! Used by the proxy server only; the API key never leaves the server. Every
//! upstream response carries a `"status"` token, which is checked before the
//! payload is trusted and surfaced as [`PlacesError::Api`] when it is not
//! `OK`. `ZERO_RESULTS` on nearby search is an empty success.

use std::time::Duration;

use nearby_core::{LatLng, NearbyQuery, PlaceRecord};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;


const DETAILS_FIELDS: &str =
    "name,formatted_address,geometry,rating,opening_hours,photos,types,website,formatted_phone_number";

/// User-facing message for an upstream status token.
#[must_use]
pub fn upstream_message(status: &str) -> &'static str {
    match status {
        "ZERO_RESULTS" => "No places found in this area",
        "OVER_QUERY_LIMIT" => "API quota exceeded",
        "REQUEST_DENIED" => "API request denied",
        "INVALID_REQUEST" => "Invalid request parameters",
        "UNKNOWN_ERROR" => "Unknown error occurred",
        _ => "Failed to fetch places",
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleGeometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GooglePhoto {
    pub photo_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// A place as returned by `nearbysearch/json` or `details/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub geometry: GoogleGeometry,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<GooglePhoto>,
    #[serde(default)]
    pub opening_hours: Option<GoogleOpeningHours>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl GooglePlace {
    /// Converts into the proxy's record shape, using `id` as the place id.
    #[must_use]
    pub fn into_record(self, id: String) -> PlaceRecord {
        let (open_now, weekday_text) = self
            .opening_hours
            .map_or((None, Vec::new()), |h| (h.open_now, h.weekday_text));
        PlaceRecord {
            id,
            name: self.name,
            location: self.geometry.location.into(),
            vicinity: self.vicinity,
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            types: self.types,
            open_now,
            weekday_text,
            photo_ref: self.photos.into_iter().next().map(|p| p.photo_reference),
            phone: self.formatted_phone_number,
            website: self.website,
            address: self.formatted_address,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NearbyEnvelope {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsEnvelope {
    status: String,
    #[serde(default)]
    result: Option<GooglePlace>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Client for the Google Places web service.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GooglePlacesClient {
    /// Creates a client against `base_url`, normally `NEARBY_GOOGLE_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("nearby/0.1 (places-proxy)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs a nearby search. Results without a `place_id` are skipped.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] when the upstream status is neither `OK` nor
    ///   `ZERO_RESULTS`.
    /// - [`PlacesError::Http`] on network failure, timeout or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match.
    pub async fn nearby_search(
        &self,
        query: &NearbyQuery,
    ) -> Result<Vec<PlaceRecord>, PlacesError> {
        let location = format!("{},{}", query.origin.latitude, query.origin.longitude);
        let radius = query.radius_meters.to_string();
        let mut params = vec![("location", location.as_str()), ("radius", radius.as_str())];
        if let Some(kind) = query.category.as_deref().filter(|s| !s.is_empty()) {
            params.push(("type", kind));
        }
        if let Some(keyword) = query.keyword.as_deref().filter(|s| !s.is_empty()) {
            params.push(("keyword", keyword));
        }

        let url = self.build_url("nearbysearch", &params);
        let body = self.request_json(&url).await?;
        let envelope: NearbyEnvelope =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("nearbysearch(location={location})"),
                source: e,
            })?;

        match envelope.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            _ => return Err(status_error(&envelope.status, envelope.error_message)),
        }

        let places = envelope
            .results
            .into_iter()
            .filter_map(|place| match place.place_id.clone() {
                Some(id) => Some(place.into_record(id)),
                None => {
                    tracing::warn!(name = %place.name, "skipping upstream place without place_id");
                    None
                }
            })
            .collect();
        Ok(places)
    }

    /// Fetches details for one place.
    ///
    /// # Errors
    ///
    /// Same as [`GooglePlacesClient::nearby_search`]; any non-`OK` status,
    /// `ZERO_RESULTS` and `NOT_FOUND` included, is an error here.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceRecord, PlacesError> {
        let url = self.build_url(
            "details",
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        );
        let body = self.request_json(&url).await?;
        let envelope: DetailsEnvelope =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        if envelope.status != "OK" {
            return Err(status_error(&envelope.status, envelope.error_message));
        }
        let result = envelope
            .result
            .ok_or_else(|| status_error("UNKNOWN_ERROR", None))?;
        Ok(result.into_record(place_id.to_string()))
    }

    /// Builds `{base}/{endpoint}/json?...&key=..` with encoded parameters.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend([endpoint, "json"]);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

fn status_error(status: &str, detail: Option<String>) -> PlacesError {
    tracing::warn!(status, detail = detail.as_deref().unwrap_or(""), "Google Places API error");
    PlacesError::Api {
        http_status: 200,
        code: status.to_string(),
        message: upstream_message(status).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GooglePlacesClient {
        GooglePlacesClient::with_base_url("test-key", 10, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_and_key() {
        let client = test_client("https://maps.googleapis.com/maps/api/place");
        let url = client.build_url("nearbysearch", &[("location", "1,2"), ("radius", "1500")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/nearbysearch/json?location=1%2C2&radius=1500&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_keyword() {
        let client = test_client("https://example.test/place/");
        let url = client.build_url("nearbysearch", &[("keyword", "fish & chips")]);
        assert!(
            url.as_str().contains("keyword=fish+%26+chips"),
            "keyword should be encoded: {url}"
        );
    }

    #[test]
    fn upstream_messages_cover_known_statuses() {
        assert_eq!(upstream_message("OVER_QUERY_LIMIT"), "API quota exceeded");
        assert_eq!(upstream_message("REQUEST_DENIED"), "API request denied");
        assert_eq!(upstream_message("SOMETHING_NEW"), "Failed to fetch places");
    }

    #[test]
    fn into_record_keeps_first_photo_and_hours() {
        let place: GooglePlace = serde_json::from_value(serde_json::json!({
            "place_id": "g1",
            "name": "Museum",
            "geometry": { "location": { "lat": 1.5, "lng": 2.5 } },
            "photos": [{ "photo_reference": "p1" }, { "photo_reference": "p2" }],
            "opening_hours": { "open_now": false, "weekday_text": ["Monday: Closed"] }
        }))
        .expect("deserialize");
        let record = place.into_record("g1".to_string());
        assert_eq!(record.photo_ref.as_deref(), Some("p1"));
        assert_eq!(record.open_now, Some(false));
        assert_eq!(record.weekday_text, vec!["Monday: Closed"]);
    }
}
