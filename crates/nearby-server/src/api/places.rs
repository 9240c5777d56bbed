use axum::{
    extract::{Path, Query, State},
    Json,
};
use nearby_core::{
    builtin_categories, types::DEFAULT_RADIUS_METERS, Category, Coordinates, NearbyQuery,
    PlaceRecord,
};
use nearby_places::{DataResponse, NearbyResponse};
use serde::Deserialize;

use super::{ApiError, AppState};

const MAX_RADIUS_METERS: u32 = 50_000;

/// Raw query string of `GET /api/places/nearby`. Kept as strings so that
/// validation failures produce the proxy's own error body.
#[derive(Debug, Default, Deserialize)]
pub(super) struct NearbyParams {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    keyword: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_nearby(params: NearbyParams) -> Result<NearbyQuery, ApiError> {
    let (Some(lat), Some(lng)) = (non_blank(params.lat), non_blank(params.lng)) else {
        return Err(ApiError::bad_request(
            "Missing required parameters",
            "Latitude and longitude are required",
        ));
    };

    let origin = match (lat.parse::<f64>(), lng.parse::<f64>()) {
        (Ok(lat), Ok(lng)) if lat.is_finite() && lng.is_finite() => Coordinates::new(lat, lng),
        _ => {
            return Err(ApiError::bad_request(
                "Invalid parameters",
                "Latitude and longitude must be valid numbers",
            ))
        }
    };
    if !origin.is_valid() {
        return Err(ApiError::bad_request(
            "Invalid parameters",
            "Latitude must be within [-90, 90] and longitude within [-180, 180]",
        ));
    }

    let radius_meters = match non_blank(params.radius) {
        None => DEFAULT_RADIUS_METERS,
        Some(raw) => match raw.parse::<u32>() {
            Ok(r) if (1..=MAX_RADIUS_METERS).contains(&r) => r,
            _ => {
                return Err(ApiError::bad_request(
                    "Invalid parameters",
                    format!("Radius must be an integer between 1 and {MAX_RADIUS_METERS}"),
                ))
            }
        },
    };

    Ok(NearbyQuery {
        origin,
        radius_meters,
        category: non_blank(params.kind),
        keyword: non_blank(params.keyword),
    })
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let query = parse_nearby(params)?;
    let places = state
        .google
        .nearby_search(&query)
        .await
        .map_err(|e| ApiError::upstream(&e))?;

    tracing::info!(
        count = places.len(),
        category = query.category.as_deref().unwrap_or(""),
        keyword = query.keyword.as_deref().unwrap_or(""),
        "nearby search served"
    );

    Ok(Json(NearbyResponse {
        success: true,
        count: places.len(),
        data: places,
        location: query.origin.into(),
        radius: query.radius_meters,
    }))
}

pub(super) async fn details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<DataResponse<PlaceRecord>>, ApiError> {
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(ApiError::bad_request("Missing placeId", "A place id is required"));
    }

    let record = state
        .google
        .place_details(place_id)
        .await
        .map_err(|e| ApiError::upstream(&e))?;
    Ok(Json(DataResponse::ok(record)))
}

pub(super) async fn categories() -> Json<DataResponse<Vec<Category>>> {
    Json(DataResponse::ok(builtin_categories()))
}
