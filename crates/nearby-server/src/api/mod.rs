mod places;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use nearby_places::{ErrorResponse, GooglePlacesClient, HealthResponse, PlacesError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

#[derive(Clone)]
pub struct AppState {
    pub google: Arc<GooglePlacesClient>,
}

/// A failed request in the proxy's `{ success: false, error, message }` shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse::new(error, Some(message.into())),
        }
    }

    /// Maps a Google client failure onto the proxy contract.
    ///
    /// A non-OK upstream status is the caller's problem as far as the proxy
    /// can tell (400, status token as `error`). Transport or decode failures
    /// are a bad gateway.
    pub fn upstream(error: &PlacesError) -> Self {
        match error {
            PlacesError::Api { code, message, .. } => {
                tracing::warn!(status = %code, "upstream places call returned non-OK status");
                Self::bad_request(code.clone(), message.clone())
            }
            PlacesError::InvalidRequest(message) => {
                Self::bad_request("Invalid parameters", message.clone())
            }
            PlacesError::Http(_)
            | PlacesError::Deserialize { .. }
            | PlacesError::InvalidBaseUrl { .. } => {
                tracing::error!(error = %error, "upstream places call failed");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    body: ErrorResponse::new(
                        "API_ERROR",
                        Some("Failed to fetch places data".to_string()),
                    ),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn places_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/places/nearby", get(places::nearby))
        .route("/api/places/details/{place_id}", get(places::details))
        .route("/api/places/categories", get(places::categories))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(places_router(rate_limit))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    let request_id = req
                        .extensions()
                        .get::<RequestId>()
                        .map_or("-", |id| id.0.as_str());
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id,
                    )
                })),
        )
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            path: Some(uri.to_string()),
            ..ErrorResponse::new("Route not found", None)
        }),
    )
}
