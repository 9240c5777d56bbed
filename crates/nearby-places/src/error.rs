use nearby_core::NearbyError;
use thiserror::Error;

/// Errors returned by the places HTTP clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client, timeouts included.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with an error envelope or a non-OK upstream status.
    ///
    /// `code` is either an upstream status token (`OVER_QUERY_LIMIT`) or the
    /// proxy's short error label (`Invalid parameters`).
    #[error("places API error {code} (HTTP {http_status}): {message}")]
    Api {
        http_status: u16,
        code: String,
        message: String,
    },

    /// Rejected locally before any request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

const NETWORK_MESSAGE: &str = "Failed to load places. Check your connection.";
const TIMEOUT_MESSAGE: &str = "The places server took too long to respond.";
const CONNECT_MESSAGE: &str = "Cannot connect to the places server.";
const UNEXPECTED_MESSAGE: &str = "Unexpected response from the places server.";

/// Whether `code` looks like an upstream status token (`UPPER_SNAKE_CASE`).
fn is_status_token(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl From<PlacesError> for NearbyError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Http(e) if e.is_timeout() => NearbyError::Network(TIMEOUT_MESSAGE.into()),
            PlacesError::Http(e) if e.is_connect() => NearbyError::Network(CONNECT_MESSAGE.into()),
            PlacesError::Http(_) => NearbyError::Network(NETWORK_MESSAGE.into()),
            PlacesError::Deserialize { .. } | PlacesError::InvalidBaseUrl { .. } => {
                NearbyError::Unknown(UNEXPECTED_MESSAGE.into())
            }
            PlacesError::InvalidRequest(message) => NearbyError::InvalidRequest(message),
            PlacesError::Api {
                http_status,
                code,
                message,
            } => {
                if code == "INVALID_REQUEST" || (http_status == 400 && !is_status_token(&code)) {
                    NearbyError::InvalidRequest(message)
                } else if http_status >= 500 {
                    NearbyError::Network(NETWORK_MESSAGE.into())
                } else {
                    NearbyError::Provider {
                        status: code,
                        message,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nearby_core::ErrorKind;

    use super::*;

    fn api(http_status: u16, code: &str, message: &str) -> PlacesError {
        PlacesError::Api {
            http_status,
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn validation_failures_become_invalid_request() {
        let err: NearbyError = api(
            400,
            "Invalid parameters",
            "Latitude and longitude must be valid numbers",
        )
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(
            err.to_string(),
            "Latitude and longitude must be valid numbers"
        );
    }

    #[test]
    fn upstream_invalid_request_token_is_invalid_request() {
        let err: NearbyError = api(400, "INVALID_REQUEST", "Invalid request parameters").into();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn upstream_status_tokens_become_provider_errors() {
        let err: NearbyError = api(400, "OVER_QUERY_LIMIT", "API quota exceeded").into();
        assert_eq!(
            err,
            NearbyError::Provider {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: "API quota exceeded".to_string(),
            }
        );
    }

    #[test]
    fn server_errors_are_network_errors() {
        let err: NearbyError = api(500, "Something went wrong!", "").into();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn deserialize_failures_are_unknown() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: NearbyError = PlacesError::Deserialize {
            context: "test".to_string(),
            source,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }

    #[tokio::test]
    async fn connect_failures_are_network_errors() {
        let e = reqwest::Client::new()
            .get("http://127.0.0.1:1")
            .send()
            .await
            .unwrap_err();
        let err: NearbyError = PlacesError::Http(e).into();
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
