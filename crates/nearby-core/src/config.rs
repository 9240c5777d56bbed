use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Largest radius the upstream nearby-search endpoint accepts.
const MAX_RADIUS_METERS: u32 = 50_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("NEARBY_ENV", "development"))?;
    let log_level = or_default("NEARBY_LOG_LEVEL", "info");
    let bind_addr = parse_addr("NEARBY_BIND_ADDR", "0.0.0.0:3001")?;

    let google_places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let google_base_url = or_default(
        "NEARBY_GOOGLE_BASE_URL",
        "https://maps.googleapis.com/maps/api/place",
    );
    let upstream_timeout_secs = parse_u64("NEARBY_UPSTREAM_TIMEOUT_SECS", "10")?;
    let rate_limit_per_minute = parse_usize("NEARBY_RATE_LIMIT_PER_MINUTE", "120")?;

    let api_url = or_default("NEARBY_API_URL", "http://localhost:3001/api");
    let client_timeout_secs = parse_u64("NEARBY_CLIENT_TIMEOUT_SECS", "15")?;
    let search_radius_meters = parse_u32("NEARBY_SEARCH_RADIUS_METERS", "1500")?;
    let debounce_ms = parse_u64("NEARBY_DEBOUNCE_MS", "500")?;

    if search_radius_meters == 0 || search_radius_meters > MAX_RADIUS_METERS {
        return Err(invalid(
            "NEARBY_SEARCH_RADIUS_METERS",
            format!("must be between 1 and {MAX_RADIUS_METERS}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        bind_addr,
        google_places_api_key,
        google_base_url,
        upstream_timeout_secs,
        rate_limit_per_minute,
        api_url,
        client_timeout_secs,
        search_radius_meters,
        debounce_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEARBY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
