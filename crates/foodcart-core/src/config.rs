use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
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
/// Returns `ConfigError` if a value is invalid.
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

    // Only commands that touch Postgres need it; they fail at connect time.
    let database_url = lookup("DATABASE_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let env = parse_environment(&or_default("FOODCART_ENV", "development"));
    let bind_addr = parse_addr("FOODCART_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FOODCART_LOG_LEVEL", "info");

    let geocoder_api_key = lookup("YANDEX_GEOCODER_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    let geocoder_base_url = or_default(
        "FOODCART_GEOCODER_BASE_URL",
        "https://geocode-maps.yandex.ru/",
    );
    let geocoder_timeout_secs = parse_u64("FOODCART_GEOCODER_TIMEOUT_SECS", "10")?;
    if geocoder_timeout_secs == 0 {
        return Err(invalid(
            "FOODCART_GEOCODER_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let geocoder_max_concurrent = parse_usize("FOODCART_GEOCODER_MAX_CONCURRENT", "4")?;

    let db_max_connections = parse_u32("FOODCART_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("FOODCART_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("FOODCART_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        geocoder_api_key,
        geocoder_base_url,
        geocoder_timeout_secs,
        geocoder_max_concurrent,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
