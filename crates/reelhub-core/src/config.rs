use crate::app_config::{AppConfig, Environment, StorageConfig};
use crate::ConfigError;

const DEFAULT_REGION: &str = "us-east-1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

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

    let database_url = require("DATABASE_URL")?;
    let bucket = require("AWS_S3_BUCKET")?;

    let env = parse_environment(&or_default("REELHUB_ENV", "development"))?;
    let bind_addr = parse_addr("REELHUB_BIND_ADDR", "0.0.0.0:4000")?;
    let log_level = or_default("REELHUB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("REELHUB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("REELHUB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("REELHUB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let region = optional("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
    let public_base_url = optional("REELHUB_MEDIA_PUBLIC_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| format!("https://{bucket}.s3.{region}.amazonaws.com"));

    let storage = StorageConfig {
        access_key_id: optional("AWS_ACCESS_KEY_ID"),
        secret_access_key: optional("AWS_SECRET_ACCESS_KEY"),
        endpoint: optional("REELHUB_S3_ENDPOINT"),
        public_base_url,
        bucket,
        region,
    };

    let max_upload_bytes = parse_usize("REELHUB_MAX_UPLOAD_BYTES", "104857600")?;
    let view_batch_size = parse_usize("REELHUB_VIEW_BATCH_SIZE", "10")?;
    if view_batch_size == 0 {
        return Err(invalid(
            "REELHUB_VIEW_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        storage,
        max_upload_bytes,
        view_batch_size,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REELHUB_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
