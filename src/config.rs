use std::env::VarError;
use std::time::Duration;

use thiserror::Error;

use crate::payment::zalopay::{
    ZaloPayConfig, DEFAULT_CREATE_ENDPOINT, DEFAULT_QUERY_ENDPOINT, SANDBOX_APP_ID,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub zalopay: ZaloPayConfig,
    pub payment_recheck_delay: Duration,
    pub reconcile_concurrency: usize,
    /// Cron expression for the periodic pending-order sweep; `None` disables it.
    pub reconcile_sweep_cron: Option<String>,
}

/// Loads `.env` if present, then reads the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if required variables are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parses configuration through `lookup`, so tests can pass a map instead
/// of touching the process environment.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
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
    let host = or_default("HOST", "0.0.0.0");
    let port = parse_u16("PORT", "8080")?;

    let db_max_connections = parse_u32("DB_MAX_CONNECTIONS", "10")?;
    if db_max_connections == 0 {
        return Err(invalid("DB_MAX_CONNECTIONS", "must be at least 1".to_string()));
    }

    let public_base_url = normalize_base_url(&or_default("PUBLIC_BASE_URL", "http://localhost:8080/"));

    let zalopay = ZaloPayConfig {
        app_id: or_default("ZALOPAY_APP_ID", SANDBOX_APP_ID),
        key1: require("ZALOPAY_KEY1")?,
        key2: require("ZALOPAY_KEY2")?,
        create_endpoint: or_default("ZALOPAY_ENDPOINT", DEFAULT_CREATE_ENDPOINT),
        query_endpoint: or_default("ZALOPAY_GET_STATUS_ENDPOINT", DEFAULT_QUERY_ENDPOINT),
        timeout_secs: parse_u64("ZALOPAY_TIMEOUT_SECS", "15")?,
        public_base_url,
    };

    let payment_recheck_delay = Duration::from_secs(parse_u64("PAYMENT_RECHECK_DELAY_SECS", "900")?);

    let reconcile_concurrency = parse_usize("RECONCILE_CONCURRENCY", "8")?;
    if reconcile_concurrency == 0 {
        return Err(invalid("RECONCILE_CONCURRENCY", "must be at least 1".to_string()));
    }

    let reconcile_sweep_cron = lookup("RECONCILE_SWEEP_CRON")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(AppConfig {
        database_url,
        host,
        port,
        db_max_connections,
        zalopay,
        payment_recheck_delay,
        reconcile_concurrency,
        reconcile_sweep_cron,
    })
}

/// Ensures exactly one trailing slash so paths can be appended directly.
fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}
