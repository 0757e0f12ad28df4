use crate::app_config::{AppConfig, Environment, GatewayCredentials};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("VOLTIO_ENV", "development"));
    let bind_addr = parse_addr("VOLTIO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VOLTIO_LOG_LEVEL", "info");
    let currency = or_default("VOLTIO_CURRENCY", "COP");

    let db_max_connections = parse_u32("VOLTIO_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("VOLTIO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("VOLTIO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    // Gateway credentials are all-or-nothing: a partial set is a
    // misconfiguration, not a disabled gateway.
    let api_key = lookup("VOLTIO_PAYU_API_KEY").ok();
    let merchant_id = lookup("VOLTIO_PAYU_MERCHANT_ID").ok();
    let account_id = lookup("VOLTIO_PAYU_ACCOUNT_ID").ok();
    let gateway = match (api_key, merchant_id, account_id) {
        (Some(api_key), Some(merchant_id), Some(account_id)) => Some(GatewayCredentials {
            api_key,
            merchant_id,
            account_id,
        }),
        (None, None, None) => None,
        _ => {
            return Err(ConfigError::InvalidEnvVar {
                var: "VOLTIO_PAYU_*".to_string(),
                reason: "set all of VOLTIO_PAYU_API_KEY, VOLTIO_PAYU_MERCHANT_ID, \
                         VOLTIO_PAYU_ACCOUNT_ID, or none"
                    .to_string(),
            })
        }
    };
    let gateway_base_url = lookup("VOLTIO_PAYU_BASE_URL").ok();
    let gateway_request_timeout_secs = parse_u64("VOLTIO_PAYU_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        currency,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        gateway,
        gateway_base_url,
        gateway_request_timeout_secs,
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
