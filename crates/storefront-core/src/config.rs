use crate::app_config::StorefrontConfig;
use crate::ConfigError;

/// Load storefront configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_storefront_config() -> Result<StorefrontConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_storefront_config_from_env()
}

/// Load storefront configuration from environment variables already in the process.
///
/// Unlike [`load_storefront_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_storefront_config_from_env() -> Result<StorefrontConfig, ConfigError> {
    build_storefront_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_storefront_config<F>(lookup: F) -> Result<StorefrontConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = require("STOREFRONT_BASE_URL")?;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" must start with http:// or https://"),
        });
    }

    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront-widgets/0.1");
    let locale = or_default("STOREFRONT_LOCALE", "de-DE");

    let currency = or_default("STOREFRONT_CURRENCY", "EUR").to_uppercase();
    if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_CURRENCY".to_string(),
            reason: format!("\"{currency}\" is not a three-letter currency code"),
        });
    }

    Ok(StorefrontConfig {
        base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        locale,
        currency,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
