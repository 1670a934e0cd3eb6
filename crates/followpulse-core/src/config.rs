use crate::app_config::{AppConfig, ApifyConfig, Environment, FirebaseConfig, RapidApiConfig};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_APIFY_ACTOR_ID: &str = "apify~instagram-profile-scraper";
pub const DEFAULT_RAPIDAPI_HOST: &str = "instagram-scraper-api2.p.rapidapi.com";

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
/// Empty values are treated as unset, so a blank `RAPIDAPI_KEY=` in a `.env`
/// file leaves the provider disabled rather than configured with no key.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => parse_flag(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got \"{raw}\""))),
        }
    };

    let env = parse_environment(&or_default("FOLLOWPULSE_ENV", "development"))?;

    let bind_addr = or_default("FOLLOWPULSE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FOLLOWPULSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FOLLOWPULSE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("FOLLOWPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FOLLOWPULSE_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }
    let user_agent = or_default("FOLLOWPULSE_USER_AGENT", DEFAULT_USER_AGENT);
    let rate_limit_per_minute = parse_usize("FOLLOWPULSE_RATE_LIMIT_PER_MINUTE", "60")?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "FOLLOWPULSE_RATE_LIMIT_PER_MINUTE",
            "must be at least 1".to_string(),
        ));
    }
    let public_page_enabled = parse_bool("FOLLOWPULSE_PUBLIC_PAGE_ENABLED", true)?;
    let cached_fallback_enabled = parse_bool("FOLLOWPULSE_CACHED_FALLBACK", false)?;
    let demo_profiles_path = optional("FOLLOWPULSE_DEMO_PROFILES_PATH").map(PathBuf::from);
    let instagram_base_url = or_default("INSTAGRAM_BASE_URL", "https://www.instagram.com");

    let apify = match optional("APIFY_API_TOKEN") {
        Some(api_token) => Some(ApifyConfig {
            api_token,
            actor_id: or_default("APIFY_ACTOR_ID", DEFAULT_APIFY_ACTOR_ID),
            base_url: or_default("APIFY_BASE_URL", "https://api.apify.com"),
            poll_interval_secs: parse_u64("APIFY_POLL_INTERVAL_SECS", "5")?,
            max_poll_attempts: parse_u32("APIFY_MAX_POLL_ATTEMPTS", "12")?,
        }),
        None => None,
    };

    let rapidapi = optional("RAPIDAPI_KEY").map(|api_key| {
        let host = or_default("RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST);
        let base_url = optional("RAPIDAPI_BASE_URL").unwrap_or_else(|| format!("https://{host}"));
        RapidApiConfig {
            api_key,
            host,
            base_url,
        }
    });

    let firebase = optional("FIREBASE_DATABASE_URL").map(|database_url| FirebaseConfig {
        database_url,
        auth_token: optional("FIREBASE_AUTH_TOKEN"),
    });

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        rate_limit_per_minute,
        public_page_enabled,
        cached_fallback_enabled,
        demo_profiles_path,
        instagram_base_url,
        apify,
        rapidapi,
        firebase,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOLLOWPULSE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
