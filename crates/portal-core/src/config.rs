use std::path::PathBuf;

use chrono_tz::Tz;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://canvas.artofdrawers.com";
pub const DEFAULT_COOKIE_PATH: &str = "canvas_cookies.json";
pub const DEFAULT_REPORT_DIR: &str = "Reports";
pub const DEFAULT_TIMEZONE: &str = "US/Eastern";
pub const DEFAULT_USER_AGENT: &str = "portal-report/0.1 (weekly-metrics)";

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
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let base_url = parse_base_url(&or_default("PORTAL_BASE_URL", DEFAULT_BASE_URL))?;
    let cookie_path = PathBuf::from(or_default("PORTAL_COOKIE_PATH", DEFAULT_COOKIE_PATH));
    let report_dir = PathBuf::from(or_default("PORTAL_REPORT_DIR", DEFAULT_REPORT_DIR));
    let timezone = parse_timezone(&or_default("PORTAL_TIMEZONE", DEFAULT_TIMEZONE))?;
    let log_level = or_default("PORTAL_LOG_LEVEL", "info");
    let user_agent = or_default("PORTAL_USER_AGENT", DEFAULT_USER_AGENT);

    let days_back = parse_u32("PORTAL_DAYS_BACK", "30")?;
    let request_timeout_secs = parse_u64("PORTAL_REQUEST_TIMEOUT_SECS", "60")?;
    let max_retries = parse_u32("PORTAL_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("PORTAL_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        base_url,
        cookie_path,
        report_dir,
        timezone,
        days_back,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Accepts only absolute `http`/`https` URLs and strips trailing slashes so
/// endpoint paths can be appended verbatim.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "PORTAL_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

fn parse_timezone(raw: &str) -> Result<Tz, ConfigError> {
    raw.parse::<Tz>().map_err(|e| ConfigError::InvalidEnvVar {
        var: "PORTAL_TIMEZONE".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
