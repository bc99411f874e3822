use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.cookie_path, PathBuf::from("canvas_cookies.json"));
    assert_eq!(cfg.report_dir, PathBuf::from("Reports"));
    assert_eq!(cfg.timezone, chrono_tz::US::Eastern);
    assert_eq!(cfg.days_back, 30);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 60);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_secs, 5);
}

#[test]
fn base_url_override_strips_trailing_slash() {
    let mut map = HashMap::new();
    map.insert("PORTAL_BASE_URL", "http://127.0.0.1:8080/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
}

#[test]
fn base_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PORTAL_BASE_URL", "canvas.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORTAL_BASE_URL"),
        "expected InvalidEnvVar(PORTAL_BASE_URL), got: {result:?}"
    );
}

#[test]
fn timezone_override_is_parsed() {
    let mut map = HashMap::new();
    map.insert("PORTAL_TIMEZONE", "America/Chicago");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.timezone, chrono_tz::America::Chicago);
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PORTAL_TIMEZONE", "Mars/Olympus_Mons");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORTAL_TIMEZONE"),
        "expected InvalidEnvVar(PORTAL_TIMEZONE), got: {result:?}"
    );
}

#[test]
fn days_back_override() {
    let mut map = HashMap::new();
    map.insert("PORTAL_DAYS_BACK", "7");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.days_back, 7);
}

#[test]
fn days_back_invalid() {
    let mut map = HashMap::new();
    map.insert("PORTAL_DAYS_BACK", "a week");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORTAL_DAYS_BACK"),
        "expected InvalidEnvVar(PORTAL_DAYS_BACK), got: {result:?}"
    );
}

#[test]
fn retry_settings_override() {
    let mut map = HashMap::new();
    map.insert("PORTAL_MAX_RETRIES", "2");
    map.insert("PORTAL_RETRY_BACKOFF_BASE_SECS", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("PORTAL_REQUEST_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORTAL_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PORTAL_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}
