use std::path::PathBuf;

use chrono_tz::Tz;

/// Runtime settings for one report run.
///
/// Built by [`crate::load_app_config`]; every field has a default so a bare
/// environment produces a working configuration against the production portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub cookie_path: PathBuf,
    pub report_dir: PathBuf,
    pub timezone: Tz,
    pub days_back: u32,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts per extractor call after a transient failure.
    /// `0` keeps the run strictly fail-fast.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
