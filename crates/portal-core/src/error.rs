use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while loading or validating the session cookie file.
///
/// Every variant is a startup precondition: none of them can happen once
/// the portal client has been built.
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie file not found: {}", path.display())]
    MissingCookieFile { path: PathBuf },

    #[error("failed to read cookie file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cookie file {} is not a JSON cookie array: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("session cookies expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
}
