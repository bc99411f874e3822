use std::path::PathBuf;

use thiserror::Error;

/// Maximum number of characters of a response body kept for diagnosis.
pub const EXCERPT_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// Transport failure: DNS, TLS, timeout, connection reset.
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// The portal answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// A response body did not have the expected tabular shape.
    #[error("unexpected data format in {context}: {excerpt}")]
    DataFormat { context: String, excerpt: String },

    /// A multi-step exchange returned something other than what its first
    /// step should have produced, usually a login page after session loss.
    #[error("protocol violation in {context}; response began with: {excerpt}")]
    Protocol { context: String, excerpt: String },

    #[error("invalid portal URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to write export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScraperError {
    pub(crate) fn data_format(context: impl Into<String>, body: &str) -> Self {
        Self::DataFormat {
            context: context.into(),
            excerpt: excerpt(body),
        }
    }

    pub(crate) fn protocol(context: impl Into<String>, body: &str) -> Self {
        Self::Protocol {
            context: context.into(),
            excerpt: excerpt(body),
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of `body`.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}
