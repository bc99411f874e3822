use std::path::PathBuf;

use chrono::NaiveDate;
use portal_core::{ConfigError, CookieError};
use portal_scraper::ScraperError;
use thiserror::Error;

/// Any failure that aborts a report run. Nothing is written when one occurs
/// before rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Cookie(#[from] CookieError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a {days_back}-day window ending {end} starts before the earliest supported date")]
    InvalidWindow { end: NaiveDate, days_back: u32 },

    #[error("failed to write report {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
