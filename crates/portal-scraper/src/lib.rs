//! Authenticated scraping of the order-management portal.
//!
//! [`PortalClient`] carries the session; each extractor owns the parsing of
//! one endpoint's response shape and borrows the client through an `Arc`.

pub mod client;
pub mod conversion;
pub mod cycle_time;
pub mod error;
pub mod jobs;
pub mod retry;
pub mod revenue;
pub mod templates;

mod html;
mod parse;
mod table;

pub use client::{PortalClient, SessionGuard};
pub use conversion::ConversionReportFetcher;
pub use cycle_time::{CycleTime, CycleTimeFetcher};
pub use error::ScraperError;
pub use jobs::{JobRecord, JobStatus, JobStatusCounter, OrderType};
pub use retry::retry_with_backoff;
pub use revenue::{
    LastTableParser, RevenueRankingFetcher, RevenueRow, RevenueSummary, RevenueTableParser,
};
