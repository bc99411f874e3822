//! Weekly metrics report: year-over-year assembly and PDF rendering.

pub mod error;
pub mod format;
pub mod metrics;
pub mod orchestrator;
pub mod pdf;

#[cfg(test)]
mod fixtures;

pub use error::ReportError;
pub use metrics::{MetricValue, MetricsRecord, YearOverYear};
pub use orchestrator::{connect, ReportOrchestrator, TOP_LOCATIONS};
pub use pdf::{PdfRenderer, ReportRenderer};
