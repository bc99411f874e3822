//! Average elapsed time from measurement approval to shipment.

use std::sync::Arc;

use portal_core::DateRange;
use serde::Serialize;

use crate::client::PortalClient;
use crate::error::ScraperError;
use crate::html::strip_tags;
use crate::parse::parse_portal_timestamp;
use crate::table::Table;
use crate::templates::{self, SHIPPED_JOBS_QUERY};

pub const NO_DATA: &str = "no data";

const SHIPPED_COLUMN: &str = "Date Shipped";
const MEASURED_COLUMN: &str = "Measurement Approved Date";
const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleTime {
    pub average_days: f64,
    /// `"<d> days, <h> hours"`, or [`NO_DATA`].
    pub human: String,
}

impl CycleTime {
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            average_days: 0.0,
            human: NO_DATA.to_owned(),
        }
    }

    #[must_use]
    pub fn from_days(average_days: f64) -> Self {
        Self {
            average_days,
            human: human_duration(average_days),
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.human != NO_DATA
    }
}

/// Whole days and whole hours, both truncated toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn human_duration(days: f64) -> String {
    let whole_days = days.trunc();
    let hours = ((days - whole_days) * 24.0).trunc();
    format!("{} days, {} hours", whole_days as i64, hours as i64)
}

pub struct CycleTimeFetcher {
    client: Arc<PortalClient>,
}

impl CycleTimeFetcher {
    #[must_use]
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self { client }
    }

    /// Average measurement-to-shipped time for jobs shipped within `range`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Request`] / [`ScraperError::Status`] from the portal.
    /// - [`ScraperError::DataFormat`] if the listing is not CSV or lacks the
    ///   shipped/measurement columns.
    pub async fn measurement_to_shipped(
        &self,
        range: &DateRange,
    ) -> Result<CycleTime, ScraperError> {
        let query = templates::render(SHIPPED_JOBS_QUERY, None, range);
        let body = self.client.get_text(&self.client.url(&query), &[]).await?;
        let cycle = parse_cycle_time(&body)?;
        tracing::info!(
            range = %range,
            average_days = cycle.average_days,
            human = %cycle.human,
            "computed measurement-to-shipped time"
        );
        Ok(cycle)
    }
}

pub(crate) fn parse_cycle_time(body: &str) -> Result<CycleTime, ScraperError> {
    const CONTEXT: &str = "shipped jobs listing";

    let text = strip_tags(body);
    if text.is_empty() {
        return Ok(CycleTime::no_data());
    }

    let table = Table::parse_csv(&text, CONTEXT)?;
    let shipped_col = table.require_column(SHIPPED_COLUMN, CONTEXT, &text)?;
    let measured_col = table.require_column(MEASURED_COLUMN, CONTEXT, &text)?;

    let elapsed: Vec<f64> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let shipped = parse_portal_timestamp(&row[shipped_col])?;
            // Re-approvals append to the cell; the latest approval is last.
            let measured = row[measured_col]
                .rsplit(',')
                .next()
                .and_then(parse_portal_timestamp)?;
            #[allow(clippy::cast_precision_loss)]
            let seconds = (shipped - measured).num_seconds() as f64;
            Some(seconds / SECONDS_PER_DAY)
        })
        .collect();

    if elapsed.is_empty() {
        tracing::debug!(rows = table.rows().len(), "no row had both timestamps");
        return Ok(CycleTime::no_data());
    }

    #[allow(clippy::cast_precision_loss)]
    let average = elapsed.iter().sum::<f64>() / elapsed.len() as f64;
    Ok(CycleTime::from_days(average))
}
