//! Lead-to-appointment conversion report: outbound communication totals.
//!
//! The export endpoint has no parameters of its own. It renders whatever
//! report the session last searched for, so the search POST and the export
//! GET run back to back under an exclusive hold on the session.

use std::sync::Arc;

use portal_core::DateRange;

use crate::client::PortalClient;
use crate::error::ScraperError;
use crate::table::Table;
use crate::templates::{CONVERSION_EXPORT_PATH, CONVERSION_FORM_PATH};

/// Fragment the first line of a genuine export always contains.
pub const EXPECTED_HEADER_FRAGMENT: &str = "Call Center Rep";
pub const OUTBOUND_COLUMN: &str = "Outbound Communication Count";

pub struct ConversionReportFetcher {
    client: Arc<PortalClient>,
    form_url: String,
    export_url: String,
}

impl ConversionReportFetcher {
    #[must_use]
    pub fn new(client: Arc<PortalClient>) -> Self {
        let form_url = client.url(CONVERSION_FORM_PATH);
        let export_url = client.url(CONVERSION_EXPORT_PATH);
        Self {
            client,
            form_url,
            export_url,
        }
    }

    /// Runs the search, then downloads the export as CSV text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Request`] / [`ScraperError::Status`] from either step.
    /// - [`ScraperError::Protocol`] if the export's first line is not the
    ///   expected CSV header (typically a login page after session loss).
    pub async fn download_report(&self, range: &DateRange) -> Result<String, ScraperError> {
        let (start, end) = range.portal_format();
        let form = [
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
            ("include_homeshow", "true"),
            ("quick_search", "Search"),
            ("search_for", ""),
            ("submit", "Show Report"),
        ];
        let referer = [("Referer", self.form_url.as_str())];

        let body = {
            let session = self.client.lock_session().await;
            session.post_form(&self.form_url, &form, &referer).await?;
            session.get_text(&self.export_url, &referer).await?
        };

        check_export_header(&body)?;
        Ok(body)
    }

    /// Sum of the outbound communication column for `range`.
    ///
    /// # Errors
    ///
    /// As [`ConversionReportFetcher::download_report`], plus
    /// [`ScraperError::DataFormat`] if the CSV or the count column is malformed.
    pub async fn get_total_outbound_communications(
        &self,
        range: &DateRange,
    ) -> Result<i64, ScraperError> {
        let body = self.download_report(range).await?;
        let total = sum_outbound(&body)?;
        tracing::info!(range = %range, total, "summed outbound communications");
        Ok(total)
    }
}

fn check_export_header(body: &str) -> Result<(), ScraperError> {
    let first_line = body.lines().next().unwrap_or_default();
    if first_line.contains(EXPECTED_HEADER_FRAGMENT) {
        Ok(())
    } else {
        Err(ScraperError::protocol("conversion report export", body))
    }
}

/// Validates the header, then sums [`OUTBOUND_COLUMN`].
pub(crate) fn sum_outbound(body: &str) -> Result<i64, ScraperError> {
    const CONTEXT: &str = "conversion report export";

    check_export_header(body)?;
    let table = Table::parse_csv(body, CONTEXT)?;
    let column = table.require_column(OUTBOUND_COLUMN, CONTEXT, body)?;

    table.rows().iter().try_fold(0i64, |acc, row| {
        let cell = row[column].trim();
        cell.parse::<i64>()
            .map(|n| acc.saturating_add(n))
            .map_err(|e| {
                ScraperError::data_format(
                    format!("{CONTEXT}: \"{cell}\" in {OUTBOUND_COLUMN} is not an integer ({e})"),
                    body,
                )
            })
    })
}
