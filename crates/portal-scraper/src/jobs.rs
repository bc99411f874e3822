//! Job counts by pipeline status, and the combined status export.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use portal_core::DateRange;
use serde::Serialize;

use crate::client::PortalClient;
use crate::error::ScraperError;
use crate::html::strip_tags;
use crate::parse::parse_portal_date;
use crate::table::Table;
use crate::templates::{self, JOB_STATUS_QUERY};

/// Pipeline statuses the report counts, with the portal's filter ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JobStatus {
    SubmittedToManufacturingPartner,
    OrderShipped,
}

impl JobStatus {
    pub const ALL: [JobStatus; 2] = [
        JobStatus::SubmittedToManufacturingPartner,
        JobStatus::OrderShipped,
    ];

    /// The label the portal uses, also the prefix of the status date column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::SubmittedToManufacturingPartner => "Submitted to Manufacturing Partner",
            JobStatus::OrderShipped => "Order Shipped",
        }
    }

    #[must_use]
    pub fn filter_id(self) -> u32 {
        match self {
            JobStatus::SubmittedToManufacturingPartner => 5,
            JobStatus::OrderShipped => 6,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            JobStatus::SubmittedToManufacturingPartner => "submitted",
            JobStatus::OrderShipped => "shipped",
        }
    }

    fn date_column(self) -> String {
        format!("{} Date", self.label())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    /// Accepts the portal label (any case) or the short slug
    /// (`submitted`, `shipped`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s) || status.slug() == s)
            .ok_or_else(|| format!("unknown job status: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderType {
    New,
    Claim,
    Reorder,
}

impl OrderType {
    /// Classifies an order from its id: a leading `C` is a claim, a leading
    /// `R` a reorder, and everything else (digits, empty, unknown prefixes)
    /// a new order.
    #[must_use]
    pub fn classify(id: &str) -> Self {
        match id.chars().next() {
            Some('C') => OrderType::Claim,
            Some('R') => OrderType::Reorder,
            _ => OrderType::New,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::New => "New",
            OrderType::Claim => "Claim",
            OrderType::Reorder => "Reorder",
        }
    }
}

/// One job row from a status listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub order_type: OrderType,
    pub franchisee: String,
    /// The status date; `None` when the export has no such column or the
    /// cell does not parse.
    pub date: Option<NaiveDate>,
    pub status: JobStatus,
}

/// Counts jobs that entered a status within a window.
pub struct JobStatusCounter {
    client: Arc<PortalClient>,
    export_dir: PathBuf,
}

impl JobStatusCounter {
    /// `export_dir` is where [`JobStatusCounter::generate_combined_csv`]
    /// writes when no explicit path is given.
    #[must_use]
    pub fn new(client: Arc<PortalClient>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            export_dir: export_dir.into(),
        }
    }

    /// Number of jobs in `status` during `range`.
    ///
    /// An empty listing counts as zero.
    ///
    /// # Errors
    ///
    /// Propagates [`JobStatusCounter::fetch_status_records`] errors.
    pub async fn count_jobs_by_status(
        &self,
        status: JobStatus,
        range: &DateRange,
    ) -> Result<usize, ScraperError> {
        let count = self.fetch_status_records(status, range).await?.len();
        tracing::info!(status = %status, range = %range, count, "counted jobs by status");
        Ok(count)
    }

    /// Fetches and parses the listing for one status.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Request`] / [`ScraperError::Status`] from the portal.
    /// - [`ScraperError::DataFormat`] if the export is not well-formed CSV or
    ///   lacks the `ID`/`Franchisee` columns.
    pub async fn fetch_status_records(
        &self,
        status: JobStatus,
        range: &DateRange,
    ) -> Result<Vec<JobRecord>, ScraperError> {
        let query = templates::render(JOB_STATUS_QUERY, Some(status.filter_id()), range);
        let body = self.client.get_text(&self.client.url(&query), &[]).await?;
        parse_status_listing(&body, status)
    }

    /// Fetches every status for `range` and writes them as one CSV.
    ///
    /// Writes to `output`, or to `<export_dir>/<MMDDYYYY>_<MMDDYYYY>_jobs.csv`
    /// when `output` is `None`. Nothing is written when no status has rows.
    ///
    /// # Errors
    ///
    /// Fetch errors as for [`JobStatusCounter::fetch_status_records`];
    /// [`ScraperError::Export`] / [`ScraperError::Csv`] if the file cannot be
    /// written.
    pub async fn generate_combined_csv(
        &self,
        range: &DateRange,
        output: Option<&Path>,
    ) -> Result<(Vec<JobRecord>, Option<PathBuf>), ScraperError> {
        let mut combined = Vec::new();
        for status in JobStatus::ALL {
            combined.extend(self.fetch_status_records(status, range).await?);
        }
        if combined.is_empty() {
            tracing::info!(range = %range, "no jobs in any status; skipping export");
            return Ok((combined, None));
        }

        let path = output.map_or_else(
            || self.export_dir.join(format!("{}_jobs.csv", range.compact_label())),
            Path::to_path_buf,
        );
        write_records(&path, &combined)?;
        tracing::info!(path = %path.display(), rows = combined.len(), "wrote combined jobs CSV");
        Ok((combined, Some(path)))
    }
}

/// Parses a tag-wrapped CSV listing into job records.
pub(crate) fn parse_status_listing(
    body: &str,
    status: JobStatus,
) -> Result<Vec<JobRecord>, ScraperError> {
    let context = format!("{status} listing");
    let text = strip_tags(body);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let table = Table::parse_csv(&text, &context)?;
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let id_col = table.require_column("ID", &context, &text)?;
    let franchisee_col = table.require_column("Franchisee", &context, &text)?;
    let date_col = table.column_ignore_case(&status.date_column());

    Ok(table
        .rows()
        .iter()
        .map(|row| {
            let id = row[id_col].trim().to_owned();
            JobRecord {
                order_type: OrderType::classify(&id),
                id,
                franchisee: row[franchisee_col].trim().to_owned(),
                date: date_col.and_then(|i| parse_portal_date(&row[i])),
                status,
            }
        })
        .collect())
}

fn write_records(path: &Path, records: &[JobRecord]) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ScraperError::Export {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["ID", "Order Type", "Franchisee", "Date", "Status"])?;
    for record in records {
        let date = record
            .date
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_default();
        writer.write_record([
            record.id.as_str(),
            record.order_type.as_str(),
            record.franchisee.as_str(),
            date.as_str(),
            record.status.label(),
        ])?;
    }
    writer.flush().map_err(|source| ScraperError::Export {
        path: path.to_path_buf(),
        source,
    })
}
