//! Location sales ranking: network revenue total and top locations.

use std::sync::Arc;

use portal_core::DateRange;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::PortalClient;
use crate::error::ScraperError;
use crate::html;
use crate::parse::{parse_currency, quote_plus};
use crate::templates::REVENUE_RANKING_PATH;

const CONTEXT: &str = "location sales ranking";

/// Selects the ranking table on the page and returns its rows as cell text.
///
/// The fetcher only depends on this seam, so a selector keyed on a table id
/// or caption can replace the positional default without touching it.
pub trait RevenueTableParser: Send + Sync {
    /// # Errors
    ///
    /// [`ScraperError::DataFormat`] when no suitable table exists.
    fn table_rows(&self, html: &str) -> Result<Vec<Vec<String>>, ScraperError>;
}

/// Takes the last `<table>` on the page, where the ranking sits in the
/// portal's current layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastTableParser;

impl RevenueTableParser for LastTableParser {
    fn table_rows(&self, html: &str) -> Result<Vec<Vec<String>>, ScraperError> {
        html::tables(html)
            .last()
            .map(|table| html::table_rows(table))
            .ok_or_else(|| ScraperError::data_format(format!("{CONTEXT}: no table on page"), html))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueRow {
    pub rank: u32,
    pub location: String,
    pub revenue: Decimal,
}

/// Grand total plus every ranked location, highest revenue first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub total: Decimal,
    pub rows: Vec<RevenueRow>,
}

impl RevenueSummary {
    /// The `n` highest-revenue locations.
    #[must_use]
    pub fn top(&self, n: usize) -> &[RevenueRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

pub struct RevenueRankingFetcher {
    client: Arc<PortalClient>,
    parser: Box<dyn RevenueTableParser>,
}

impl RevenueRankingFetcher {
    /// Uses [`LastTableParser`].
    #[must_use]
    pub fn new(client: Arc<PortalClient>) -> Self {
        Self::with_parser(client, Box::new(LastTableParser))
    }

    #[must_use]
    pub fn with_parser(client: Arc<PortalClient>, parser: Box<dyn RevenueTableParser>) -> Self {
        Self { client, parser }
    }

    fn ranking_url(&self, range: &DateRange) -> String {
        let (start, end) = range.portal_format();
        self.client.url(&format!(
            "{REVENUE_RANKING_PATH}?sd={}&ed={}&presetdates=na",
            quote_plus(&start),
            quote_plus(&end)
        ))
    }

    /// Downloads and parses the ranking for `range`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Request`] / [`ScraperError::Status`] from the portal.
    /// - [`ScraperError::DataFormat`] if the table is missing, a cell does not
    ///   parse, or there is not exactly one `Total` row.
    pub async fn fetch_summary(&self, range: &DateRange) -> Result<RevenueSummary, ScraperError> {
        let body = self.client.get_text(&self.ranking_url(range), &[]).await?;
        let summary = parse_ranking(self.parser.as_ref(), &body)?;
        tracing::info!(
            range = %range,
            total = %summary.total,
            locations = summary.rows.len(),
            "parsed revenue ranking"
        );
        Ok(summary)
    }

    /// Grand total only.
    ///
    /// # Errors
    ///
    /// As [`RevenueRankingFetcher::fetch_summary`].
    pub async fn total_revenue(&self, range: &DateRange) -> Result<Decimal, ScraperError> {
        Ok(self.fetch_summary(range).await?.total)
    }
}

pub(crate) fn parse_ranking(
    parser: &dyn RevenueTableParser,
    body: &str,
) -> Result<RevenueSummary, ScraperError> {
    let mut total: Option<Decimal> = None;
    let mut rows = Vec::new();

    for cells in parser.table_rows(body)? {
        let [rank, location, revenue] = cells.as_slice() else {
            continue;
        };
        let revenue = parse_currency(revenue).ok_or_else(|| {
            ScraperError::data_format(
                format!("{CONTEXT}: revenue \"{revenue}\" for \"{location}\" is not a number"),
                body,
            )
        })?;

        if location.eq_ignore_ascii_case("total") {
            if total.is_some() {
                return Err(ScraperError::data_format(
                    format!("{CONTEXT}: more than one total row"),
                    body,
                ));
            }
            total = Some(revenue);
            continue;
        }

        let rank = rank.trim().parse::<u32>().map_err(|e| {
            ScraperError::data_format(
                format!("{CONTEXT}: rank \"{rank}\" for \"{location}\" ({e})"),
                body,
            )
        })?;
        rows.push(RevenueRow {
            rank,
            location: location.clone(),
            revenue,
        });
    }

    let total = total.ok_or_else(|| {
        ScraperError::data_format(format!("{CONTEXT}: could not find total row"), body)
    })?;
    // Stable sort keeps the portal's rank order among equal revenues.
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    Ok(RevenueSummary { total, rows })
}
