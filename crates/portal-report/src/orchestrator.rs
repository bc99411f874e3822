//! One report run: windows, extraction, assembly, rendering.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use portal_core::{load_cookies, AppConfig, DateRange};
use portal_scraper::{
    retry_with_backoff, ConversionReportFetcher, CycleTimeFetcher, JobStatus, JobStatusCounter,
    PortalClient, RevenueRankingFetcher, ScraperError,
};

use crate::error::ReportError;
use crate::metrics::{MetricsRecord, YearOverYear};
use crate::pdf::{PdfRenderer, ReportRenderer};

/// Locations listed in the newsletter's revenue ranking.
pub const TOP_LOCATIONS: usize = 3;

/// Loads and validates the cookie file named in `config`, then builds the
/// shared portal client.
///
/// # Errors
///
/// - [`ReportError::Cookie`] if the file is missing, malformed, or expired.
/// - [`ReportError::Scraper`] if the client cannot be built.
pub fn connect(config: &AppConfig) -> Result<Arc<PortalClient>, ReportError> {
    let cookies = load_cookies(&config.cookie_path)?;
    cookies.ensure_unexpired(Utc::now())?;
    let client = PortalClient::new(
        &config.base_url,
        &cookies,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    tracing::debug!(
        base_url = %config.base_url,
        cookies = cookies.cookies().len(),
        "portal session ready"
    );
    Ok(Arc::new(client))
}

#[derive(Debug, Clone, Copy, Default)]
struct RetryPolicy {
    max_retries: u32,
    backoff_base_secs: u64,
}

pub struct ReportOrchestrator {
    jobs: JobStatusCounter,
    conversion: ConversionReportFetcher,
    revenue: RevenueRankingFetcher,
    cycle_time: CycleTimeFetcher,
    renderer: Box<dyn ReportRenderer>,
    timezone: Tz,
    retry: RetryPolicy,
}

impl ReportOrchestrator {
    /// Connects with the configured cookies and renders PDFs into the
    /// configured report directory.
    ///
    /// # Errors
    ///
    /// As [`connect`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ReportError> {
        let client = connect(config)?;
        Ok(Self::new(
            client,
            config,
            Box::new(PdfRenderer::new(&config.report_dir)),
        ))
    }

    #[must_use]
    pub fn new(
        client: Arc<PortalClient>,
        config: &AppConfig,
        renderer: Box<dyn ReportRenderer>,
    ) -> Self {
        Self {
            jobs: JobStatusCounter::new(Arc::clone(&client), &config.report_dir),
            conversion: ConversionReportFetcher::new(Arc::clone(&client)),
            revenue: RevenueRankingFetcher::new(Arc::clone(&client)),
            cycle_time: CycleTimeFetcher::new(client),
            renderer,
            timezone: config.timezone,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_secs: config.retry_backoff_base_secs,
            },
        }
    }

    /// The job counter, for callers that export the status listings.
    #[must_use]
    pub fn jobs(&self) -> &JobStatusCounter {
        &self.jobs
    }

    /// Today's date in the configured civil timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// The `days_back`-day window ending on `today`.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidWindow`] if the window starts before the
    /// earliest representable date.
    pub fn window(today: NaiveDate, days_back: u32) -> Result<DateRange, ReportError> {
        DateRange::ending_on(today, days_back).ok_or(ReportError::InvalidWindow {
            end: today,
            days_back,
        })
    }

    /// Builds the report for the `days_back` days ending today.
    ///
    /// # Errors
    ///
    /// As [`ReportOrchestrator::generate_report_for`].
    pub async fn generate_report(&self, days_back: u32) -> Result<PathBuf, ReportError> {
        self.generate_report_for(self.today(), days_back).await
    }

    /// Builds the report for `[today - days_back, today]` and returns the
    /// rendered file's path.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidWindow`] before any request is sent, then the
    /// first extraction error, or [`ReportError::Render`]. No file is
    /// written unless every metric was collected.
    pub async fn generate_report_for(
        &self,
        today: NaiveDate,
        days_back: u32,
    ) -> Result<PathBuf, ReportError> {
        let range = Self::window(today, days_back)?;
        tracing::info!(range = %range, "generating report");

        let metrics = self.collect_metrics(range, today).await?;
        let path = self.renderer.render(&metrics)?;
        tracing::info!(path = %path.display(), "report complete");
        Ok(path)
    }

    /// Runs every extractor over `range` and its prior-year window.
    ///
    /// Extractors run concurrently; the first failure cancels the rest.
    ///
    /// # Errors
    ///
    /// [`ReportError::Scraper`] from whichever extractor failed first.
    pub async fn collect_metrics(
        &self,
        range: DateRange,
        pulled_on: NaiveDate,
    ) -> Result<MetricsRecord, ReportError> {
        let prior = range.shift_one_year_back();

        let (ssc_touches, orders_shipped, orders_submitted, revenue, measurement_to_shipped) = tokio::try_join!(
            self.year_over_year("ssc touches", range, prior, |r| async move {
                self.conversion.get_total_outbound_communications(&r).await
            }),
            self.year_over_year("orders shipped", range, prior, |r| async move {
                self.jobs
                    .count_jobs_by_status(JobStatus::OrderShipped, &r)
                    .await
            }),
            self.year_over_year("orders submitted", range, prior, |r| async move {
                self.jobs
                    .count_jobs_by_status(JobStatus::SubmittedToManufacturingPartner, &r)
                    .await
            }),
            self.year_over_year("network revenue", range, prior, |r| async move {
                self.revenue.fetch_summary(&r).await
            }),
            self.year_over_year("measurement to shipped", range, prior, |r| async move {
                self.cycle_time.measurement_to_shipped(&r).await
            }),
        )?;

        for (window, cycle) in [
            (range, &measurement_to_shipped.current),
            (prior, &measurement_to_shipped.last_year),
        ] {
            if !cycle.has_data() {
                tracing::warn!(range = %window, "no shipped jobs with a measurement date");
            }
        }

        let top_locations = revenue.current.top(TOP_LOCATIONS).to_vec();
        Ok(MetricsRecord {
            pulled_on,
            period: range,
            prior_period: prior,
            ssc_touches,
            orders_shipped,
            orders_submitted,
            network_revenue: revenue.map(|summary| summary.total),
            measurement_to_shipped,
            top_locations,
        })
    }

    /// Fetches one metric for the current window, then the prior window,
    /// each under the retry policy.
    async fn year_over_year<T, F, Fut>(
        &self,
        metric: &'static str,
        range: DateRange,
        prior: DateRange,
        fetch: F,
    ) -> Result<YearOverYear<T>, ScraperError>
    where
        F: Fn(DateRange) -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let RetryPolicy {
            max_retries,
            backoff_base_secs,
        } = self.retry;
        let current = retry_with_backoff(max_retries, backoff_base_secs, || fetch(range)).await?;
        let last_year = retry_with_backoff(max_retries, backoff_base_secs, || fetch(prior)).await?;
        tracing::debug!(metric, "collected current and prior-year values");
        Ok(YearOverYear::new(current, last_year))
    }
}
