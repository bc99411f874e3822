//! Subcommand handlers. Each one builds what it needs from `AppConfig` and
//! reports its outcome on stdout.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use portal_core::{load_cookies, AppConfig, DateRange};
use portal_report::ReportOrchestrator;

pub(crate) async fn run_report(config: &AppConfig, days_back: u32) -> anyhow::Result<()> {
    let orchestrator = ReportOrchestrator::from_config(config)?;
    let path = orchestrator.generate_report(days_back).await?;
    let shown = std::fs::canonicalize(&path).unwrap_or(path);
    println!("PDF saved: {}", shown.display());
    Ok(())
}

pub(crate) async fn run_metrics(config: &AppConfig, days_back: u32) -> anyhow::Result<()> {
    let orchestrator = ReportOrchestrator::from_config(config)?;
    let today = orchestrator.today();
    let range = ReportOrchestrator::window(today, days_back)?;
    let metrics = orchestrator.collect_metrics(range, today).await?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

/// Builds the export window, rejecting an end date before the start date.
pub(crate) fn export_range(start: NaiveDate, end: NaiveDate) -> anyhow::Result<DateRange> {
    let range = DateRange::new(start, end);
    if !range.is_ordered() {
        anyhow::bail!("--end ({end}) is before --start ({start})");
    }
    Ok(range)
}

pub(crate) async fn run_export_jobs(
    config: &AppConfig,
    range: DateRange,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let orchestrator = ReportOrchestrator::from_config(config)?;
    let (records, written) = orchestrator
        .jobs()
        .generate_combined_csv(&range, output)
        .await?;

    match written {
        Some(path) => println!("wrote {} jobs to {}", records.len(), path.display()),
        None => println!("no jobs found for {range}; nothing written"),
    }
    Ok(())
}

pub(crate) fn run_check_cookies(path: &Path) -> anyhow::Result<()> {
    let cookies = load_cookies(path)?;
    let now = Utc::now();
    cookies.ensure_unexpired(now)?;

    match cookies.latest_expiration() {
        Some(expires_at) => {
            let remaining = expires_at - now;
            println!(
                "{} cookies valid until {expires_at} ({} days left)",
                cookies.cookies().len(),
                remaining.num_days()
            );
        }
        None => println!(
            "{} session cookies with no expiration; validity unknown",
            cookies.cookies().len()
        ),
    }
    Ok(())
}
