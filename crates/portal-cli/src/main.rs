mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "portal-cli")]
#[command(about = "Weekly metrics report from the order-management portal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect every metric and write the newsletter PDF
    Report {
        /// Window length in days ending today (defaults to PORTAL_DAYS_BACK)
        #[arg(long)]
        days_back: Option<u32>,
    },
    /// Collect every metric and print it as JSON
    Metrics {
        /// Window length in days ending today (defaults to PORTAL_DAYS_BACK)
        #[arg(long)]
        days_back: Option<u32>,
    },
    /// Export submitted and shipped jobs for a window as one CSV
    ExportJobs {
        /// First day of the window (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        /// Last day of the window (MM/DD/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
        /// Destination file (defaults to the report directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate the session cookie file without contacting the portal
    CheckCookies {
        /// Cookie file to check (defaults to PORTAL_COOKIE_PATH)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, portal_core::date_range::PORTAL_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| format!("expected MM/DD/YYYY or YYYY-MM-DD, got \"{raw}\""))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = portal_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Report { days_back }) => {
            commands::run_report(&config, days_back.unwrap_or(config.days_back)).await?;
        }
        None => commands::run_report(&config, config.days_back).await?,
        Some(Commands::Metrics { days_back }) => {
            commands::run_metrics(&config, days_back.unwrap_or(config.days_back)).await?;
        }
        Some(Commands::ExportJobs { start, end, output }) => {
            let range = commands::export_range(start, end)?;
            commands::run_export_jobs(&config, range, output.as_deref()).await?;
        }
        Some(Commands::CheckCookies { path }) => {
            let path = path.unwrap_or_else(|| config.cookie_path.clone());
            commands::run_check_cookies(&path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
