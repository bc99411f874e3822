//! Text of the report: number formatting, year-over-year lines, layout.

use std::fmt::Display;

use portal_scraper::cycle_time::human_duration;
use portal_scraper::CycleTime;
use rust_decimal::Decimal;

use crate::metrics::{MetricValue, MetricsRecord, YearOverYear};

pub const ARROW_UP: char = '↑';
pub const ARROW_DOWN: char = '↓';

const PULL_DATE_FORMAT: &str = "%m/%d/%Y";

/// One line of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Title(String),
    /// `bold` is drawn first, then `regular`; either may be empty.
    Text { bold: String, regular: String },
    Gap,
}

impl ReportLine {
    fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            bold: String::new(),
            regular: text.into(),
        }
    }

    fn labeled(label: &str, body: &str) -> Self {
        Self::Text {
            bold: format!("{label}:"),
            regular: format!(" {body}"),
        }
    }

    /// The line as it reads on the page.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Title(title) => title.clone(),
            Self::Text { bold, regular } => format!("{bold}{regular}"),
            Self::Gap => String::new(),
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Integer with thousands separators: `12345` → `12,345`.
#[must_use]
pub fn format_count<T: Display>(value: &T) -> String {
    let text = value.to_string();
    match text.strip_prefix('-') {
        Some(digits) => format!("-{}", group_thousands(digits)),
        None => group_thousands(&text),
    }
}

/// Dollars with separators and two decimals: `26000.5` → `$26,000.50`.
#[must_use]
pub fn format_currency(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `↑ 10.0%` / `↓ 25.0%`.
///
/// A change without a baseline renders as `↑ 0.0%`, which is how the
/// newsletter has always shown a zero prior-year value.
#[must_use]
pub fn format_percent_change(change: Option<f64>) -> String {
    let change = change.unwrap_or(0.0);
    let arrow = if change >= 0.0 { ARROW_UP } else { ARROW_DOWN };
    format!("{arrow} {:.1}%", change.abs())
}

/// `<cur> (<arrow> <pct>% vLY) (<ly> LY)`.
#[must_use]
pub fn yoy_summary<T, F>(yoy: &YearOverYear<T>, display: F) -> String
where
    T: MetricValue,
    F: Fn(&T) -> String,
{
    format!(
        "{} ({} vLY) ({} LY)",
        display(&yoy.current),
        format_percent_change(yoy.percent_change()),
        display(&yoy.last_year)
    )
}

/// `<label>: <cur> (<arrow> <pct>% vLY) (<ly> LY)`.
#[must_use]
pub fn format_yoy_stat<T, F>(label: &str, yoy: &YearOverYear<T>, display: F) -> String
where
    T: MetricValue,
    F: Fn(&T) -> String,
{
    format!("{label}: {}", yoy_summary(yoy, display))
}

/// `<d> days, <h> hours (<arrow> by <n> days) (<d> days, <h> hours LY)`.
///
/// The day difference is truncated toward zero before the arrow is chosen,
/// so a sub-day regression still shows `↑ by 0 days`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn duration_summary(yoy: &YearOverYear<CycleTime>) -> String {
    let current = yoy.current.average_days;
    let last_year = yoy.last_year.average_days;
    let delta = (current - last_year).trunc();
    let arrow = if delta >= 0.0 { ARROW_UP } else { ARROW_DOWN };
    format!(
        "{} ({arrow} by {} days) ({} LY)",
        human_duration(current),
        delta.abs() as i64,
        human_duration(last_year)
    )
}

#[must_use]
pub fn format_duration_comparison(label: &str, yoy: &YearOverYear<CycleTime>) -> String {
    format!("{label}: {}", duration_summary(yoy))
}

/// The newsletter, top to bottom.
#[must_use]
pub fn report_lines(metrics: &MetricsRecord) -> Vec<ReportLine> {
    let pulled_on = metrics.pulled_on.format(PULL_DATE_FORMAT).to_string();

    let mut lines = vec![
        ReportLine::Title(format!("AoD Weekly Newsletter – {pulled_on}")),
        ReportLine::Gap,
        ReportLine::plain(format!("Data pulled on: {pulled_on}")),
        ReportLine::plain(format!("Period: {}", metrics.period)),
        ReportLine::Gap,
        ReportLine::labeled(
            "SSC Touches",
            &yoy_summary(&metrics.ssc_touches, format_count),
        ),
        ReportLine::labeled(
            "Orders Shipped",
            &yoy_summary(&metrics.orders_shipped, format_count),
        ),
        ReportLine::labeled(
            "Orders Submitted",
            &yoy_summary(&metrics.orders_submitted, format_count),
        ),
        ReportLine::labeled(
            "Network Revenue",
            &yoy_summary(&metrics.network_revenue, format_currency),
        ),
        ReportLine::labeled(
            "Avg. Time From Measurement to Shipped",
            &duration_summary(&metrics.measurement_to_shipped),
        ),
    ];

    if !metrics.top_locations.is_empty() {
        lines.push(ReportLine::Gap);
        lines.push(ReportLine::Text {
            bold: "Top 3 Locations by Revenue:".to_owned(),
            regular: String::new(),
        });
        lines.extend(metrics.top_locations.iter().map(|row| {
            ReportLine::plain(format!(
                "{}. {} – {}",
                row.rank,
                row.location,
                format_currency(&row.revenue)
            ))
        }));
    }

    lines
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
