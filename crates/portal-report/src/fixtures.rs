//! Shared test data.

use std::str::FromStr;

use chrono::NaiveDate;
use portal_core::DateRange;
use portal_scraper::{CycleTime, RevenueRow};
use rust_decimal::Decimal;

use crate::metrics::{MetricsRecord, YearOverYear};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub(crate) fn row(rank: u32, location: &str, revenue: &str) -> RevenueRow {
    RevenueRow {
        rank,
        location: location.to_owned(),
        revenue: dec(revenue),
    }
}

/// Window 01/05/2024 – 02/04/2024, pulled 02/04/2024.
pub(crate) fn sample_metrics() -> MetricsRecord {
    let period = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
    );
    MetricsRecord {
        pulled_on: period.end,
        period,
        prior_period: period.shift_one_year_back(),
        ssc_touches: YearOverYear::new(1_320, 1_200),
        orders_shipped: YearOverYear::new(75, 100),
        orders_submitted: YearOverYear::new(90, 0),
        network_revenue: YearOverYear::new(dec("26000.50"), dec("20000.00")),
        measurement_to_shipped: YearOverYear::new(
            CycleTime::from_days(24.875),
            CycleTime::from_days(22.875),
        ),
        top_locations: vec![
            row(1, "Austin", "10000.00"),
            row(2, "Dallas", "8500.50"),
            row(3, "Houston", "7000.00"),
        ],
    }
}
