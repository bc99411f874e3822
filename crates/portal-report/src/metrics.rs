//! The assembled facts of one report run.

use chrono::NaiveDate;
use portal_core::DateRange;
use portal_scraper::{CycleTime, RevenueRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// A metric measured over the current window and the prior-year window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear<T> {
    pub current: T,
    pub last_year: T,
}

impl<T> YearOverYear<T> {
    #[must_use]
    pub fn new(current: T, last_year: T) -> Self {
        Self { current, last_year }
    }

    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> YearOverYear<U> {
        YearOverYear {
            current: f(self.current),
            last_year: f(self.last_year),
        }
    }
}

/// Numeric view of a metric for percent-change arithmetic.
pub trait MetricValue {
    fn as_f64(&self) -> f64;
}

impl MetricValue for i64 {
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl MetricValue for usize {
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl MetricValue for f64 {
    fn as_f64(&self) -> f64 {
        *self
    }
}

impl MetricValue for Decimal {
    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl<T: MetricValue> YearOverYear<T> {
    /// `(current - last_year) / last_year * 100`.
    ///
    /// `None` when last year is zero: there is no baseline to compare to.
    #[must_use]
    pub fn percent_change(&self) -> Option<f64> {
        let last_year = self.last_year.as_f64();
        if last_year.abs() < f64::EPSILON {
            return None;
        }
        Some((self.current.as_f64() - last_year) / last_year * 100.0)
    }
}

/// Everything the weekly report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub pulled_on: NaiveDate,
    pub period: DateRange,
    pub prior_period: DateRange,
    /// Outbound communications from the conversion report.
    pub ssc_touches: YearOverYear<i64>,
    pub orders_shipped: YearOverYear<usize>,
    pub orders_submitted: YearOverYear<usize>,
    pub network_revenue: YearOverYear<Decimal>,
    pub measurement_to_shipped: YearOverYear<CycleTime>,
    /// Highest-revenue locations of the current window, at most three.
    pub top_locations: Vec<RevenueRow>,
}
