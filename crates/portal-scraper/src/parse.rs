//! Scalar coercions shared by the extractors.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

/// Characters left unescaped by form-style (`quote_plus`) encoding.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%Y"];

/// Percent-encodes a query value, spaces as `+`.
pub(crate) fn quote_plus(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Parses the timestamp shapes the portal emits in its CSV exports.
///
/// Date-only values are taken as midnight. Returns `None` for anything
/// unrecognised, including blanks.
pub(crate) fn parse_portal_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_portal_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub(crate) fn parse_portal_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// `"$26,000.50"` → `26000.50`.
pub(crate) fn parse_currency(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).ok()
}
