//! Regex-level HTML helpers for the portal's fixed page layouts.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("valid table regex"));
static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid row regex"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("valid cell regex"));

/// Removes every tag and trims the result.
///
/// Listing endpoints wrap their CSV export in page markup; what remains after
/// stripping is the CSV text. Entities are left as-is.
pub(crate) fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").trim().to_owned()
}

/// Inner HTML of every `<table>` in document order.
///
/// Nested tables are not supported; the portal's report pages do not use them.
pub(crate) fn tables(html: &str) -> Vec<&str> {
    TABLE_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Text of every `<td>` per `<tr>` of a table body. Header cells (`<th>`)
/// are not collected.
pub(crate) fn table_rows(table_html: &str) -> Vec<Vec<String>> {
    ROW_RE
        .captures_iter(table_html)
        .filter_map(|row| row.get(1))
        .map(|row| {
            CELL_RE
                .captures_iter(row.as_str())
                .filter_map(|cell| cell.get(1))
                .map(|cell| cell_text(cell.as_str()))
                .collect()
        })
        .collect()
}

fn cell_text(inner: &str) -> String {
    let text = decode_entities(&TAG_RE.replace_all(inner, ""));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#36;", "$")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
