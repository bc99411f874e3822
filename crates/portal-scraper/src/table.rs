//! In-memory CSV table with the portal's column quirks handled.

use crate::error::ScraperError;

/// A parsed CSV export: one header row plus data rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parses CSV text whose first record is the header.
    ///
    /// Rows shorter than the header are padded with empty cells. A row wider
    /// than the header is a structural error. Columns with a blank or
    /// `Unnamed…` header (index artifacts from trailing commas) are dropped.
    pub(crate) fn parse_csv(text: &str, context: &str) -> Result<Self, ScraperError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            None => return Ok(Self::default()),
            Some(record) => record.map_err(|e| {
                ScraperError::data_format(format!("{context}: header ({e})"), text)
            })?,
        };
        let width = header.len();
        let keep: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, name)| !is_artifact_column(name))
            .map(|(i, _)| i)
            .collect();

        let headers = keep.iter().map(|&i| header[i].trim().to_owned()).collect();
        let mut rows = Vec::new();
        for (line, record) in records.enumerate() {
            let record = record.map_err(|e| {
                ScraperError::data_format(format!("{context}: row {} ({e})", line + 1), text)
            })?;
            if record.len() > width {
                return Err(ScraperError::data_format(
                    format!(
                        "{context}: row {} has {} fields, expected {width}",
                        line + 1,
                        record.len()
                    ),
                    text,
                ));
            }
            rows.push(
                keep.iter()
                    .map(|&i| record.get(i).unwrap_or_default().to_owned())
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    #[cfg(test)]
    pub(crate) fn headers(&self) -> &[String] {
        &self.headers
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of the column named exactly `name` (after trimming).
    pub(crate) fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub(crate) fn column_ignore_case(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Like [`Table::column`] but missing columns are a format error.
    pub(crate) fn require_column(
        &self,
        name: &str,
        context: &str,
        body: &str,
    ) -> Result<usize, ScraperError> {
        self.column(name).ok_or_else(|| {
            ScraperError::data_format(format!("{context}: missing column \"{name}\""), body)
        })
    }
}

fn is_artifact_column(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.starts_with("Unnamed")
}
