use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use survey_model::SurveyError;

/// A raw CSV table: one header row, string cells, no typing.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(header))
    }

    pub fn column_values(&self, header: &str) -> Option<Vec<String>> {
        let idx = self.column_index(header)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect(),
        )
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a survey export into a [`CsvTable`].
///
/// The first row is the header row. Fully blank rows are skipped; short
/// records are padded with empty cells so every row matches the header
/// width. An export with no data rows is a fatal error; there is no
/// recovery path for structurally empty input.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Err(SurveyError::EmptyDataset(path.display().to_string()).into());
    }
    let headers: Vec<String> = raw_rows[0].iter().map(|value| normalize_header(value)).collect();
    let mut rows = Vec::with_capacity(raw_rows.len().saturating_sub(1));
    for record in raw_rows.iter().skip(1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(value.to_string());
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(SurveyError::EmptyDataset(path.display().to_string()).into());
    }
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_whitespace_is_collapsed() {
        assert_eq!(
            normalize_header("  Type of   employer \u{feff}"),
            "Type of employer"
        );
    }

    #[test]
    fn cell_is_trimmed() {
        assert_eq!(normalize_cell("  Manila  "), "Manila");
    }
}
