use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use polars::prelude::{Column, DataFrame};
use tracing::{debug, warn};

use survey_model::PipelineConfig;

use crate::csv_table::{CsvTable, read_csv_table};

/// Map a verbatim export header onto its short field name.
///
/// Headers that are not in the column map pass through unchanged, which
/// also covers re-ingesting the pipeline's own output (already renamed).
fn field_name_for(config: &PipelineConfig, header: &str) -> String {
    config
        .column_map
        .iter()
        .find(|(raw, _)| raw.eq_ignore_ascii_case(header))
        .map(|(_, field)| (*field).to_string())
        .unwrap_or_else(|| header.to_string())
}

/// Build a string-typed survey frame from a raw CSV table.
///
/// Every column becomes a UTF-8 column; typing (age parsing, coordinate
/// parsing) happens per stage. Duplicate headers keep their first
/// occurrence only.
pub fn build_survey_frame(table: &CsvTable, config: &PipelineConfig) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    let mut seen = BTreeSet::new();
    for (idx, header) in table.headers.iter().enumerate() {
        let field = field_name_for(config, header);
        if !seen.insert(field.clone()) {
            warn!(column = %field, "duplicate column in export, keeping first occurrence");
            continue;
        }
        let values: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Column::new(field.as_str().into(), values));
    }
    let df = DataFrame::new(columns)?;
    debug!(rows = df.height(), columns = df.width(), "survey frame built");
    Ok(df)
}

/// Read and rename a survey export in one step.
pub fn read_survey_frame(path: &Path, config: &PipelineConfig) -> Result<DataFrame> {
    let table = read_csv_table(path)?;
    build_survey_frame(&table, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_headers_are_renamed_and_unknown_kept() {
        let config = PipelineConfig::default();
        let table = CsvTable {
            headers: vec![
                "Age".to_string(),
                "Type of employer".to_string(),
                "Favorite color".to_string(),
            ],
            rows: vec![vec![
                "31".to_string(),
                "Local".to_string(),
                "green".to_string(),
            ]],
        };
        let df = build_survey_frame(&table, &config).expect("build frame");
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["age", "employertype", "Favorite color"]);
    }
}
