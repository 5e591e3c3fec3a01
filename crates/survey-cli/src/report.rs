//! Output writers: CSV tables and the unique-value report.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};

use survey_core::column_strings;
use survey_core::tables::{SurveyFrame, SurveyTables};
use survey_model::fields;

/// Write one output table as `<output_dir>/<name>.csv`.
pub fn write_table_csv(output_dir: &Path, table: &SurveyFrame) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory: {}", output_dir.display()))?;
    let path = output_dir.join(format!("{}.csv", table.name));
    let mut file =
        File::create(&path).with_context(|| format!("create output file: {}", path.display()))?;
    let mut data = table.data.clone();
    CsvWriter::new(&mut file)
        .finish(&mut data)
        .with_context(|| format!("write table: {}", path.display()))?;
    Ok(path)
}

/// Write the sorted distinct cleaned values of every single-response
/// column to `<output_dir>/unique/unique_single.txt`, one section per
/// column. Identifier and timestamp columns are skipped.
pub fn write_unique_report(output_dir: &Path, tables: &SurveyTables) -> Result<PathBuf> {
    let dir = output_dir.join("unique");
    fs::create_dir_all(&dir)
        .with_context(|| format!("create report directory: {}", dir.display()))?;
    let path = dir.join("unique_single.txt");
    let mut file =
        File::create(&path).with_context(|| format!("create report file: {}", path.display()))?;

    let data = &tables.single.data;
    for column in data.get_column_names() {
        let name = column.as_str();
        if name == fields::RESP_ID || name == fields::TIMESTAMP {
            continue;
        }
        let Some(values) = column_strings(data, name) else {
            continue;
        };
        let distinct: BTreeSet<String> = values
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect();
        writeln!(file, "== {name} ({} distinct) ==", distinct.len())?;
        for value in distinct {
            writeln!(file, "{value}")?;
        }
        writeln!(file)?;
    }
    Ok(path)
}
