//! Output table assembly.
//!
//! The cleaned frame is split into a small relational model: one
//! single-response table, one location dimension, one free-text table,
//! and one junction table per exploded multi-select field. Every table
//! carries the respondent identifier.

use anyhow::Result;
use polars::prelude::{Column, DataFrame};

use survey_model::fields;

use crate::context::PipelineContext;
use crate::data_utils::{column_strings, set_string_column};

/// One named output table.
#[derive(Debug, Clone)]
pub struct SurveyFrame {
    pub name: String,
    pub data: DataFrame,
}

/// The full relational output of one run.
#[derive(Debug)]
pub struct SurveyTables {
    pub single: SurveyFrame,
    pub location: SurveyFrame,
    pub freetext: SurveyFrame,
    pub junctions: Vec<SurveyFrame>,
}

impl SurveyTables {
    pub fn all(&self) -> impl Iterator<Item = &SurveyFrame> {
        [&self.single, &self.location, &self.freetext]
            .into_iter()
            .chain(self.junctions.iter())
    }
}

/// Project a subset of columns into a fresh frame, always starting with
/// the respondent id; requested columns missing from the source are
/// skipped rather than invented.
fn project(df: &DataFrame, name: &str, columns: &[&str]) -> Result<SurveyFrame> {
    let mut selected: Vec<Column> = Vec::with_capacity(columns.len() + 1);
    let ids = column_strings(df, fields::RESP_ID).unwrap_or_else(|| vec![String::new(); df.height()]);
    selected.push(Column::new(fields::RESP_ID.into(), ids));
    for column in columns {
        if *column == fields::RESP_ID {
            continue;
        }
        if let Some(values) = column_strings(df, column) {
            selected.push(Column::new((*column).into(), values));
        }
    }
    Ok(SurveyFrame {
        name: name.to_string(),
        data: DataFrame::new(selected)?,
    })
}

/// Blank communication answers that only say "no" in some spelling.
pub fn clean_comms(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(mut values) = column_strings(df, fields::COMMS) else {
        return Ok(());
    };
    for cell in &mut values {
        let none_like = ctx
            .config
            .comms_none_like
            .iter()
            .any(|none| none.eq_ignore_ascii_case(cell.trim()));
        if none_like {
            cell.clear();
        }
    }
    set_string_column(df, fields::COMMS, values)
}

/// Split the cleaned frame into the output model.
pub fn assemble_tables(
    df: &DataFrame,
    junctions: Vec<SurveyFrame>,
) -> Result<SurveyTables> {
    Ok(SurveyTables {
        single: project(df, "single", fields::SINGLE_FIELDS)?,
        location: project(df, "location", fields::LOCATION_FIELDS)?,
        freetext: project(df, "freetext", fields::FREE_TEXT_FIELDS)?,
        junctions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn projection_keeps_only_present_columns() {
        let frame = df!(
            "resp_id" => ["R0001"],
            "age" => ["31"],
        )
        .expect("frame");
        let table = project(&frame, "single", &["age", "gender"]).expect("project");
        assert_eq!(table.data.get_column_names().len(), 2);
        assert!(table.data.column("age").is_ok());
        assert!(table.data.column("gender").is_err());
    }
}
