//! Row-wise helpers over string-typed survey frames.
//!
//! The whole pipeline represents cells as UTF-8 strings with the empty
//! string standing for the absent state; these helpers keep that
//! convention in one place.

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};

pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Cell value as a string; missing column or row yields the empty string.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// All cell values of a column, or `None` when the column is absent.
pub fn column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    Some(
        (0..df.height())
            .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
    )
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Replace or insert a string column.
pub fn set_string_column(df: &mut DataFrame, name: &str, values: Vec<String>) -> Result<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Render a cleaned numeric cell without a trailing `.0`.
pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn missing_column_reads_as_empty() {
        let df = DataFrame::new(vec![Column::new("age".into(), vec!["31"])]).expect("frame");
        assert_eq!(column_value_string(&df, "age", 0), "31");
        assert_eq!(column_value_string(&df, "ghost", 0), "");
    }

    #[test]
    fn set_column_overwrites_in_place() {
        let mut df = DataFrame::new(vec![Column::new("age".into(), vec!["-5", "31"])]).expect("frame");
        set_string_column(&mut df, "age", vec![String::new(), "31".to_string()]).expect("set");
        assert_eq!(column_value_string(&df, "age", 0), "");
        assert_eq!(column_value_string(&df, "age", 1), "31");
    }

    #[test]
    fn numeric_formatting_drops_integral_fraction() {
        assert_eq!(format_numeric(18.0), "18");
        assert_eq!(format_numeric(14.4791), "14.4791");
    }
}
