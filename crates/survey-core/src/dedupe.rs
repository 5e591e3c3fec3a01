//! Row exclusion and duplicate-submission collapse.

use anyhow::Result;
use chrono::NaiveDateTime;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{debug, warn};

use survey_model::fields;

use crate::context::PipelineContext;
use crate::data_utils::{column_strings, column_value_string};
use crate::text::normalize;

/// Timestamp formats seen in survey exports, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y/%m/%d %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    // Form exports append a "GMT+8"-style suffix that carries no
    // information for ordering rows within one export.
    let trimmed = match value.find(" GMT") {
        Some(pos) => &value[..pos],
        None => value,
    }
    .trim();
    if trimmed.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// Remove rows whose city exactly equals a known-bad value.
pub fn drop_excluded_cities(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    if ctx.config.delete_city_exact.is_empty() {
        return Ok(());
    }
    let Some(cities) = column_strings(df, fields::CITY) else {
        return Ok(());
    };
    let keep: Vec<bool> = cities
        .iter()
        .map(|city| !ctx.config.delete_city_exact.iter().any(|bad| bad == city))
        .collect();
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped == 0 {
        return Ok(());
    }
    debug!(dropped, "removed rows with excluded city values");
    let mask = BooleanChunked::from_slice("exclude".into(), &keep);
    *df = df.filter(&mask)?;
    Ok(())
}

/// Collapse rows sharing the fingerprint tuple, keeping the latest.
///
/// The fingerprint is (city, age, gender, education, industry, career
/// stage), normalized. A row whose fingerprint fields are all absent is
/// never treated as a duplicate. Within a group the row with the latest
/// parseable timestamp survives; when timestamps are missing or tie, the
/// last row in input order does.
pub fn dedupe_respondents(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let height = df.height();
    if height == 0 {
        return Ok(());
    }

    let fingerprints: Vec<Option<String>> = (0..height)
        .map(|idx| {
            let parts: Vec<String> = ctx
                .config
                .dedupe_fingerprint
                .iter()
                .map(|field| {
                    normalize(&column_value_string(df, field, idx))
                        .unwrap_or_default()
                        .to_lowercase()
                })
                .collect();
            if parts.iter().all(String::is_empty) {
                None
            } else {
                Some(parts.join("\u{1f}"))
            }
        })
        .collect();

    // Winner per fingerprint: latest timestamp, input order as tiebreak.
    let mut winners: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for idx in 0..height {
        let Some(fingerprint) = fingerprints[idx].as_deref() else {
            continue;
        };
        match winners.get(fingerprint) {
            None => {
                winners.insert(fingerprint, idx);
            }
            Some(&current) => {
                let current_ts =
                    parse_timestamp(&column_value_string(df, fields::TIMESTAMP, current));
                let candidate_ts =
                    parse_timestamp(&column_value_string(df, fields::TIMESTAMP, idx));
                let candidate_wins = match (current_ts, candidate_ts) {
                    (Some(a), Some(b)) => b >= a,
                    // Without two comparable timestamps, later input wins.
                    _ => true,
                };
                if candidate_wins {
                    winners.insert(fingerprint, idx);
                }
            }
        }
    }

    let keep: Vec<bool> = (0..height)
        .map(|idx| match fingerprints[idx].as_deref() {
            Some(fingerprint) => winners.get(fingerprint) == Some(&idx),
            None => true,
        })
        .collect();
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped == 0 {
        return Ok(());
    }
    warn!(dropped, "collapsed duplicate survey submissions");
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    *df = df.filter(&mask)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_export_timestamps_parse_and_order() {
        let earlier = parse_timestamp("2024/02/03 10:15:00 AM GMT+8").expect("parse");
        let later = parse_timestamp("2024/02/03 2:15:00 PM GMT+8").expect("parse");
        assert!(later > earlier);
        assert!(parse_timestamp("2024-02-03 10:15:00").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
