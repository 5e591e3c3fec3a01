//! Multi-select explosion into junction rows.
//!
//! A multi-select answer is one comma-joined cell per respondent. Explosion
//! turns it into (respondent id, canonical token) pairs, with the token
//! cleaning pass from the field's rule bundle plus the per-field extras:
//! word-count cap, primary-answer duplicate suppression, and presence-based
//! pruning of "none"-like tokens.

use anyhow::Result;
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use survey_model::{MultiSelectSpec, RespondentId, fields};

use crate::context::PipelineContext;
use crate::data_utils::{column_strings, column_value_string, has_column};
use crate::rules::FieldRules;
use crate::text::{normalize, word_count};

/// Split one raw multi-select cell into normalized tokens.
fn split_tokens(raw: &str, spec: &MultiSelectSpec) -> Vec<String> {
    let mut value = raw.to_string();
    for (bad, good) in &spec.pre_split_replace {
        value = value.replace(bad.as_str(), good.as_str());
    }
    value
        .split(',')
        .filter_map(normalize)
        .collect()
}

/// Clean the tokens of one respondent's answer.
fn clean_tokens(
    tokens: Vec<String>,
    spec: &MultiSelectSpec,
    rules: Option<&FieldRules>,
    primary: Option<&str>,
) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = match rules {
            Some(rules) => match rules.apply(&token) {
                Some(token) => token,
                None => continue,
            },
            None => token,
        };
        if let Some(max_words) = spec.max_words {
            if word_count(&token) > max_words {
                continue;
            }
        }
        if let Some(primary) = primary {
            if token.eq_ignore_ascii_case(primary) {
                continue;
            }
        }
        cleaned.push(token);
    }

    // Presence pruning: a respondent with real answers loses the
    // "none"-like token; a respondent with nothing else keeps it.
    if !spec.prune_none.is_empty() {
        let mut distinct: Vec<&str> = Vec::new();
        for token in &cleaned {
            if !distinct.iter().any(|seen| seen.eq_ignore_ascii_case(token)) {
                distinct.push(token);
            }
        }
        if distinct.len() > 1 {
            cleaned.retain(|token| {
                !spec
                    .prune_none
                    .iter()
                    .any(|none| none.eq_ignore_ascii_case(token))
            });
        }
    }

    // Distinct per respondent, first spelling wins, encounter order kept.
    let mut distinct: Vec<String> = Vec::with_capacity(cleaned.len());
    for token in cleaned {
        if !distinct.iter().any(|seen| seen.eq_ignore_ascii_case(&token)) {
            distinct.push(token);
        }
    }
    distinct
}

/// Explode one multi-select field into a two-column junction frame
/// (`resp_id`, field). Rows are distinct on (respondent, token).
pub fn explode_field(
    df: &DataFrame,
    ctx: &PipelineContext,
    spec: &MultiSelectSpec,
) -> Result<DataFrame> {
    let rules = ctx.field_rules(spec.field);
    let mut ids: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if has_column(df, spec.field) {
        for idx in 0..df.height() {
            let raw = column_value_string(df, spec.field, idx);
            let tokens = split_tokens(&raw, spec);
            if tokens.is_empty() {
                continue;
            }
            let primary = spec
                .dedupe_against
                .map(|field| column_value_string(df, field, idx));
            let cleaned = clean_tokens(tokens, spec, rules, primary.as_deref());
            // Junction rows are keyed by (respondent id, token); a row that
            // somehow reached this point without an id cannot be keyed.
            let Ok(resp_id) = RespondentId::new(column_value_string(df, fields::RESP_ID, idx))
            else {
                continue;
            };
            for token in cleaned {
                ids.push(resp_id.to_string());
                values.push(token);
            }
        }
    }

    debug!(field = spec.field, rows = ids.len(), "exploded multi-select field");
    Ok(DataFrame::new(vec![
        Column::new(fields::RESP_ID.into(), ids),
        Column::new(spec.field.into(), values),
    ])?)
}

/// Rewrite a multi-select column in place with each token standardized,
/// re-joined with ", ". Used for the platform fields, which keep their
/// single-cell form in the main table and are exploded afterwards.
pub fn standardize_tokens_in_place(
    df: &mut DataFrame,
    ctx: &PipelineContext,
    field: &str,
) -> Result<()> {
    let Some(mut cells) = column_strings(df, field) else {
        return Ok(());
    };
    let Some(rules) = ctx.field_rules(field) else {
        return Ok(());
    };
    for cell in &mut cells {
        let tokens: Vec<String> = cell
            .split(',')
            .filter_map(normalize)
            .filter_map(|token| rules.apply(&token))
            .collect();
        *cell = tokens.join(", ");
    }
    crate::data_utils::set_string_column(df, field, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_split_on_commas_and_normalize() {
        let spec = MultiSelectSpec::plain(fields::GENERAL_TOOLS);
        let tokens = split_tokens("  Excel , , Power BI ,N/A", &spec);
        assert_eq!(tokens, vec!["Excel".to_string(), "Power BI".to_string()]);
    }

    #[test]
    fn pre_split_replacement_rewrites_delimiters() {
        let mut spec = MultiSelectSpec::plain(fields::DIGITAL_LEARNING);
        spec.pre_split_replace = vec![("/".to_string(), ",".to_string())];
        let tokens = split_tokens("YouTube/Coursera", &spec);
        assert_eq!(tokens, vec!["YouTube".to_string(), "Coursera".to_string()]);
    }

    #[test]
    fn word_count_cap_drops_verbose_tokens() {
        let mut spec = MultiSelectSpec::plain(fields::REST_OF_ROLE);
        spec.max_words = Some(3);
        let cleaned = clean_tokens(
            vec![
                "Data Engineer".to_string(),
                "I also do a little bit of everything else".to_string(),
            ],
            &spec,
            None,
            None,
        );
        assert_eq!(cleaned, vec!["Data Engineer".to_string()]);
    }

    #[test]
    fn primary_duplicate_is_suppressed_case_insensitively() {
        let spec = MultiSelectSpec::plain(fields::REST_OF_ROLE);
        let cleaned = clean_tokens(
            vec!["data engineer".to_string(), "Analyst".to_string()],
            &spec,
            None,
            Some("Data Engineer"),
        );
        assert_eq!(cleaned, vec!["Analyst".to_string()]);
    }

    #[test]
    fn none_token_pruned_only_when_real_answers_exist() {
        let mut spec = MultiSelectSpec::plain(fields::AI_TOOLS);
        spec.prune_none = vec!["None".to_string()];
        let mixed = clean_tokens(
            vec!["None".to_string(), "ChatGPT".to_string()],
            &spec,
            None,
            None,
        );
        assert_eq!(mixed, vec!["ChatGPT".to_string()]);
        let lonely = clean_tokens(vec!["None".to_string()], &spec, None, None);
        assert_eq!(lonely, vec!["None".to_string()]);
    }

    #[test]
    fn repeated_tokens_collapse_to_one() {
        let spec = MultiSelectSpec::plain(fields::GENERAL_TOOLS);
        let cleaned = clean_tokens(
            vec!["Excel".to_string(), "excel".to_string(), "SQL".to_string()],
            &spec,
            None,
            None,
        );
        assert_eq!(cleaned, vec!["Excel".to_string(), "SQL".to_string()]);
    }
}
