//! Scalar field recoding stages.
//!
//! Each function rewrites one column (or a small cluster of columns) in
//! place, in the order documented by the default pipeline. Every stage is
//! total: a missing column means the stage is skipped, malformed values
//! become absent, and nothing here ever drops a row.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use survey_model::fields;

use crate::context::PipelineContext;
use crate::data_utils::{
    column_strings, column_value_string, format_numeric, has_column, parse_f64, set_string_column,
};
use crate::ids::IdSource;
use crate::rules::FieldRules;
use crate::text::{is_all_caps, is_blank, normalize, title_case};

/// Assign identifiers to rows that have none.
///
/// Existing identifiers are never reassigned; a missing `resp_id` column
/// is created outright.
pub fn ensure_ids(df: &mut DataFrame, id_source: &mut dyn IdSource) -> Result<()> {
    let mut values = column_strings(df, fields::RESP_ID)
        .unwrap_or_else(|| vec![String::new(); df.height()]);
    let mut assigned = 0usize;
    for value in &mut values {
        if value.trim().is_empty() {
            *value = id_source.next_id();
            assigned += 1;
        }
    }
    if assigned > 0 {
        debug!(assigned, "assigned respondent identifiers");
    }
    set_string_column(df, fields::RESP_ID, values)
}

/// Drop identifying columns (anonymization). Missing columns are fine.
pub fn strip_identifying(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    for field in &ctx.config.identifying_fields {
        if has_column(df, field) {
            let _ = df.drop_in_place(field)?;
        }
    }
    Ok(())
}

/// Bound ages to the configured range and apply the age-zero correction.
///
/// Values outside the range (and non-numeric values) become absent. An age
/// of exactly zero alongside an education answer containing the secondary
/// school marker is a known data-entry slip and is corrected to 18.
pub fn bound_ages(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(mut ages) = column_strings(df, fields::AGE) else {
        return Ok(());
    };
    let marker = ctx.config.age_zero_education_marker.to_lowercase();
    for (idx, cell) in ages.iter_mut().enumerate() {
        let parsed = parse_f64(cell);
        let corrected = match parsed {
            Some(age) if age == 0.0 => {
                let education = column_value_string(df, fields::EDUCATION, idx);
                if education.to_lowercase().contains(&marker) {
                    Some(ctx.config.age_zero_correction as f64)
                } else {
                    None
                }
            }
            Some(age)
                if age < ctx.config.age_min as f64 || age > ctx.config.age_max as f64 =>
            {
                None
            }
            other => other,
        };
        *cell = corrected.map(format_numeric).unwrap_or_default();
    }
    set_string_column(df, fields::AGE, ages)
}

/// Blank genders become the configured "Prefer not to say" answer.
pub fn recode_gender(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(mut genders) = column_strings(df, fields::GENDER) else {
        return Ok(());
    };
    for cell in &mut genders {
        *cell = match normalize(cell) {
            Some(value) => value,
            None => ctx.config.gender_blank_to.clone(),
        };
    }
    set_string_column(df, fields::GENDER, genders)
}

/// City normalization: literal replacements, the "None" work-abroad
/// fallback, ALL-CAPS fixup, then fill from province and country.
pub fn normalize_city(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(mut cities) = column_strings(df, fields::CITY) else {
        return Ok(());
    };
    for (idx, cell) in cities.iter_mut().enumerate() {
        let mut value = cell.clone();
        for (bad, good) in &ctx.config.city_replacements {
            value = value.replace(bad.as_str(), good.as_str());
        }
        // The literal answer "None" means "I work outside the country",
        // checked before blank folding would erase it.
        if value.trim() == "None" {
            value = ctx.config.city_none_to.clone();
        }
        let mut value = normalize(&value).unwrap_or_default();
        if is_all_caps(&value) {
            value = title_case(&value);
        }
        if value.is_empty() {
            for source in &ctx.config.city_fill_from {
                let fallback = column_value_string(df, source, idx);
                if let Some(fallback) = normalize(&fallback) {
                    value = fallback;
                    break;
                }
            }
        }
        *cell = value;
    }
    set_string_column(df, fields::CITY, cities)
}

/// Map raw salary ranges to their short bin labels.
pub fn derive_salary_bucket(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(salaries) = column_strings(df, fields::SALARY) else {
        return Ok(());
    };
    let buckets: Vec<String> = salaries
        .iter()
        .map(|cell| ctx.salary_bins.apply(cell).unwrap_or_default())
        .collect();
    set_string_column(df, fields::SALARY_GROUP, buckets)
}

/// Derive the age-group label from the bounded age.
pub fn derive_age_group(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(ages) = column_strings(df, fields::AGE) else {
        return Ok(());
    };
    let groups: Vec<String> = ages
        .iter()
        .map(|cell| {
            let Some(age) = parse_f64(cell) else {
                return String::new();
            };
            let age = age.floor() as i64;
            ctx.config
                .age_bands
                .iter()
                .find(|band| band.contains(age))
                .map(|band| band.label.to_string())
                .unwrap_or_default()
        })
        .collect();
    set_string_column(df, fields::AGE_GROUP, groups)
}

/// Collapse career-stage wording and close the category set.
///
/// Values outside the allowed set become the "Other" catch-all; absent
/// stays absent.
pub fn derive_career_stage(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(stages) = column_strings(df, fields::CAREER_STAGE) else {
        return Ok(());
    };
    let cleaned: Vec<String> = stages
        .iter()
        .map(|cell| match ctx.career_stage_rules.apply(cell) {
            Some(value) if ctx.config.career_stage_allowed.contains(&value) => value,
            Some(_) => ctx.config.career_stage_other.clone(),
            None => String::new(),
        })
        .collect();
    set_string_column(df, fields::CAREER_STAGE_CLEAN, cleaned)
}

/// In-region flag: true iff the country is one of the configured
/// spellings. Never absent.
pub fn derive_in_region(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let countries =
        column_strings(df, fields::COUNTRY).unwrap_or_else(|| vec![String::new(); df.height()]);
    let flags: Vec<String> = countries
        .iter()
        .map(|cell| {
            let hit = normalize(cell)
                .map(|value| ctx.config.in_region_countries.contains(&value))
                .unwrap_or(false);
            if hit { "true" } else { "false" }.to_string()
        })
        .collect();
    set_string_column(df, fields::IN_REGION, flags)
}

/// Clear the working section for respondents whose cleaned career stage is
/// the student / new grad / career break label.
pub fn blank_working_section(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(stages) = column_strings(df, fields::CAREER_STAGE_CLEAN) else {
        return Ok(());
    };
    let student: Vec<bool> = stages
        .iter()
        .map(|cell| cell == &ctx.config.career_stage_student)
        .collect();
    let mut blanked = 0usize;
    for field in &ctx.config.working_section {
        let Some(mut values) = column_strings(df, field) else {
            continue;
        };
        for (idx, cell) in values.iter_mut().enumerate() {
            if student[idx] && !cell.is_empty() {
                cell.clear();
                blanked += 1;
            }
        }
        set_string_column(df, field, values)?;
    }
    debug!(blanked, "cleared working-section answers for non-working respondents");
    Ok(())
}

/// Apply a field's rule bundle to its own column, in place.
pub fn recode_with_rules(df: &mut DataFrame, field: &str, rules: &FieldRules) -> Result<()> {
    let Some(mut values) = column_strings(df, field) else {
        return Ok(());
    };
    for cell in &mut values {
        *cell = rules.apply(cell).unwrap_or_default();
    }
    set_string_column(df, field, values)
}

/// Apply the compiled rule bundle for `field` when one exists; otherwise
/// the column passes through normalization only.
pub fn recode_single_field(df: &mut DataFrame, ctx: &PipelineContext, field: &str) -> Result<()> {
    match ctx.field_rules(field) {
        Some(rules) => recode_with_rules(df, field, rules),
        None => {
            let Some(mut values) = column_strings(df, field) else {
                return Ok(());
            };
            for cell in &mut values {
                *cell = normalize(cell).unwrap_or_default();
            }
            set_string_column(df, field, values)
        }
    }
}

/// A salary answer without a work-type answer gets "Unspecified" rather
/// than staying blank.
pub fn fill_typework_if_salary(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    if !has_column(df, fields::TYPE_WORK) || !has_column(df, fields::SALARY) {
        return Ok(());
    }
    let mut typework = column_strings(df, fields::TYPE_WORK).unwrap_or_default();
    for (idx, cell) in typework.iter_mut().enumerate() {
        let salary = column_value_string(df, fields::SALARY, idx);
        if is_blank(cell) && !is_blank(&salary) {
            *cell = ctx.config.typework_fill_with_salary.clone();
        }
    }
    set_string_column(df, fields::TYPE_WORK, typework)
}

/// Group the cleaned primary role into its category.
///
/// Absent role, absent group. A role that matches no category lands in
/// the configured catch-all bucket, which is deliberately distinct from
/// absent.
pub fn derive_role_group(df: &mut DataFrame, ctx: &PipelineContext) -> Result<()> {
    let Some(roles) = column_strings(df, fields::DATA_ROLE) else {
        return Ok(());
    };
    let groups: Vec<String> = roles
        .iter()
        .map(|cell| {
            let Some(role) = normalize(cell) else {
                return String::new();
            };
            ctx.config
                .role_groups
                .iter()
                .find(|(_, members)| members.iter().any(|member| member == &role))
                .map(|(group, _)| group.clone())
                .unwrap_or_else(|| ctx.config.role_group_other.clone())
        })
        .collect();
    set_string_column(df, fields::ROLE_GROUP, groups)
}

/// A team-size answer is meaningless without a role answer.
pub fn blank_team_size_if_no_role(df: &mut DataFrame) -> Result<()> {
    if !has_column(df, fields::TEAM_SIZE) || !has_column(df, fields::DATA_ROLE) {
        return Ok(());
    }
    let mut sizes = column_strings(df, fields::TEAM_SIZE).unwrap_or_default();
    for (idx, cell) in sizes.iter_mut().enumerate() {
        let role = column_value_string(df, fields::DATA_ROLE, idx);
        if is_blank(&role) {
            cell.clear();
        }
    }
    set_string_column(df, fields::TEAM_SIZE, sizes)
}
