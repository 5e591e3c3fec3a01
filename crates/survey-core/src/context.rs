//! Shared, read-only state for one pipeline run.
//!
//! All rule tables are compiled once here, before processing begins, and
//! shared immutably across every stage.

use std::collections::BTreeMap;

use anyhow::Result;

use survey_ingest::Lookups;
use survey_model::{CoordinateEntry, ExactSpec, PipelineConfig, RuleSpec, fields};

use crate::rules::{ExactRules, FieldRules, RegexRules, ValueSet};

#[derive(Debug)]
pub struct PipelineContext {
    pub config: PipelineConfig,
    field_rules: BTreeMap<String, FieldRules>,
    pub salary_bins: ExactRules,
    pub career_stage_rules: RegexRules,
    pub coordinates: Vec<CoordinateEntry>,
}

impl PipelineContext {
    pub fn new(config: PipelineConfig, lookups: &Lookups) -> Result<Self> {
        let mut field_rules = BTreeMap::new();

        // Built-in single-field tables.
        let builtin_regex: &[(&str, &[RuleSpec])] = &[
            (fields::EMPLOYER_TYPE, &config.employer_regex),
            (fields::SITE_WORK, &config.sitework_regex),
            (fields::DATA_ROLE, &config.data_role_regex),
            (fields::HARDWARE, &config.hardware_regex),
            (fields::CLOUD_PLATFORMS, &config.platform_regex),
            (fields::NONCLOUD_PLATFORMS, &config.platform_regex),
        ];
        for (field, specs) in builtin_regex {
            let bundle = field_rules
                .entry((*field).to_string())
                .or_insert_with(FieldRules::default);
            bundle.regex = RegexRules::compile(specs)?;
        }

        // Multi-select token tables.
        for spec in &config.multi_selects {
            let bundle = field_rules
                .entry(spec.field.to_string())
                .or_insert_with(FieldRules::default);
            let mut regex_specs = spec.regex.clone();
            let mut exact_specs: Vec<ExactSpec> = spec.exact.clone();
            let mut drop_values = spec.drop.clone();
            let mut keep_values = spec.keep.clone();
            if let Some(lookup) = lookups.field(spec.field) {
                regex_specs.extend(lookup.regex.iter().cloned());
                exact_specs.extend(lookup.exact.iter().cloned());
                drop_values.extend(lookup.drop.iter().cloned());
                keep_values.extend(lookup.keep.iter().cloned());
            }
            bundle.regex = RegexRules::compile(&regex_specs)?;
            bundle.exact = ExactRules::from_specs(&exact_specs);
            bundle.drop = ValueSet::from_values(&drop_values);
            bundle.keep = ValueSet::from_values(&keep_values);
        }

        // Lookup files for fields without built-in tables; for fields that
        // have both, built-in rules come first and lookup rules extend them.
        for (field, lookup) in &lookups.fields {
            if config.multi_select(field).is_some() {
                continue;
            }
            let bundle = field_rules
                .entry(field.clone())
                .or_insert_with(FieldRules::default);
            if !lookup.regex.is_empty() {
                let mut merged = builtin_regex
                    .iter()
                    .find(|(name, _)| name == field)
                    .map(|(_, specs)| specs.to_vec())
                    .unwrap_or_default();
                merged.extend(lookup.regex.iter().cloned());
                bundle.regex = RegexRules::compile(&merged)?;
            }
            if !lookup.exact.is_empty() {
                bundle.exact.extend(&lookup.exact);
            }
            if !lookup.drop.is_empty() {
                bundle.drop.extend(&lookup.drop);
            }
            if !lookup.keep.is_empty() {
                bundle.keep.extend(&lookup.keep);
            }
        }

        let salary_bins = ExactRules::from_specs(&config.salary_bins);
        let career_stage_rules = RegexRules::compile(&config.career_stage_regex)?;

        let mut coordinates = config.coordinates.clone();
        coordinates.extend(lookups.coordinates.iter().cloned());

        Ok(Self {
            config,
            field_rules,
            salary_bins,
            career_stage_rules,
            coordinates,
        })
    }

    /// Rule bundle for a field; `None` means normalization only.
    pub fn field_rules(&self, field: &str) -> Option<&FieldRules> {
        self.field_rules.get(field).filter(|rules| !rules.is_empty())
    }

    /// Every field that has a non-empty rule bundle, in name order.
    pub fn rule_field_names(&self) -> impl Iterator<Item = &str> {
        self.field_rules
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(field, _)| field.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_compiles() {
        let ctx = PipelineContext::new(PipelineConfig::default(), &Lookups::default())
            .expect("compile default rules");
        assert!(ctx.field_rules(fields::EMPLOYER_TYPE).is_some());
        assert!(ctx.field_rules(fields::SUCCESS_METHOD).is_some());
        assert!(ctx.field_rules(fields::GENDER).is_none());
    }

    #[test]
    fn missing_lookup_means_no_rules_not_an_error() {
        let ctx = PipelineContext::new(PipelineConfig::default(), &Lookups::default())
            .expect("compile");
        assert!(ctx.field_rules("industry").is_none());
    }
}
