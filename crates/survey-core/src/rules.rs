//! Rule tables: ordered recoding of normalized values.
//!
//! Two matcher kinds exist. Exact tables are dictionaries keyed on the
//! normalized raw value. Regex tables are ordered lists compiled
//! case-insensitively and anchored at the start of the value; the FIRST
//! rule in table order wins, never the longest or most specific match.
//! In both kinds a rule may map to a canonical string or to the absent
//! state, and a value matching no rule passes through unchanged.

use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::RegexBuilder;

use survey_model::{ExactSpec, RuleSpec};

use crate::text::normalize;

#[derive(Debug, Clone, Default)]
pub struct ExactRules {
    map: HashMap<String, Option<String>>,
}

impl ExactRules {
    pub fn from_specs(specs: &[ExactSpec]) -> Self {
        let mut map = HashMap::new();
        for spec in specs {
            let Some(key) = normalize(&spec.raw) else {
                continue;
            };
            map.insert(key, spec.canonical.clone());
        }
        Self { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Later specs override earlier ones for the same key.
    pub fn extend(&mut self, specs: &[ExactSpec]) {
        for spec in specs {
            let Some(key) = normalize(&spec.raw) else {
                continue;
            };
            self.map.insert(key, spec.canonical.clone());
        }
    }

    /// Normalize, look up, pass through on miss.
    pub fn apply(&self, value: &str) -> Option<String> {
        let normalized = normalize(value)?;
        match self.map.get(&normalized) {
            Some(action) => action.clone(),
            None => Some(normalized),
        }
    }

    /// Raw table access for an already-normalized key.
    /// Outer `None` = no rule; inner `None` = rule maps to absent.
    fn lookup(&self, key: &str) -> Option<&Option<String>> {
        self.map.get(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegexRules {
    rules: Vec<(regex::Regex, Option<String>)>,
}

impl RegexRules {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            // Anchor at the start of the value; a trailing `$` in the
            // pattern still anchors the end.
            let anchored = format!("^(?:{})", spec.pattern);
            let regex = RegexBuilder::new(&anchored)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("compile rule pattern: {}", spec.pattern))?;
            rules.push((regex, spec.canonical.clone()));
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Normalize, scan in declaration order, first match wins, pass
    /// through on miss.
    pub fn apply(&self, value: &str) -> Option<String> {
        let normalized = normalize(value)?;
        for (regex, action) in &self.rules {
            if regex.is_match(&normalized) {
                return action.clone();
            }
        }
        Some(normalized)
    }
}

/// A flat set of normalized values (drop or keep list).
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    values: Vec<String>,
}

impl ValueSet {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: values
                .into_iter()
                .filter_map(|value| normalize(value.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            if let Some(normalized) = normalize(value.as_ref()) {
                if !self.values.contains(&normalized) {
                    self.values.push(normalized);
                }
            }
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match normalize(value) {
            Some(normalized) => self
                .values
                .iter()
                .any(|member| member.eq_ignore_ascii_case(&normalized)),
            None => false,
        }
    }
}

/// The full rule bundle for one field: built-in rules merged with any
/// lookup-file rules for the same field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub exact: ExactRules,
    pub regex: RegexRules,
    pub drop: ValueSet,
    pub keep: ValueSet,
}

impl FieldRules {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.regex.is_empty() && self.drop.is_empty() && self.keep.is_empty()
    }

    /// Apply the bundle to one value.
    ///
    /// Order: normalize, drop set, regex table, exact table, keep set.
    /// Absent stays absent at every point.
    pub fn apply(&self, value: &str) -> Option<String> {
        let normalized = normalize(value)?;
        if self.drop.contains(&normalized) {
            return None;
        }
        let recoded = self.regex.apply(&normalized)?;
        // The regex table may emit a canonical that spells a blank literal
        // on purpose (e.g. the "None" token kept for presence pruning), so
        // the exact table is consulted without re-normalizing the result.
        let recoded = match self.exact.lookup(&recoded) {
            Some(Some(canonical)) => canonical.clone(),
            Some(None) => return None,
            None => recoded,
        };
        if !self.keep.is_empty() && !self.keep.contains(&recoded) {
            return None;
        }
        Some(recoded)
    }
}
