//! Raw rule-table specifications.
//!
//! These are plain data: compilation into matchers lives in `survey-core`.
//! A rule whose `canonical` is `None` maps the matched value to the absent
//! state rather than to any literal text.

/// One ordered regex rule: first matching pattern in table order wins.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RuleSpec {
    /// Regex pattern, matched case-insensitively from the start of the value.
    pub pattern: String,
    /// Canonical replacement; `None` blanks the value.
    pub canonical: Option<String>,
}

impl RuleSpec {
    pub fn map(pattern: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            canonical: Some(canonical.into()),
        }
    }

    pub fn blank(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            canonical: None,
        }
    }
}

/// One exact-match rule keyed on the normalized raw value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExactSpec {
    pub raw: String,
    /// Canonical replacement; `None` blanks the value.
    pub canonical: Option<String>,
}

impl ExactSpec {
    pub fn map(raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            canonical: Some(canonical.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rule_serializes_with_null_canonical() {
        let rule = RuleSpec::blank("^Not working$");
        let json = serde_json::to_string(&rule).expect("serialize rule");
        assert!(json.contains("null"));
        let round: RuleSpec = serde_json::from_str(&json).expect("deserialize rule");
        assert_eq!(round, rule);
    }
}
