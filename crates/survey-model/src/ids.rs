use std::fmt;

use crate::SurveyError;

/// Stable respondent identifier.
///
/// Assigned once when a row enters the pipeline and never reassigned.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RespondentId(String);

impl RespondentId {
    pub fn new(value: impl Into<String>) -> Result<Self, SurveyError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SurveyError::InvalidRespondentId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
