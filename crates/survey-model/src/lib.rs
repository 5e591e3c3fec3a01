pub mod config;
pub mod error;
pub mod fields;
pub mod ids;
pub mod rules;

pub use config::{AgeBand, CoordinateEntry, MultiSelectSpec, PipelineConfig};
pub use error::{Result, SurveyError};
pub use ids::RespondentId;
pub use rules::{ExactSpec, RuleSpec};
