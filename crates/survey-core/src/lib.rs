pub mod context;
pub mod coords;
pub mod data_utils;
pub mod dedupe;
pub mod explode;
pub mod ids;
pub mod pipeline;
pub mod recode;
pub mod rules;
pub mod tables;
pub mod text;

pub use context::PipelineContext;
pub use coords::impute_coordinates;
pub use data_utils::{
    any_to_string, column_strings, column_value_string, format_numeric, has_column, parse_f64,
    set_string_column,
};
pub use dedupe::{dedupe_respondents, drop_excluded_cities};
pub use explode::{explode_field, standardize_tokens_in_place};
pub use ids::{IdSource, SequenceIdSource, UuidIdSource};
pub use pipeline::{CleaningStep, StepState, SurveyPipeline, build_default_pipeline};
pub use rules::{ExactRules, FieldRules, RegexRules, ValueSet};
pub use tables::{SurveyFrame, SurveyTables, assemble_tables};
pub use text::{is_all_caps, is_blank, normalize, title_case, word_count};
