//! Survey cleaning pipeline with ordered step execution.
//!
//! Each step implements the `CleaningStep` trait and is executed in order
//! over the in-memory respondent frame. The order is load-bearing:
//! deduplication runs before any multi-select explosion, and the working
//! section is blanked after career-stage derivation but before the
//! employer and role recoding that reads those columns.
//!
//! # Example
//!
//! ```ignore
//! use survey_core::pipeline::{build_default_pipeline, StepState};
//!
//! let pipeline = build_default_pipeline();
//! let tables = pipeline.run(&mut df, &ctx, &mut StepState::new())?;
//! ```

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use survey_model::fields;

use crate::context::PipelineContext;
use crate::coords::impute_coordinates;
use crate::dedupe::{dedupe_respondents, drop_excluded_cities};
use crate::explode::{explode_field, standardize_tokens_in_place};
use crate::ids::{IdSource, UuidIdSource};
use crate::recode;
use crate::tables::{SurveyFrame, SurveyTables, assemble_tables, clean_comms};

/// A single step in the cleaning pipeline.
pub trait CleaningStep: Send + Sync {
    /// Execute this step on the respondent frame (modified in place).
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        state: &mut StepState,
    ) -> Result<()>;

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;

    /// Whether this step should be skipped based on context.
    fn should_skip(&self, _ctx: &PipelineContext) -> bool {
        false
    }
}

/// Mutable state shared across pipeline steps.
pub struct StepState {
    /// Source of fresh respondent identifiers.
    pub id_source: Box<dyn IdSource>,
    /// Junction frames produced by explosion steps, in stage order.
    pub junctions: Vec<SurveyFrame>,
    /// Step execution log for debugging.
    pub executed_steps: Vec<String>,
}

impl StepState {
    pub fn new() -> Self {
        Self {
            id_source: Box::new(UuidIdSource),
            junctions: Vec::new(),
            executed_steps: Vec::new(),
        }
    }

    pub fn with_id_source(mut self, source: Box<dyn IdSource>) -> Self {
        self.id_source = source;
        self
    }
}

impl Default for StepState {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered pipeline of cleaning steps.
pub struct SurveyPipeline {
    steps: Vec<Box<dyn CleaningStep>>,
}

impl Default for SurveyPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn CleaningStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Remove a step by name.
    pub fn remove_step(mut self, step_name: &str) -> Self {
        self.steps.retain(|step| step.step_name() != step_name);
        self
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.step_name()).collect()
    }

    /// Execute all steps in order, then assemble the output model.
    pub fn run(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        state: &mut StepState,
    ) -> Result<SurveyTables> {
        for step in &self.steps {
            if step.should_skip(ctx) {
                continue;
            }
            debug!(step = step.step_name(), rows = df.height(), "running step");
            step.execute(df, ctx, state)?;
            state.executed_steps.push(step.step_name().to_string());
        }
        assemble_tables(df, std::mem::take(&mut state.junctions))
    }
}

// ============================================================================
// Standard Cleaning Steps
// ============================================================================

struct EnsureIdsStep;

impl CleaningStep for EnsureIdsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &PipelineContext,
        state: &mut StepState,
    ) -> Result<()> {
        recode::ensure_ids(df, state.id_source.as_mut())
    }

    fn step_name(&self) -> &str {
        "ensure_ids"
    }
}

struct StripIdentifyingStep;

impl CleaningStep for StripIdentifyingStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::strip_identifying(df, ctx)
    }

    fn step_name(&self) -> &str {
        "strip_identifying"
    }

    fn should_skip(&self, ctx: &PipelineContext) -> bool {
        ctx.config.identifying_fields.is_empty()
    }
}

struct BoundAgesStep;

impl CleaningStep for BoundAgesStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::bound_ages(df, ctx)
    }

    fn step_name(&self) -> &str {
        "bound_ages"
    }
}

struct RecodeGenderStep;

impl CleaningStep for RecodeGenderStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::recode_gender(df, ctx)
    }

    fn step_name(&self) -> &str {
        "recode_gender"
    }
}

struct NormalizeCityStep;

impl CleaningStep for NormalizeCityStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::normalize_city(df, ctx)
    }

    fn step_name(&self) -> &str {
        "normalize_city"
    }
}

struct ImputeCoordinatesStep;

impl CleaningStep for ImputeCoordinatesStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        impute_coordinates(df, ctx)
    }

    fn step_name(&self) -> &str {
        "impute_coordinates"
    }

    fn should_skip(&self, ctx: &PipelineContext) -> bool {
        ctx.coordinates.is_empty()
    }
}

struct DedupeStep;

impl CleaningStep for DedupeStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        drop_excluded_cities(df, ctx)?;
        dedupe_respondents(df, ctx)
    }

    fn step_name(&self) -> &str {
        "deduplicate"
    }
}

struct DeriveSalaryBucketStep;

impl CleaningStep for DeriveSalaryBucketStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::derive_salary_bucket(df, ctx)
    }

    fn step_name(&self) -> &str {
        "derive_salary_bucket"
    }
}

struct DeriveAgeGroupStep;

impl CleaningStep for DeriveAgeGroupStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::derive_age_group(df, ctx)
    }

    fn step_name(&self) -> &str {
        "derive_age_group"
    }
}

struct DeriveCareerStageStep;

impl CleaningStep for DeriveCareerStageStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::derive_career_stage(df, ctx)
    }

    fn step_name(&self) -> &str {
        "derive_career_stage"
    }
}

struct DeriveInRegionStep;

impl CleaningStep for DeriveInRegionStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::derive_in_region(df, ctx)
    }

    fn step_name(&self) -> &str {
        "derive_in_region"
    }
}

struct BlankWorkingSectionStep;

impl CleaningStep for BlankWorkingSectionStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::blank_working_section(df, ctx)
    }

    fn step_name(&self) -> &str {
        "blank_working_section"
    }
}

/// Recode one single-select column through its rule bundle.
struct RecodeFieldStep {
    field: &'static str,
    name: &'static str,
}

impl CleaningStep for RecodeFieldStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::recode_single_field(df, ctx, self.field)
    }

    fn step_name(&self) -> &str {
        self.name
    }
}

/// Explode one multi-select field into a junction frame.
struct ExplodeFieldStep {
    field: &'static str,
    name: &'static str,
}

impl CleaningStep for ExplodeFieldStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        state: &mut StepState,
    ) -> Result<()> {
        let Some(spec) = ctx.config.multi_select(self.field) else {
            return Ok(());
        };
        let junction = explode_field(df, ctx, spec)?;
        state.junctions.push(SurveyFrame {
            name: self.field.to_string(),
            data: junction,
        });
        Ok(())
    }

    fn step_name(&self) -> &str {
        self.name
    }
}

struct FillTypeworkStep;

impl CleaningStep for FillTypeworkStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::fill_typework_if_salary(df, ctx)
    }

    fn step_name(&self) -> &str {
        "fill_typework_if_salary"
    }
}

struct DeriveRoleGroupStep;

impl CleaningStep for DeriveRoleGroupStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::derive_role_group(df, ctx)
    }

    fn step_name(&self) -> &str {
        "derive_role_group"
    }
}

struct BlankTeamSizeStep;

impl CleaningStep for BlankTeamSizeStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        _ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        recode::blank_team_size_if_no_role(df)
    }

    fn step_name(&self) -> &str {
        "blank_team_size_if_no_role"
    }
}

/// Apply lookup-provided rule bundles to single-select columns that have
/// no dedicated step of their own (industry, education, and any other
/// field a lookup directory carries rules for).
struct RecodeLookupFieldsStep;

/// Fields recoded (or exploded) by a dedicated step elsewhere.
const DEDICATED_RULE_FIELDS: &[&str] = &[
    fields::EMPLOYER_TYPE,
    fields::SITE_WORK,
    fields::DATA_ROLE,
    fields::HARDWARE,
    fields::CLOUD_PLATFORMS,
    fields::NONCLOUD_PLATFORMS,
];

impl CleaningStep for RecodeLookupFieldsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        let targets: Vec<String> = ctx
            .rule_field_names()
            .filter(|field| !DEDICATED_RULE_FIELDS.contains(field))
            .filter(|field| ctx.config.multi_select(field).is_none())
            .map(str::to_string)
            .collect();
        for field in targets {
            recode::recode_single_field(df, ctx, &field)?;
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "recode_lookup_fields"
    }
}

/// Standardize the platform columns token-by-token in place; they stay in
/// the main frame and are exploded in the catch-all explosion step.
struct StandardizePlatformsStep;

impl CleaningStep for StandardizePlatformsStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        standardize_tokens_in_place(df, ctx, fields::CLOUD_PLATFORMS)?;
        standardize_tokens_in_place(df, ctx, fields::NONCLOUD_PLATFORMS)
    }

    fn step_name(&self) -> &str {
        "standardize_platform_fields"
    }
}

/// Explode every configured multi-select field not already handled by an
/// earlier dedicated step.
struct ExplodeRemainingStep;

impl CleaningStep for ExplodeRemainingStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        state: &mut StepState,
    ) -> Result<()> {
        for spec in &ctx.config.multi_selects {
            let done = state
                .junctions
                .iter()
                .any(|junction| junction.name == spec.field);
            if done {
                continue;
            }
            let junction = explode_field(df, ctx, spec)?;
            state.junctions.push(SurveyFrame {
                name: spec.field.to_string(),
                data: junction,
            });
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "explode_multi_selects"
    }
}

/// Normalize free-text columns and blank "no"-only communication answers.
struct CleanFreeTextStep;

impl CleaningStep for CleanFreeTextStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &PipelineContext,
        _state: &mut StepState,
    ) -> Result<()> {
        for field in &ctx.config.free_text_fields {
            recode::recode_single_field(df, ctx, field)?;
        }
        clean_comms(df, ctx)
    }

    fn step_name(&self) -> &str {
        "clean_free_text"
    }
}

/// Build the default cleaning pipeline in the documented stage order.
pub fn build_default_pipeline() -> SurveyPipeline {
    SurveyPipeline::new()
        .add_step(Box::new(EnsureIdsStep))
        .add_step(Box::new(StripIdentifyingStep))
        .add_step(Box::new(BoundAgesStep))
        .add_step(Box::new(RecodeGenderStep))
        .add_step(Box::new(NormalizeCityStep))
        .add_step(Box::new(ImputeCoordinatesStep))
        .add_step(Box::new(DedupeStep))
        .add_step(Box::new(DeriveSalaryBucketStep))
        .add_step(Box::new(DeriveAgeGroupStep))
        .add_step(Box::new(DeriveCareerStageStep))
        .add_step(Box::new(DeriveInRegionStep))
        .add_step(Box::new(BlankWorkingSectionStep))
        .add_step(Box::new(RecodeFieldStep {
            field: fields::EMPLOYER_TYPE,
            name: "recode_employer_type",
        }))
        .add_step(Box::new(ExplodeFieldStep {
            field: fields::SUCCESS_METHOD,
            name: "explode_success_method",
        }))
        .add_step(Box::new(FillTypeworkStep))
        .add_step(Box::new(RecodeFieldStep {
            field: fields::SITE_WORK,
            name: "recode_sitework",
        }))
        .add_step(Box::new(RecodeFieldStep {
            field: fields::DATA_ROLE,
            name: "clean_data_role",
        }))
        .add_step(Box::new(DeriveRoleGroupStep))
        .add_step(Box::new(BlankTeamSizeStep))
        .add_step(Box::new(RecodeFieldStep {
            field: fields::HARDWARE,
            name: "recode_hardware",
        }))
        .add_step(Box::new(RecodeLookupFieldsStep))
        .add_step(Box::new(StandardizePlatformsStep))
        .add_step(Box::new(ExplodeRemainingStep))
        .add_step(Box::new(CleanFreeTextStep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order_is_documented_order() {
        let pipeline = build_default_pipeline();
        let names = pipeline.step_names();
        let dedupe = names.iter().position(|name| *name == "deduplicate");
        let explode = names
            .iter()
            .position(|name| *name == "explode_multi_selects");
        assert!(dedupe < explode);
        let career = names.iter().position(|name| *name == "derive_career_stage");
        let blank = names
            .iter()
            .position(|name| *name == "blank_working_section");
        let employer = names
            .iter()
            .position(|name| *name == "recode_employer_type");
        assert!(career < blank);
        assert!(blank < employer);
    }

    #[test]
    fn remove_step_by_name() {
        let pipeline = build_default_pipeline().remove_step("strip_identifying");
        assert!(!pipeline.step_names().contains(&"strip_identifying"));
    }
}
