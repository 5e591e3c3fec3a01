//! Command implementations.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use survey_cli::report::{write_table_csv, write_unique_report};
use survey_core::pipeline::{StepState, build_default_pipeline};
use survey_core::{PipelineContext, SequenceIdSource};
use survey_ingest::{load_lookups, read_survey_frame};
use survey_model::{PipelineConfig, fields};

use crate::cli::CleanArgs;
use crate::types::{CleanResult, TableSummary};

/// Run the cleaning pipeline over one export file.
pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let config = PipelineConfig::default();

    let lookup_fields = lookup_field_names(&config);
    let lookups = load_lookups(args.lookup_dir.as_deref(), &lookup_fields)
        .context("load lookup tables")?;

    let mut frame = read_survey_frame(&args.input, &config)
        .with_context(|| format!("read survey export: {}", args.input.display()))?;
    info!(
        rows = frame.height(),
        columns = frame.width(),
        input = %args.input.display(),
        "survey export loaded"
    );

    let ctx = PipelineContext::new(config, &lookups)?;
    let mut state = StepState::new();
    if args.seq_ids {
        state = state.with_id_source(Box::new(SequenceIdSource::new()));
    }
    let tables = build_default_pipeline().run(&mut frame, &ctx, &mut state)?;
    debug!(
        steps = state.executed_steps.len(),
        "cleaning pipeline finished"
    );

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output"),
    };

    let mut summaries = Vec::new();
    for table in tables.all() {
        let path = if args.dry_run {
            None
        } else {
            Some(write_table_csv(&output_dir, table)?)
        };
        summaries.push(TableSummary {
            name: table.name.clone(),
            rows: table.data.height(),
            path,
        });
    }

    let unique_report = if args.dry_run || args.no_unique_report {
        None
    } else {
        Some(write_unique_report(&output_dir, &tables)?)
    };

    info!(
        respondents = tables.single.data.height(),
        tables = summaries.len(),
        "cleaning run complete"
    );
    Ok(CleanResult {
        input: args.input.clone(),
        output_dir,
        respondents: tables.single.data.height(),
        tables: summaries,
        unique_report,
        dry_run: args.dry_run,
    })
}

/// Print the field catalog (raw export header to short field name).
pub fn run_fields() -> Result<()> {
    crate::summary::print_fields(fields::COLUMN_MAP);
    Ok(())
}

/// Every field name a lookup file may exist for.
fn lookup_field_names(config: &PipelineConfig) -> Vec<String> {
    let mut names: BTreeSet<String> = config
        .column_map
        .iter()
        .map(|(_, field)| (*field).to_string())
        .collect();
    for spec in &config.multi_selects {
        names.insert(spec.field.to_string());
    }
    names.into_iter().collect()
}
