//! CLI argument definitions for the survey cleaner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey-cleaner",
    version,
    about = "Survey cleaner - normalize raw survey exports into a relational model",
    long_about = "Clean a raw survey CSV export: recode free-text answers through \n\
                  rule tables, bound ages, deduplicate repeat submissions, explode \n\
                  multi-select answers into junction tables, and write the resulting \n\
                  single/location/free-text/junction tables as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a survey export and write the output tables.
    Clean(CleanArgs),

    /// List the known survey fields and their raw export headers.
    Fields,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Path to the raw survey export CSV.
    #[arg(value_name = "EXPORT_CSV")]
    pub input: PathBuf,

    /// Directory with per-field lookup files (exact/regex/drop/keep tables).
    #[arg(long = "lookup-dir", value_name = "DIR")]
    pub lookup_dir: Option<PathBuf>,

    /// Output directory for cleaned tables (default: <EXPORT_CSV dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Assign sequential respondent ids (R0001, ...) instead of random UUIDs.
    ///
    /// Random ids are the default so that re-runs never collide with ids
    /// already handed out; sequential ids make runs reproducible.
    #[arg(long = "seq-ids")]
    pub seq_ids: bool,

    /// Skip the unique-value report.
    #[arg(long = "no-unique-report")]
    pub no_unique_report: bool,

    /// Clean and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
