use std::path::PathBuf;

/// Per-table outcome of one cleaning run.
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    /// Written file path; `None` on dry runs.
    pub path: Option<PathBuf>,
}

/// Outcome of one `clean` invocation.
pub struct CleanResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub respondents: usize,
    pub tables: Vec<TableSummary>,
    pub unique_report: Option<PathBuf>,
    pub dry_run: bool,
}
