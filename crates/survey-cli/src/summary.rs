//! Run summary rendering with `comfy-table`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::CleanResult;

pub fn print_summary(result: &CleanResult) {
    println!("Input: {}", result.input.display());
    if result.dry_run {
        println!("Output: (dry run, nothing written)");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.unique_report {
        println!("Unique-value report: {}", path.display());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("File"),
    ]);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for summary in &result.tables {
        let file = summary
            .path
            .as_ref()
            .map_or_else(|| "-".to_string(), |path| path.display().to_string());
        table.add_row(vec![
            Cell::new(&summary.name),
            Cell::new(summary.rows),
            Cell::new(file),
        ]);
    }
    table.add_row(vec![
        Cell::new("respondents")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.respondents).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("{table}");
}

pub fn print_fields(column_map: &[(&str, &str)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![header_cell("Field"), header_cell("Export header")]);
    for (raw, field) in column_map {
        table.add_row(vec![Cell::new(field), Cell::new(raw)]);
    }
    println!("{table}");
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}
