use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pbcore_map::BatchSummary;

pub fn print_summary(summary: &BatchSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Output"),
        header_cell("Result"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for report in &summary.reports {
        let (output, result) = match (&report.output, &report.error) {
            (Some(name), _) => (
                Cell::new(name),
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
            ),
            (None, Some(error)) => (dim_cell("-"), Cell::new(error).fg(Color::Red)),
            (None, None) => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(report.ordinal), output, result]);
    }
    println!("{table}");
    println!(
        "{} written, {} skipped of {} records",
        summary.written,
        summary.failed,
        summary.reports.len()
    );
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
