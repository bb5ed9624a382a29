use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recnorm_core::kinds::FunctionKind;
use recnorm_core::{FunctionRegistry, MapperKind, ReducerKind, SourceKind, Stage};

use crate::types::NormalizeResult;

/// Print the run summary to standard error, keeping standard output for records.
pub fn print_summary(result: &NormalizeResult) {
    eprintln!("Input: {}", result.input.display());
    eprintln!("Config: {}", result.config.display());
    match &result.output {
        Some(path) => eprintln!("Output: {}", path.display()),
        None => eprintln!("Output: <stdout>"),
    }
    eprintln!("{}", summary_table(result));
}

pub fn summary_table(result: &NormalizeResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Input records"), Cell::new(result.input_count)]);
    table.add_row(vec![
        Cell::new("Excluded (no primary key)"),
        count_cell(result.excluded_count, Color::Yellow),
    ]);
    table.add_row(vec![Cell::new("Fields"), Cell::new(result.field_count)]);
    table.add_row(vec![
        Cell::new("Normalized records")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.output_count).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        dim_cell("Elapsed"),
        dim_cell(format!("{} ms", result.elapsed.as_millis())),
    ]);
    table
}

/// Registered functions by stage, built-ins first.
pub fn functions_table(registry: &FunctionRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Name"), header_cell("Origin")]);
    apply_table_style(&mut table);
    let rows = stage_rows::<SourceKind>(registry.source_names())
        .chain(stage_rows::<MapperKind>(registry.mapper_names()))
        .chain(stage_rows::<ReducerKind>(registry.reducer_names()));
    for (stage, name, builtin) in rows {
        let origin = if builtin {
            dim_cell("built-in")
        } else {
            Cell::new("custom").fg(Color::Green)
        };
        table.add_row(vec![Cell::new(stage), Cell::new(name), origin]);
    }
    table
}

fn stage_rows<K: FunctionKind>(names: Vec<String>) -> impl Iterator<Item = (Stage, String, bool)> {
    let mut rows: Vec<_> = names
        .into_iter()
        .map(|name| {
            let builtin = K::from_name(&name).is_builtin();
            (K::STAGE, name, builtin)
        })
        .collect();
    rows.sort_by_key(|(_, name, builtin)| (!*builtin, name.clone()));
    rows.into_iter()
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}
