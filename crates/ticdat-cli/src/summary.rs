use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ticdat_model::{DataSet, Schema};

use crate::commands::{ConversionRun, ValidationRun};

pub fn print_schema(schema: &Schema) {
    println!("{}", schema_table(schema));
    if !schema.foreign_keys().is_empty() {
        println!("{}", foreign_key_table(schema));
    }
}

pub fn schema_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Primary key"),
        header_cell("Data fields"),
        header_cell("Predicates"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for declared in schema.tables() {
        let predicates = schema.data_row_predicates(declared.name()).len();
        table.add_row(vec![
            name_cell(declared.name()),
            list_cell(declared.primary_key()),
            list_cell(declared.data_fields()),
            count_cell(predicates, Color::Cyan),
        ]);
    }
    table
}

pub fn foreign_key_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Native table"),
        header_cell("Foreign table"),
        header_cell("Mapping"),
        header_cell("Cardinality"),
    ]);
    apply_table_style(&mut table);
    for fk in schema.foreign_keys() {
        let mapping: Vec<String> = fk
            .mappings
            .iter()
            .map(|pair| format!("{} -> {}", pair.native_field, pair.foreign_field))
            .collect();
        table.add_row(vec![
            name_cell(&fk.native_table),
            name_cell(&fk.foreign_table),
            Cell::new(mapping.join(", ")),
            Cell::new(fk.cardinality),
        ]);
    }
    table
}

pub fn print_validation(run: &ValidationRun) {
    println!("Input: {}", run.input.display());
    println!("{}", validation_table(run));
    if run.has_failures() {
        eprint!("{}", run.report.render_text());
    }
}

/// Rows and failure counts per table, with a total row.
pub fn validation_table(run: &ValidationRun) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Duplicates"),
        header_cell("Foreign keys"),
        header_cell("Data types"),
        header_cell("Predicates"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_rows = 0usize;
    for name in run.data.table_names() {
        let rows = run.data.table(name).map_or(0, ticdat_model::Table::len);
        total_rows += rows;
        let counts = run.report.table_counts(name);
        table.add_row(vec![
            name_cell(name),
            Cell::new(rows),
            count_cell(counts.duplicates, Color::Red),
            count_cell(counts.foreign_keys, Color::Red),
            count_cell(counts.data_types, Color::Red),
            count_cell(counts.data_rows, Color::Yellow),
        ]);
    }
    let counts = run.report.counts();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(counts.duplicates, Color::Red).add_attribute(Attribute::Bold),
        count_cell(counts.foreign_keys, Color::Red).add_attribute(Attribute::Bold),
        count_cell(counts.data_types, Color::Red).add_attribute(Attribute::Bold),
        count_cell(counts.data_rows, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_conversion(run: &ConversionRun) {
    println!(
        "Wrote {} rows in {} tables to {}",
        run.rows,
        run.tables,
        run.output.display()
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn list_cell(fields: &[String]) -> Cell {
    if fields.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(fields.join(", "))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
