use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use evalreport::report::{FlatTable, ReportTable, Value};
use evalreport::store::Method;

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::new("-").fg(Color::DarkGrey),
        Value::Float(f) => Cell::new(format!("{:.4}", f)),
        other => Cell::new(other.to_string()),
    }
}

pub fn print_report_table(report: &ReportTable) {
    if report.is_empty() {
        println!("\n(no data set produced a score)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new(report.index_name()).add_attribute(Attribute::Bold)];
    header.extend(
        report
            .columns()
            .iter()
            .map(|c| Cell::new(format!("{}\n{}", c.field, c.method)).fg(Color::Cyan)),
    );
    table.add_row(header);

    for i in 1..=report.n_cols() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, values) in report.rows() {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        row.extend(values.iter().map(value_cell));
        table.add_row(row);
    }
    println!("\n{}", table);
}

pub fn print_methods(methods: &[Method]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Method").add_attribute(Attribute::Bold),
        Cell::new("#").set_alignment(CellAlignment::Center),
        Cell::new("Data Sets"),
    ]);

    for m in methods {
        table.add_row(vec![
            Cell::new(&m.name).add_attribute(Attribute::Bold),
            Cell::new(m.datasets.len()).set_alignment(CellAlignment::Right),
            Cell::new(m.datasets.join(", ")),
        ]);
    }
    println!("{}", table);
}

pub fn print_flat_table(flat: &FlatTable) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(
        flat.columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cell = Cell::new(name);
                if i == 0 {
                    cell.add_attribute(Attribute::Bold)
                } else {
                    cell.set_alignment(CellAlignment::Center)
                }
            })
            .collect::<Vec<_>>(),
    );

    for row in flat.rows() {
        let cells: Vec<Cell> = row
            .iter()
            .enumerate()
            .map(|(i, v)| match (i, v) {
                (0, v) => Cell::new(v).add_attribute(Attribute::Bold),
                (_, Value::Bool(false)) => Cell::new("no").fg(Color::Red),
                (_, Value::Bool(true)) => Cell::new("yes").fg(Color::Green),
                (_, v) => value_cell(v),
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}
