//! Text grid preview of the leading rows of a table.

use crate::table::Table;
use std::fmt::Write;

/// Renders `table` as an aligned text grid with a leading row index column.
pub fn render_grid(table: &Table) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.row_count() + 1);
    let mut header = vec![String::new()];
    header.extend(table.columns().iter().map(|column| column.name.to_owned()));
    grid.push(header);
    for (index, row) in table.rows().iter().enumerate() {
        let mut line = vec![index.to_string()];
        line.extend(row.iter().map(|cell| if cell.is_missing() { "NaN".to_owned() } else { cell.to_string() }));
        grid.push(line);
    }

    let widths: Vec<usize> = (0..grid[0].len())
        .map(|col| grid.iter().map(|line| line[col].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for line in &grid {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:>width$}"))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Lists the columns with their types, e.g. `k: text, v: float64`.
pub fn render_columns(table: &Table) -> String {
    table
        .columns()
        .iter()
        .map(|column| format!("{}: {}", column.name, column.kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
