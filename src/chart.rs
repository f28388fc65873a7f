//! Bar chart of the numeric columns of a table.

use crate::spreadsheet::cell::to_float_string;
use crate::spreadsheet::cell::CellValue;
use crate::table::Table;
use std::fmt::Write;

/// One bar series, the values of a numeric column.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One value per row, `None` for missing cells
    pub values: Vec<Option<f64>>,
}

/// Bar chart request: a label per row and a series per numeric column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSpec {
    /// Row index labels
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Builds a bar chart of every numeric column. The table is not modified.
pub fn visualize(table: &Table) -> ChartSpec {
    let series = table
        .numeric_columns()
        .into_iter()
        .map(|index| ChartSeries {
            name: table.columns()[index].name.to_owned(),
            values: table.values(index).map(CellValue::as_f64).collect(),
        })
        .collect();
    ChartSpec {
        labels: (0..table.row_count()).map(|row| row.to_string()).collect(),
        series,
    }
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Draws the chart as horizontal text bars, one block per series.
    /// At most `rows` rows are drawn; the largest magnitude spans `width` characters.
    pub fn render_text(&self, rows: usize, width: usize) -> String {
        let mut out = String::new();
        if self.is_empty() {
            out.push_str("(no numeric columns to chart)\n");
            return out;
        }

        let label_width = self.labels.iter().take(rows).map(String::len).max().unwrap_or(0);
        for series in &self.series {
            let scale = series
                .values
                .iter()
                .take(rows)
                .flatten()
                .fold(0f64, |max, value| max.max(value.abs()));
            let _ = writeln!(out, "{}", series.name);
            for (label, value) in self.labels.iter().zip(&series.values).take(rows) {
                let _ = match value {
                    Some(value) => {
                        let length = if scale > 0.0 {
                            (value.abs() / scale * width as f64).round() as usize
                        } else {
                            0
                        };
                        let bar = if *value < 0.0 { "-" } else { "#" }.repeat(length);
                        writeln!(out, "  {label:>label_width$} | {bar} {}", to_float_string(*value))
                    }
                    None => writeln!(out, "  {label:>label_width$} |"),
                };
            }
            if self.labels.len() > rows {
                let _ = writeln!(out, "  ... {} more rows", self.labels.len() - rows);
            }
        }
        out
    }
}
