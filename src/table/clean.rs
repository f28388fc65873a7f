//! Cleaning operations: duplicate row removal and mean imputation.

use crate::spreadsheet::cell::CellKey;
use crate::spreadsheet::cell::CellValue;
use crate::table::column::ColumnType;
use crate::table::Table;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of filling one numeric column.
#[derive(Clone, Debug, PartialEq)]
pub struct FilledColumn {
    pub column: String,
    /// Number of cells that were missing and got the mean
    pub cells: usize,
    pub mean: f64,
}

/// Outcome of [`Table::fill_missing_numeric`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FillReport {
    /// Columns where at least one cell was filled
    pub filled: Vec<FilledColumn>,
    /// Numeric columns with no values at all; their mean is undefined and nothing was filled
    pub empty_columns: Vec<String>,
}

impl FillReport {
    pub fn filled_cells(&self) -> usize {
        self.filled.iter().map(|column| column.cells).sum()
    }
}

impl Table {
    /// Removes rows that exactly repeat an earlier row, keeping first occurrences in order.
    ///
    /// # Returns
    /// Number of rows removed
    pub fn remove_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::<Vec<CellKey>>::with_capacity(before);
        let mut keep = Vec::<bool>::with_capacity(before);
        for row in &self.rows {
            keep.push(seen.insert(row.iter().map(CellValue::key).collect()));
        }
        drop(seen);

        let mut flags = keep.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(true));
        let removed = before - self.rows.len();
        debug!(table = %self.name, removed, "removed duplicate rows");
        removed
    }

    /// Replaces missing cells of numeric columns with the column mean.
    /// The mean is taken over the values present before any cell is filled.
    /// Non-numeric columns are left untouched.
    pub fn fill_missing_numeric(&mut self) -> FillReport {
        let mut report = FillReport::default();
        for index in self.numeric_columns() {
            let name = self.columns[index].name.to_owned();
            let values: Vec<f64> = self.values(index).filter_map(CellValue::as_f64).collect();
            let missing = self.values(index).filter(|cell| cell.is_missing()).count();
            if missing == 0 {
                continue;
            }
            if values.is_empty() {
                debug!(table = %self.name, column = %name, "numeric column has no values, mean undefined");
                report.empty_columns.push(name);
                continue;
            }

            let mean = values.iter().sum::<f64>() / values.len() as f64;
            self.columns[index].kind = ColumnType::Double;
            for row in self.rows.iter_mut() {
                let cell = std::mem::take(&mut row[index]);
                row[index] = match cell {
                    CellValue::Missing => CellValue::Float(mean),
                    value => value.cast(ColumnType::Double),
                };
            }
            debug!(table = %self.name, column = %name, cells = missing, mean, "filled missing values");
            report.filled.push(FilledColumn {
                column: name,
                cells: missing,
                mean,
            });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use crate::spreadsheet::cell::CellValue;
    use crate::table::column::Column;
    use crate::table::column::ColumnType;
    use crate::table::tests::text_table;
    use crate::table::Table;

    #[test]
    fn remove_duplicates_keeps_first_occurrences() {
        let mut table = text_table(&["k", "v"], &[&["a", "1"], &["a", "1"], &["b", "2"]]);
        assert_eq!(table.remove_duplicates(), 1);

        let expected = text_table(&["k", "v"], &[&["a", "1"], &["b", "2"]]);
        assert_eq!(table, expected);
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let mut table = text_table(
            &["k", "v"],
            &[&["b", "2"], &["a", ""], &["b", "2"], &["a", ""], &["a", "3"], &["b", "2"]],
        );
        table.remove_duplicates();
        let once = table.clone();
        assert_eq!(table.remove_duplicates(), 0);
        assert_eq!(table, once);
        assert_eq!(once.row_count(), 3);
    }

    #[test]
    fn remove_duplicates_compares_all_columns() {
        let mut table = text_table(&["k", "v"], &[&["a", "1"], &["a", "2"]]);
        assert_eq!(table.remove_duplicates(), 0);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn fill_uses_mean_before_replacement() {
        let mut table = text_table(&["v", "s"], &[&["1", "x"], &["", ""], &["3", "y"], &["", "z"]]);
        let report = table.fill_missing_numeric();

        assert_eq!(report.filled.len(), 1);
        assert_eq!(report.filled[0].cells, 2);
        assert_eq!(report.filled[0].mean, 2.0);
        let values: Vec<f64> = table.values(0).filter_map(CellValue::as_f64).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 2.0]);
        assert_eq!(table.columns()[0].kind, ColumnType::Double);
        // text columns keep their gaps
        assert_eq!(table.rows()[1][1], CellValue::Missing);
    }

    #[test]
    fn fill_leaves_complete_columns_alone() {
        let mut table = text_table(&["v"], &[&["1"], &["2"]]);
        let before = table.clone();
        let report = table.fill_missing_numeric();
        assert!(report.filled.is_empty());
        assert_eq!(table, before);
    }

    #[test]
    fn fill_reports_empty_numeric_column() {
        let columns = vec![Column::new("v", ColumnType::Double)];
        let mut table = Table::new("t", columns, vec![vec![CellValue::Missing], vec![CellValue::Missing]]).unwrap();
        let report = table.fill_missing_numeric();

        assert_eq!(report.empty_columns, vec!["v".to_owned()]);
        assert!(table.values(0).all(CellValue::is_missing));
    }
}
