//! # Table Module
//!
//! In-memory tabular data: an ordered list of typed columns and row-major cells.
//! Tables are built by the spreadsheet readers, cleaned in place by the
//! operations in [`clean`] and [`projection`], and serialized again by the writers.
pub mod clean;
pub mod column;
pub mod projection;

use crate::spreadsheet::cell::CellValue;
use crate::table::column::normalize_headers;
use crate::table::column::Column;
use crate::table::column::ColumnType;
use std::collections::HashSet;
use thiserror::Error;

/// Errors related to table construction and column selection.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column '{0}' selected more than once")]
    DuplicateColumn(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidthMismatch { row: usize, expected: usize, found: usize },
}

/// A named table of typed columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// Table name, usually the source file name
    pub(crate) name: String,
    /// Column definitions
    pub(crate) columns: Vec<Column>,
    /// Row-major cells, each row has one cell per column
    pub(crate) rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates a table from explicit columns and rows.
    ///
    /// # Errors
    /// Returns an error if a column name repeats or a row does not have one cell per column.
    pub fn new(name: &str, columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Self, TableError> {
        let mut names = HashSet::<&str>::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.to_owned()));
            }
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidthMismatch {
                    row: index,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Table {
            name: name.to_owned(),
            columns,
            rows,
        })
    }

    /// Builds a table from a header row and raw cells, inferring column types.
    /// Rows are padded or truncated to the header width by the caller.
    pub(crate) fn infer(name: &str, headers: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let kinds: Vec<ColumnType> = (0..headers.len())
            .map(|index| ColumnType::detect(rows.iter().map(|row| row[index].candidate_type())))
            .collect();
        for row in rows.iter_mut() {
            for (cell, kind) in row.iter_mut().zip(&kinds) {
                *cell = std::mem::take(cell).cast(*kind);
            }
        }
        Self::with_kinds(name, headers, kinds, rows)
    }

    /// Builds a table whose column types are already known.
    pub(crate) fn with_kinds(name: &str, headers: Vec<String>, kinds: Vec<ColumnType>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = normalize_headers(headers)
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Column { name, kind })
            .collect();
        Table {
            name: name.to_owned(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Position of the column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Iterates over the cells of one column.
    pub fn values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Indexes of the columns whose declared type is numeric.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.kind.is_numeric())
            .map(|(index, _)| index)
            .collect()
    }

    /// Copy of the first `rows` rows.
    pub fn head(&self, rows: usize) -> Table {
        Table {
            name: self.name.to_owned(),
            columns: self.columns.clone(),
            rows: self.rows.iter().take(rows).cloned().collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a table from string literals; empty strings become missing cells.
    pub(crate) fn text_table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::infer(
            "test.csv",
            headers.iter().map(|header| header.to_string()).collect(),
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|value| {
                            if value.is_empty() {
                                CellValue::Missing
                            } else if let Ok(number) = value.parse::<i64>() {
                                CellValue::Int(number)
                            } else if let Ok(number) = value.parse::<f64>() {
                                CellValue::Float(number)
                            } else {
                                CellValue::Text(value.to_string())
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn infer_types_and_normalize_cells() {
        let table = text_table(&["k", "v", "w"], &[&["a", "1", "1.5"], &["b", "", "2"]]);

        assert_eq!(table.columns()[0].kind, ColumnType::Varchar);
        assert_eq!(table.columns()[1].kind, ColumnType::BigInt);
        assert_eq!(table.columns()[2].kind, ColumnType::Double);
        assert_eq!(table.rows()[1][2], CellValue::Float(2.0));
        assert_eq!(table.rows()[1][1], CellValue::Missing);
        assert_eq!(table.numeric_columns(), vec![1, 2]);
    }

    #[test]
    fn huge_integral_floats_stay_double() {
        let table = Table::infer(
            "big.xlsx",
            vec!["v".to_owned()],
            vec![vec![CellValue::Float(1e20)], vec![CellValue::Float(2.0)]],
        );
        assert_eq!(table.columns()[0].kind, ColumnType::Double);
        assert_eq!(table.rows()[0][0].as_f64(), Some(1e20));
        assert_eq!(table.rows()[1][0], CellValue::Float(2.0));
    }

    #[test]
    fn times_mixed_with_timestamps_become_text() {
        let datetime = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        let time = chrono::NaiveTime::from_hms_opt(4, 5, 6).unwrap();
        let table = Table::infer(
            "mixed.xlsx",
            vec!["at".to_owned()],
            vec![vec![CellValue::DateTime(datetime)], vec![CellValue::Time(time)]],
        );
        assert_eq!(table.columns()[0].kind, ColumnType::Varchar);
        assert_eq!(table.rows()[0][0], CellValue::Text("2024-01-01 01:02:03".to_owned()));
        assert_eq!(table.rows()[1][0], CellValue::Text("04:05:06".to_owned()));
    }

    #[test]
    fn dates_mixed_with_timestamps_become_timestamps() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table = Table::infer(
            "mixed.xlsx",
            vec!["at".to_owned()],
            vec![
                vec![CellValue::Date(date)],
                vec![CellValue::DateTime(date.and_hms_opt(6, 0, 0).unwrap())],
            ],
        );
        assert_eq!(table.columns()[0].kind, ColumnType::Timestamp);
        assert_eq!(table.rows()[0][0], CellValue::DateTime(date.and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let columns = vec![Column::new("a", ColumnType::BigInt), Column::new("b", ColumnType::BigInt)];
        let result = Table::new("t", columns, vec![vec![CellValue::Int(1)]]);
        assert!(matches!(result, Err(TableError::RowWidthMismatch { row: 0, expected: 2, found: 1 })));
    }

    #[test]
    fn new_rejects_repeated_columns() {
        let columns = vec![Column::new("a", ColumnType::BigInt), Column::new("a", ColumnType::BigInt)];
        assert!(matches!(Table::new("t", columns, vec![]), Err(TableError::DuplicateColumn(_))));
    }

    #[test]
    fn head_takes_leading_rows() {
        let table = text_table(&["v"], &[&["1"], &["2"], &["3"]]);
        let head = table.head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.rows()[1][0], CellValue::Int(2));
        assert_eq!(table.head(10).row_count(), 3);
    }
}
