//! # Spreadsheet Processing Module
//!
//! Reading and writing of the supported file formats. Uploaded bytes are
//! parsed into a [`Table`] according to the file extension:
//!
//! - `.csv` - comma separated text, decoded from UTF-8, UTF-16 or Windows-1252
//! - `.xlsx` - Excel 2007+ workbook (first worksheet)
//! - `.xls` - legacy Excel workbook (first worksheet)
//!
//! Tables are written back as CSV or as a single-sheet `.xlsx` package.
pub mod cell;
pub mod csv;
pub mod excel;
pub(crate) mod reference;
pub mod xlsx;

use crate::config::PipelineConfig;
use crate::table::Table;
use calamine::XlsError;
use calamine::XlsxError;
use thiserror::Error;

/// Errors that can occur while detecting or parsing a file.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Unsupported or unrecognized file extension
    #[error("File type {extension} is unsupported")]
    UnsupportedFormat { extension: String },

    /// Error in Excel 2007+ format (.xlsx)
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Error in legacy Excel format (.xls)
    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] XlsError),

    /// Malformed CSV content
    #[error("Invalid csv file format: {0}")]
    InvalidCsvFileFormat(#[from] ::csv::Error),

    /// Workbook contains no worksheet
    #[error("Sheet not found or spreadsheet is empty")]
    SheetNotFound,

    /// Nothing to use as a header row
    #[error("No columns to parse from file")]
    MissingHeaderRow,

    /// A data row has more fields than the header
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields { line: u64, expected: usize, found: usize },
}

/// File formats the pipeline reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Detects the format from a lower-cased extension including the dot.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for anything but `.csv`, `.xlsx` and `.xls`.
    pub fn from_extension(extension: &str) -> Result<Self, SpreadsheetError> {
        match extension {
            ".csv" => Ok(FileFormat::Csv),
            ".xlsx" => Ok(FileFormat::Xlsx),
            ".xls" => Ok(FileFormat::Xls),
            _ => Err(SpreadsheetError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_owned()
                } else {
                    extension.to_owned()
                },
            }),
        }
    }

    /// Parses file content of this format into a table named `name`.
    pub fn read(&self, name: &str, data: &[u8], config: &PipelineConfig) -> Result<Table, SpreadsheetError> {
        match self {
            FileFormat::Csv => csv::read_csv(name, data, &config.null_values),
            FileFormat::Xlsx => excel::read_xlsx(name, data),
            FileFormat::Xls => excel::read_xls(name, data),
        }
    }
}
