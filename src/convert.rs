//! Conversion of a cleaned table into a downloadable file.

use crate::error::DataCleanerError;
use crate::spreadsheet::csv::write_csv;
use crate::spreadsheet::xlsx::write_xlsx;
use crate::table::Table;
use std::fmt::Display;
use std::io::Cursor;
use std::str::FromStr;
use tracing::debug;

/// Output formats offered for conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Excel,
}

impl Format {
    /// File extension of the converted file, including the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            Format::Csv => ".csv",
            Format::Excel => ".xlsx",
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        match self {
            Format::Csv => "text/csv",
            Format::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "excel" | "xlsx" => Ok(Format::Excel),
            _ => Err(format!("unknown output format '{value}', expected csv or excel")),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Excel => write!(f, "Excel"),
        }
    }
}

/// A converted table, ready to be downloaded.
#[derive(Debug)]
pub struct ConvertedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    /// File content, positioned at its start
    pub data: Cursor<Vec<u8>>,
}

impl ConvertedFile {
    pub fn bytes(&self) -> &[u8] {
        self.data.get_ref()
    }
}

/// Serializes `table` in `format`. The file name is `source_name` with its
/// extension replaced by the format's extension.
pub fn convert(table: &Table, source_name: &str, format: Format) -> Result<ConvertedFile, DataCleanerError> {
    let data = match format {
        Format::Csv => write_csv(table)?,
        Format::Excel => write_xlsx(table)?,
    };
    debug!(table = %table.name(), format = %format, bytes = data.len(), "converted table");
    Ok(ConvertedFile {
        file_name: replace_extension(source_name, format.extension()),
        mime_type: format.mime_type(),
        data: Cursor::new(data),
    })
}

/// Replaces the trailing extension of `name`, matched case-insensitively.
/// Only the last suffix is touched, so `a.csv.csv` becomes `a.csv.xlsx`.
fn replace_extension(name: &str, extension: &str) -> String {
    let stem = match name.rfind('.') {
        // a leading dot starts a hidden file name, not an extension
        Some(index) if index > 0 && !name[..index].ends_with(['/', '\\']) => &name[..index],
        _ => name,
    };
    format!("{stem}{extension}")
}
