//! Microsoft Office Excel reading (first worksheet of `.xlsx` and `.xls` workbooks).

use crate::spreadsheet::cell::from_serial_fraction;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Table;
use calamine::Data;
use calamine::Range;
use calamine::Reader;
use calamine::Xls;
use calamine::Xlsx;
use chrono::NaiveDateTime;
use std::io::Cursor;
use tracing::debug;

/// Parses an Excel 2007+ workbook.
pub fn read_xlsx(name: &str, data: &[u8]) -> Result<Table, SpreadsheetError> {
    let mut workbook = Xlsx::new(Cursor::new(data))?;
    let range = workbook.worksheet_range_at(0).ok_or(SpreadsheetError::SheetNotFound)??;
    range_to_table(name, range)
}

/// Parses a legacy Excel 97-2003 workbook.
pub fn read_xls(name: &str, data: &[u8]) -> Result<Table, SpreadsheetError> {
    let mut workbook = Xls::new(Cursor::new(data))?;
    let range = workbook.worksheet_range_at(0).ok_or(SpreadsheetError::SheetNotFound)??;
    range_to_table(name, range)
}

/// Converts the used range of a worksheet to a table.
/// The first row of the range is the header row.
fn range_to_table(name: &str, range: Range<Data>) -> Result<Table, SpreadsheetError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(SpreadsheetError::MissingHeaderRow)?
        .iter()
        .map(header_name)
        .collect();
    if headers.is_empty() {
        return Err(SpreadsheetError::MissingHeaderRow);
    }

    let cells: Vec<Vec<CellValue>> = rows
        .map(|row| {
            let mut record: Vec<CellValue> = row.iter().map(to_cell).collect();
            record.resize(headers.len(), CellValue::Missing);
            record
        })
        .collect();
    debug!(file = name, columns = headers.len(), rows = cells.len(), "parsed worksheet");
    Ok(Table::infer(name, headers, cells))
}

/// Header text of a cell. Numeric headers keep their shortest form, so `2024` stays `2024`.
fn header_name(value: &Data) -> String {
    match to_cell(value) {
        CellValue::Missing => String::new(),
        CellValue::Float(number) => number.to_string(),
        cell => cell.to_string(),
    }
}

/// Converts a worksheet cell to a table cell.
///
/// Date-time serials are classified the same way Excel displays them:
/// below one day is a time, no fractional part is a date, anything else a timestamp.
fn to_cell(value: &Data) -> CellValue {
    match value {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::Bool(value) => CellValue::Bool(*value),
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) if value.is_nan() => CellValue::Missing,
        Data::Float(value) => CellValue::Float(*value),
        Data::String(value) if value.is_empty() => CellValue::Missing,
        Data::String(value) => CellValue::Text(value.to_owned()),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            if value.is_duration() {
                CellValue::Float(serial)
            } else if (0.0..1.0).contains(&serial) {
                CellValue::Time(from_serial_fraction(serial))
            } else {
                match value.as_datetime() {
                    Some(datetime) if serial.fract() == 0.0 => CellValue::Date(datetime.date()),
                    Some(datetime) => CellValue::DateTime(datetime),
                    None => CellValue::Float(serial),
                }
            }
        }
        Data::DateTimeIso(value) => parse_iso_datetime(value)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(value.to_owned())),
        Data::DurationIso(value) => CellValue::Text(value.to_owned()),
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_datetimes() {
        let datetime = parse_iso_datetime("2024-05-06T07:08:09").unwrap();
        assert_eq!(datetime.to_string(), "2024-05-06 07:08:09");
        let date = parse_iso_datetime("2024-05-06").unwrap();
        assert_eq!(date.to_string(), "2024-05-06 00:00:00");
        assert!(parse_iso_datetime("yesterday").is_none());
    }

    #[test]
    fn worksheet_cells() {
        assert_eq!(to_cell(&Data::Empty), CellValue::Missing);
        assert_eq!(to_cell(&Data::String(String::new())), CellValue::Missing);
        assert_eq!(to_cell(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(to_cell(&Data::String("x".to_owned())), CellValue::Text("x".to_owned()));
    }

    #[test]
    fn numeric_headers_have_no_fraction_marker() {
        assert_eq!(header_name(&Data::Float(2024.0)), "2024");
        assert_eq!(header_name(&Data::Float(1.5)), "1.5");
        assert_eq!(header_name(&Data::Int(7)), "7");
        assert_eq!(header_name(&Data::Empty), "");
        assert_eq!(header_name(&Data::String("name".to_owned())), "name");
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        assert!(matches!(
            read_xlsx("bad.xlsx", b"not a zip archive"),
            Err(SpreadsheetError::InvalidXlsxFileFormat(_))
        ));
        assert!(read_xls("bad.xls", b"not a compound file").is_err());
    }
}
