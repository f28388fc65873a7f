//! CSV reading and writing.

use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::SpreadsheetError;
use crate::table::column::ColumnType;
use crate::table::Table;
use ::csv::ReaderBuilder;
use ::csv::WriterBuilder;
use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::debug;

/// Decodes raw bytes to text.
/// A BOM selects UTF-8 or UTF-16; otherwise UTF-8 is tried first and Windows-1252 is the fallback.
pub(crate) fn decode(data: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(data) {
        let (text, _) = encoding.decode_without_bom_handling(&data[bom_length..]);
        return text;
    }
    match UTF_8.decode_without_bom_handling_and_without_replacement(data) {
        Some(text) => text,
        None => {
            debug!("input is not valid utf-8, decoding as windows-1252");
            WINDOWS_1252.decode_without_bom_handling(data).0
        }
    }
}

/// Guesses the column type of a single CSV field.
fn candidate_type(value: &str, nulls: &HashSet<String>) -> Option<ColumnType> {
    if nulls.contains(value) {
        return None;
    }
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        Some(ColumnType::Boolean)
    } else if trimmed.parse::<i64>().is_ok() {
        Some(ColumnType::BigInt)
    } else if trimmed.parse::<f64>().map(|number| !number.is_nan()).unwrap_or(false) {
        Some(ColumnType::Double)
    } else {
        Some(ColumnType::Varchar)
    }
}

/// Converts a CSV field to a cell of the given column type.
fn to_cell(value: &str, kind: ColumnType, nulls: &HashSet<String>) -> CellValue {
    if nulls.contains(value) {
        return CellValue::Missing;
    }
    let trimmed = value.trim();
    let cell = match kind {
        ColumnType::Boolean => Some(CellValue::Bool(trimmed.eq_ignore_ascii_case("true"))),
        ColumnType::BigInt => trimmed.parse().ok().map(CellValue::Int),
        ColumnType::Double => trimmed.parse().ok().map(CellValue::Float),
        _ => None,
    };
    cell.unwrap_or_else(|| CellValue::Text(value.to_owned()))
}

/// Parses CSV bytes into a table. The first record is the header row.
///
/// # Errors
/// Fails on malformed quoting, a missing header row, or a data row wider than the header.
pub fn read_csv(name: &str, data: &[u8], nulls: &HashSet<String>) -> Result<Table, SpreadsheetError> {
    let text = decode(data);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(SpreadsheetError::MissingHeaderRow);
    }

    let width = headers.len();
    let mut records = Vec::<Vec<String>>::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            return Err(SpreadsheetError::TooManyFields {
                line: record.position().map(|position| position.line()).unwrap_or_default(),
                expected: width,
                found: record.len(),
            });
        }
        let mut fields: Vec<String> = record.iter().map(str::to_owned).collect();
        fields.resize(width, String::new());
        records.push(fields);
    }

    let kinds: Vec<ColumnType> = (0..width)
        .map(|index| ColumnType::detect(records.iter().map(|fields| candidate_type(&fields[index], nulls))))
        .collect();
    let rows = records
        .iter()
        .map(|fields| {
            fields
                .iter()
                .zip(&kinds)
                .map(|(value, kind)| to_cell(value, *kind, nulls))
                .collect()
        })
        .collect();
    debug!(file = name, columns = width, rows = records.len(), "parsed csv");
    Ok(Table::with_kinds(name, headers, kinds, rows))
}

/// Serializes a table as CSV: header row, then one record per row, no index column.
pub fn write_csv(table: &Table) -> Result<Vec<u8>, ::csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.into_inner().map_err(|error| error.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn read(text: &str) -> Result<Table, SpreadsheetError> {
        read_csv("test.csv", text.as_bytes(), &PipelineConfig::default().null_values)
    }

    #[test]
    fn read_infers_column_types() {
        let table = read("k,v,f,b\na,1,1.5,true\nb,,2,FALSE\n").unwrap();

        let kinds: Vec<ColumnType> = table.columns().iter().map(|column| column.kind).collect();
        assert_eq!(kinds, vec![ColumnType::Varchar, ColumnType::BigInt, ColumnType::Double, ColumnType::Boolean]);
        assert_eq!(table.rows()[0][1], CellValue::Int(1));
        assert_eq!(table.rows()[1][1], CellValue::Missing);
        assert_eq!(table.rows()[1][2], CellValue::Float(2.0));
        assert_eq!(table.rows()[1][3], CellValue::Bool(false));
    }

    #[test]
    fn null_literals_are_missing() {
        let table = read("v,s\n1,NA\nnan,x\n").unwrap();
        assert_eq!(table.columns()[0].kind, ColumnType::BigInt);
        assert_eq!(table.rows()[1][0], CellValue::Missing);
        assert_eq!(table.rows()[0][1], CellValue::Missing);
    }

    #[test]
    fn mixed_columns_keep_raw_text() {
        let table = read("v\n1.50\nabc\n").unwrap();
        assert_eq!(table.columns()[0].kind, ColumnType::Varchar);
        assert_eq!(table.rows()[0][0], CellValue::Text("1.50".to_owned()));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = read("a,b,c\n1\n").unwrap();
        assert_eq!(table.rows()[0], vec![CellValue::Int(1), CellValue::Missing, CellValue::Missing]);
    }

    #[test]
    fn long_rows_fail() {
        let error = read("a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(error, SpreadsheetError::TooManyFields { line: 2, expected: 2, found: 3 }));
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(read("").unwrap_err(), SpreadsheetError::MissingHeaderRow));
    }

    #[test]
    fn decode_windows_1252_fallback() {
        let table = read_csv("test.csv", b"name\ncaf\xe9\n", &PipelineConfig::default().null_values).unwrap();
        assert_eq!(table.rows()[0][0], CellValue::Text("café".to_owned()));
    }

    #[test]
    fn decode_utf8_bom() {
        let table = read_csv("test.csv", b"\xef\xbb\xbfk\nv\n", &PipelineConfig::default().null_values).unwrap();
        assert_eq!(table.column_names(), vec!["k"]);
    }

    #[test]
    fn write_has_no_index_column() {
        let table = read("k,v\na,1\nb,2.5\n").unwrap();
        let bytes = write_csv(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "k,v\na,1.0\nb,2.5\n");
    }

    #[test]
    fn write_then_read_reproduces_cells() {
        let table = read("k,v,f,b,note\na,1,0.1,true,\"x, y\"\na,,-3,false,\nc,7,1e3,true,\"say \"\"hi\"\"\"\n").unwrap();
        let again = read_csv("test.csv", &write_csv(&table).unwrap(), &PipelineConfig::default().null_values).unwrap();
        assert_eq!(again, table);
    }
}
