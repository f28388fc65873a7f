//! Excel (.xlsx) writing: a minimal single-sheet Office Open XML package.

use crate::error::DataCleanerError;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipHelper;
use crate::spreadsheet::cell::to_serial;
use crate::spreadsheet::cell::to_serial_days;
use crate::spreadsheet::cell::to_serial_fraction;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::reference::index_to_reference;
use crate::table::Table;
use std::io::Cursor;
use std::io::Write;
use zip::ZipWriter;

// Cell format indexes into the cellXfs list of STYLES
const STYLE_HEADER: &str = "1"; // Bold header text
const STYLE_DATE: &str = "2"; // Built-in format 14 (m/d/yyyy)
const STYLE_DATETIME: &str = "3"; // Built-in format 22 (m/d/yyyy h:mm)
const STYLE_TIME: &str = "4"; // Built-in format 21 (h:mm:ss)

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font><font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="5"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="22" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="21" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Serializes a table as an `.xlsx` workbook with one sheet named `Sheet1`.
/// The header row is bold; no index column is written.
pub fn write_xlsx(table: &Table) -> Result<Vec<u8>, DataCleanerError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.write_part("[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
    zip.write_part("_rels/.rels", ROOT_RELATIONSHIPS.as_bytes())?;
    zip.write_part("xl/workbook.xml", WORKBOOK.as_bytes())?;
    zip.write_part("xl/_rels/workbook.xml.rels", WORKBOOK_RELATIONSHIPS.as_bytes())?;
    zip.write_part("xl/styles.xml", STYLES.as_bytes())?;
    zip.write_xml_part("xl/worksheets/sheet1.xml", |writer| write_worksheet(writer, table))?;
    Ok(zip.finish()?.into_inner())
}

fn write_worksheet<W: Write>(writer: &mut XmlWriter<W>, table: &Table) -> Result<(), DataCleanerError> {
    writer.start("worksheet", &[("xmlns", "http://schemas.openxmlformats.org/spreadsheetml/2006/main")])?;
    if table.column_count() > 0 {
        let dimension = format!(
            "A1:{}",
            index_to_reference(table.row_count(), table.column_count() - 1)
        );
        writer.empty("dimension", &[("ref", dimension.as_str())])?;
    }
    writer.start("sheetData", &[])?;

    writer.start("row", &[("r", "1")])?;
    for (col, column) in table.columns().iter().enumerate() {
        let reference = index_to_reference(0, col);
        write_inline_string(writer, &reference, Some(STYLE_HEADER), &column.name)?;
    }
    writer.end("row")?;

    for (index, cells) in table.rows().iter().enumerate() {
        let row = index + 1;
        let number = (row + 1).to_string();
        writer.start("row", &[("r", number.as_str())])?;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(writer, &index_to_reference(row, col), cell)?;
        }
        writer.end("row")?;
    }

    writer.end("sheetData")?;
    writer.end("worksheet")
}

fn write_cell<W: Write>(writer: &mut XmlWriter<W>, reference: &str, cell: &CellValue) -> Result<(), DataCleanerError> {
    match cell {
        CellValue::Missing => Ok(()),
        CellValue::Bool(value) => {
            write_value(writer, &[("r", reference), ("t", "b")], if *value { "1" } else { "0" })
        }
        CellValue::Int(value) => write_value(writer, &[("r", reference)], &value.to_string()),
        CellValue::Float(value) if value.is_finite() => {
            write_value(writer, &[("r", reference)], &value.to_string())
        }
        CellValue::Float(value) => write_inline_string(writer, reference, None, &value.to_string()),
        CellValue::Text(value) => write_inline_string(writer, reference, None, value),
        CellValue::DateTime(value) => {
            write_value(writer, &[("r", reference), ("s", STYLE_DATETIME)], &to_serial(*value).to_string())
        }
        CellValue::Date(value) => {
            write_value(writer, &[("r", reference), ("s", STYLE_DATE)], &to_serial_days(*value).to_string())
        }
        CellValue::Time(value) => {
            write_value(writer, &[("r", reference), ("s", STYLE_TIME)], &to_serial_fraction(*value).to_string())
        }
    }
}

/// Writes `<c ...><v>value</v></c>`
fn write_value<W: Write>(writer: &mut XmlWriter<W>, attributes: &[(&str, &str)], value: &str) -> Result<(), DataCleanerError> {
    writer.start("c", attributes)?;
    writer.element("v", &[], value)?;
    writer.end("c")
}

/// Writes `<c t="inlineStr"><is><t>text</t></is></c>`
fn write_inline_string<W: Write>(writer: &mut XmlWriter<W>, reference: &str, style: Option<&str>, text: &str) -> Result<(), DataCleanerError> {
    let mut attributes = vec![("r", reference), ("t", "inlineStr")];
    if let Some(style) = style {
        attributes.push(("s", style));
    }
    writer.start("c", &attributes)?;
    writer.start("is", &[])?;
    writer.element("t", &[("xml:space", "preserve")], text)?;
    writer.end("is")?;
    writer.end("c")
}
