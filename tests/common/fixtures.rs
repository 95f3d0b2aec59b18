//! Static fixtures used across harnesses.

use crate::common::builders::worksheet;
use sheetcast::Worksheet;
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// The three people of the worksheet model examples.
pub fn persons() -> Worksheet {
    worksheet(
        "Persons",
        &[
            &[("firstname", "King"), ("holidaydate", "2014-07-04"), ("weight", "1200"), ("age", "3.72")],
            &[("firstname", "Kevin"), ("holidaydate", "1967-10-18"), ("weight", "207"), ("age", "48.75")],
            &[("firstname", "Tommy"), ("holidaydate", "2004-02-29"), ("weight", "-34"), ("age", "-23.4")],
        ],
    )
}

/// Zips named parts into an in-memory archive.
pub fn archive(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A minimal `.xlsx` workbook with one sheet of inline-string cells; the
/// first row is the header.
pub fn xlsx_workbook(sheet_name: &str, rows: &[&[&str]]) -> Vec<u8> {
    let workbook = format!(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{sheet_name}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
    );
    let relationships = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    let mut data = String::new();
    for (row, cells) in rows.iter().enumerate() {
        data.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for (col, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = format!("{}{}", (b'A' + col as u8) as char, row + 1);
            data.push_str(&format!(r#"<c r="{reference}" t="inlineStr"><is><t>{value}</t></is></c>"#));
        }
        data.push_str("</row>");
    }
    let sheet = format!(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
    );

    archive(&[
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", relationships),
        ("xl/worksheets/sheet1.xml", &sheet),
    ])
}
