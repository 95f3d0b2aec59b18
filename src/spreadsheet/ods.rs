use crate::error::SheetError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::CellText;
use crate::helpers::xml::TagAttributes;
use crate::helpers::zip::WorkbookParts;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use thiserror::Error;
use zip::ZipArchive;

/// ODS file MIME type identifier
const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
const SPREADSHEET: QName = QName(b"office:spreadsheet");
const TABLE: QName = QName(b"table:table");
const TABLE_ROW: QName = QName(b"table:table-row");
const TABLE_CELL: QName = QName(b"table:table-cell");
/// Cells hidden under a merged cell
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// Comments attached to a cell
const ANNOTATION: QName = QName(b"office:annotation");
const PARAGRAPH: QName = QName(b"text:p");
/// Run of spaces
const STRING: QName = QName(b"text:s");

#[derive(Error, Debug)]
pub enum OdsError {
    #[error("Invalid ODS MIME type")]
    MimeTypeError,
}

/// An OpenDocument spreadsheet
pub(crate) struct OdsSpreadsheet {
    pub(crate) name: String,
    zip: ZipArchive<UnifiedReader>,
}

impl OdsSpreadsheet {
    /// Validates the archive as an unencrypted ODS document
    pub(crate) fn open(mut zip: ZipArchive<UnifiedReader>, file_name: &str) -> Result<Self, SheetError> {
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))?;
        }
        Ok(OdsSpreadsheet {
            name: file_name.to_owned(),
            zip,
        })
    }
}

impl Spreadsheet for OdsSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Option<Sheet>, SheetError> {
        let mut reader = self.zip.required_xml("content.xml")?;

        // Skip ahead to the table with the requested name
        let mut found = false;
        match_xml_events!(reader => {
            Event::End(event) if event.name() == SPREADSHEET => break,
            Event::Start(event) if event.name() == TABLE => {
                if event.attr_text("table:name")?.is_some_and(|name| name == sheet_name) {
                    found = true;
                    break;
                }
            }
        });
        if !found {
            return Ok(None);
        }

        let mut sheet = Sheet::new(&self.name, sheet_name);
        let mut row = 0usize;
        let mut col = 0usize;
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut element_context = false;
        let mut comment_context = false;
        let mut depth = 0usize;
        match_xml_events!(reader => {
            // Nested tables would otherwise end the sheet early
            Event::Start(event) if event.name() == TABLE => depth += 1,
            Event::End(event) if event.name() == TABLE => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Start(event) if event.name() == TABLE_ROW => {
                row_count = event.attr_parsed("table:number-rows-repeated")?.unwrap_or(1);
                col = 0;
            }
            Event::End(event) if event.name() == TABLE_ROW => {
                row += row_count;
            }
            Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                value.clear();
                col_count = event.attr_parsed::<usize>("table:number-columns-repeated")?.unwrap_or(1);
                let value_type = event.attr_text("office:value-type")?;
                let is_error = event.attr_text("calcext:value-type")?.is_some_and(|cow| cow == "error");
                kind = match value_type.as_deref() {
                    None => CellType::Empty,
                    Some("boolean") => CellType::Boolean,
                    Some("date") => CellType::IsoDateTime,
                    Some("time") => CellType::IsoDuration,
                    Some("string") if is_error => CellType::Error,
                    Some("string") => CellType::InlineString,
                    Some(_) => CellType::Number,
                };
                match value_type.as_deref() {
                    Some("string") => element_context = true,
                    Some("boolean") => {
                        let truthy = event.attr_text("office:boolean-value")?
                            .is_some_and(|cow| cow != "false" && cow != "0");
                        value.push(if truthy { '1' } else { '0' });
                    }
                    Some("date") => if let Some(data) = event.attr_text("office:date-value")? {
                        value.push_str(&data);
                    }
                    Some("time") => if let Some(data) = event.attr_text("office:time-value")? {
                        value.push_str(&data);
                    }
                    Some(_) => if let Some(data) = event.attr_text("office:value")? {
                        value.push_str(&data);
                    }
                    None => (),
                }
            }
            Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                match kind {
                    CellType::Empty => (),
                    _ if value.is_empty() => (),
                    CellType::Error => {
                        tracing::debug!(cell = %index_to_reference(row, col), value = %value, "skipped error cell");
                    }
                    _ => {
                        for row_number in row..row + row_count {
                            for col_number in col..col + col_count {
                                sheet.push(Cell {
                                    row: row_number,
                                    col: col_number,
                                    kind,
                                    value: value.to_owned(),
                                });
                            }
                        }
                    }
                }
                col += col_count;
                kind = CellType::default();
                element_context = false;
                comment_context = false;
            }
            Event::Start(event) if element_context && event.name() == ANNOTATION => comment_context = true,
            Event::End(event) if element_context && comment_context && event.name() == ANNOTATION => comment_context = false,
            Event::Start(event) if element_context && !comment_context && event.name() == PARAGRAPH => {
                if !value.is_empty() {
                    value.push('\n');
                }
            }
            Event::Start(event) if element_context && !comment_context && event.name() == STRING => {
                let count = event.attr_parsed("text:c")?.unwrap_or(1);
                for _ in 0..count {
                    value.push(' ');
                }
            }
            Event::Text(event) if element_context && !comment_context => value.push_text(&event)?,
            Event::GeneralRef(event) if element_context && !comment_context => value.push_reference(&event)?,
        });

        Ok(Some(sheet))
    }
}

/// Checks the `mimetype` entry names an OpenDocument spreadsheet
fn check_mime(zip: &mut ZipArchive<UnifiedReader>) -> Result<(), SheetError> {
    if let Some(bytes) = zip.read_part("mimetype")? {
        if bytes.trim_ascii() != MIME_TYPE {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Encrypted documents declare encryption data in the manifest
fn is_password_protected(zip: &mut ZipArchive<UnifiedReader>) -> Result<bool, SheetError> {
    let Some(mut reader) = zip.optional_xml("META-INF/manifest.xml")? else {
        return Ok(false);
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == QName(b"manifest:file-entry") => in_file_entry = true,
        Event::Start(event) if in_file_entry && event.name() == QName(b"manifest:encryption-data") => {
            return Ok(true);
        }
    });
    Ok(false)
}
