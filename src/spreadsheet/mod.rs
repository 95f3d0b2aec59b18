//! # Workbook Readers
//!
//! Reads Office Open XML (.xlsx, .xlsm) and OpenDocument (.ods) workbooks into
//! [`Worksheet`] snapshots. The format is detected from the archive contents,
//! so downloaded workbooks without a file extension are handled too.
use crate::error::SheetError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::zip::WorkbookParts;
use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::worksheet::Worksheet;
use thiserror::Error;
use zip::ZipArchive;

pub(crate) mod cell;
mod excel;
pub(crate) mod ods;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

/// Errors about the workbook as a whole.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot find spreadsheet titled '{0}'")]
    SpreadsheetNotFound(String),

    #[error("Cannot find worksheet titled '{worksheet}' in the spreadsheet '{spreadsheet}'")]
    WorksheetNotFound { spreadsheet: String, worksheet: String },

    #[error("Cannot detect file format for '{0}'")]
    InvalidFileFormat(String),

    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),
}

/// A workbook opened for reading.
pub(crate) trait Spreadsheet {
    /// Returns the file name of the workbook
    fn name(&self) -> String;

    /// Reads the cells of one sheet, `None` when no sheet has that name
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Option<Sheet>, SheetError>;
}

/// Opens a workbook, choosing the reader from the archive contents.
pub(crate) fn open_workbook(reader: UnifiedReader, file_name: &str) -> Result<Box<dyn Spreadsheet>, SheetError> {
    let zip = ZipArchive::new(reader)?;
    if zip.has_part("mimetype") {
        Ok(Box::new(OdsSpreadsheet::open(zip, file_name)?))
    } else if zip.has_part("xl/workbook.xml") {
        Ok(Box::new(XlsxSpreadsheet::open(zip, file_name)?))
    } else {
        Err(SpreadsheetError::InvalidFileFormat(file_name.to_owned()))?
    }
}

/// Reads one worksheet of a workbook into a snapshot.
pub(crate) fn read_worksheet(
    reader: UnifiedReader,
    spreadsheet: &str,
    worksheet: &str,
) -> Result<Worksheet, SheetError> {
    let mut workbook = open_workbook(reader, spreadsheet)?;
    tracing::debug!(file = %workbook.name(), worksheet, "reading worksheet");
    let sheet = workbook
        .read_sheet(worksheet)?
        .ok_or_else(|| SpreadsheetError::WorksheetNotFound {
            spreadsheet: spreadsheet.to_owned(),
            worksheet: worksheet.to_owned(),
        })?;
    sheet.into_worksheet()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Zips named parts into an in-memory archive.
    pub(crate) fn archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn unknown_archive_is_rejected() {
        let bytes = archive(&[("readme.txt", "hello")]);
        let error = read_worksheet(UnifiedReader::from_bytes(bytes), "notes", "Sheet1").err().unwrap();
        assert_eq!(error.to_string(), "Cannot detect file format for 'notes'");
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let result = read_worksheet(UnifiedReader::from_bytes(b"plain text".to_vec()), "notes", "Sheet1");
        assert!(result.is_err());
    }
}
