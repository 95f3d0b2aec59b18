//! Named parts of a zipped workbook.
//!
//! Office Open XML and OpenDocument workbooks are zip archives of XML parts.
//! Part names are matched without regard to ASCII case or path separator, and
//! a leading `/` (as in absolute relationship targets) is ignored.

use crate::error::SheetError;
use crate::helpers::xml::XmlReader;
use crate::spreadsheet::SpreadsheetError;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::ZipArchive;

pub(crate) type PartReader<'a, RS> = XmlReader<BufReader<ZipFile<'a, RS>>>;

pub(crate) trait WorkbookParts<RS: Read + Seek> {
    fn has_part(&self, name: &str) -> bool;

    /// The raw bytes of a part, `None` when the archive lacks it.
    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, SheetError>;

    /// An event reader over a part the workbook may omit.
    fn optional_xml(&'_ mut self, name: &str) -> Result<Option<PartReader<'_, RS>>, SheetError>;

    /// An event reader over a part every workbook of its kind has.
    fn required_xml(&'_ mut self, name: &str) -> Result<PartReader<'_, RS>, SheetError>;
}

/// The name a part is stored under, if any.
fn stored_name<'n>(mut names: impl Iterator<Item = &'n str>, name: &str) -> Option<String> {
    let wanted = name.replace('\\', "/");
    let wanted = wanted.trim_start_matches('/');
    names
        .find(|stored| stored.trim_start_matches('/').eq_ignore_ascii_case(wanted))
        .map(str::to_owned)
}

impl<RS: Read + Seek> WorkbookParts<RS> for ZipArchive<RS> {
    fn has_part(&self, name: &str) -> bool {
        stored_name(self.file_names(), name).is_some()
    }

    fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>, SheetError> {
        let Some(stored) = stored_name(self.file_names(), name) else {
            return Ok(None);
        };
        let mut file = self.by_name(&stored)?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    fn optional_xml(&'_ mut self, name: &str) -> Result<Option<PartReader<'_, RS>>, SheetError> {
        let Some(stored) = stored_name(self.file_names(), name) else {
            return Ok(None);
        };
        let file = self.by_name(&stored)?;
        Ok(Some(XmlReader::new(BufReader::new(file))))
    }

    fn required_xml(&'_ mut self, name: &str) -> Result<PartReader<'_, RS>, SheetError> {
        self.optional_xml(name)?
            .ok_or_else(|| SpreadsheetError::FileError(name.to_owned()).into())
    }
}
