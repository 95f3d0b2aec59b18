//! Where worksheets come from.
//!
//! A [`SpreadsheetSource`] hands out complete [`Worksheet`] snapshots by
//! spreadsheet and worksheet name. [`FileSource`] reads workbook files from a
//! directory or a published download link; [`MemorySource`] serves snapshots
//! built in code.
use crate::error::ResultMessage;
use crate::error::SheetError;
use crate::helpers::reader::UnifiedReader;
use crate::spreadsheet::read_worksheet;
use crate::spreadsheet::SpreadsheetError;
use crate::worksheet::Worksheet;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Workbook extensions tried, in order, for a bare spreadsheet name
const EXTENSIONS: [&str; 3] = ["xlsx", "xlsm", "ods"];

/// Fetches worksheet snapshots by name.
pub trait SpreadsheetSource {
    /// Returns the named worksheet of the named spreadsheet.
    ///
    /// Fails with [`SpreadsheetError::SpreadsheetNotFound`] or
    /// [`SpreadsheetError::WorksheetNotFound`] when either name is unknown.
    fn fetch_worksheet(&self, spreadsheet: &str, worksheet: &str) -> Result<Worksheet, SheetError>;
}

/// Snapshots kept in memory, keyed by spreadsheet then worksheet title.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    spreadsheets: HashMap<String, HashMap<String, Worksheet>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worksheet under its own title, replacing any previous one.
    pub fn insert(&mut self, spreadsheet: &str, worksheet: Worksheet) {
        self.spreadsheets
            .entry(spreadsheet.to_owned())
            .or_default()
            .insert(worksheet.title().to_owned(), worksheet);
    }

    pub fn with(mut self, spreadsheet: &str, worksheet: Worksheet) -> Self {
        self.insert(spreadsheet, worksheet);
        self
    }
}

impl SpreadsheetSource for MemorySource {
    fn fetch_worksheet(&self, spreadsheet: &str, worksheet: &str) -> Result<Worksheet, SheetError> {
        let sheets = self.spreadsheets
            .get(spreadsheet)
            .ok_or_else(|| SpreadsheetError::SpreadsheetNotFound(spreadsheet.to_owned()))?;
        let sheet = sheets
            .get(worksheet)
            .ok_or_else(|| SpreadsheetError::WorksheetNotFound {
                spreadsheet: spreadsheet.to_owned(),
                worksheet: worksheet.to_owned(),
            })?;
        Ok(sheet.clone())
    }
}

/// Reads `.xlsx` and `.ods` workbooks from disk or over http(s).
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
    timeout: Duration,
}

impl FileSource {
    /// Resolves bare spreadsheet names against `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the download timeout for remote workbooks.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the workbook file for a spreadsheet name.
    ///
    /// An existing path is used as given; otherwise `<root>/<name>.<ext>` is
    /// tried for each supported extension.
    fn locate(&self, spreadsheet: &str) -> Option<PathBuf> {
        let path = Path::new(spreadsheet);
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        EXTENSIONS
            .iter()
            .map(|extension| self.root.join(format!("{spreadsheet}.{extension}")))
            .find(|candidate| candidate.is_file())
    }

    fn open(&self, spreadsheet: &str) -> Result<UnifiedReader, SheetError> {
        if UnifiedReader::is_remote_url(spreadsheet) {
            return UnifiedReader::open(spreadsheet, self.timeout).map_err(|error| match error {
                SheetError::HttpError(ref http) if matches!(**http, ureq::Error::Status(404, _)) => {
                    SpreadsheetError::SpreadsheetNotFound(spreadsheet.to_owned()).into()
                }
                error => error,
            });
        }
        let path = self
            .locate(spreadsheet)
            .ok_or_else(|| SpreadsheetError::SpreadsheetNotFound(spreadsheet.to_owned()))?;
        tracing::debug!(spreadsheet, path = %path.display(), "resolved workbook");
        UnifiedReader::open_path(&path)
    }
}

impl SpreadsheetSource for FileSource {
    fn fetch_worksheet(&self, spreadsheet: &str, worksheet: &str) -> Result<Worksheet, SheetError> {
        let reader = self.open(spreadsheet)?;
        read_worksheet(reader, spreadsheet, worksheet)
            .with_prefix(&format!("Cannot read spreadsheet '{spreadsheet}'"))
    }
}
