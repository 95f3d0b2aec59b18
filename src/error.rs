use thiserror::Error;

pub use crate::helpers::reader::UnifiedReaderError;
pub use crate::helpers::xml::XmlError;
pub use crate::spreadsheet::ods::OdsError;

/// Error raised while locating or reading a spreadsheet.
/// Aggregates errors from the standard library, dependencies, and the reader modules.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    HttpError(#[from] Box<ureq::Error>),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    #[error("{0}")]
    UnifiedReaderError(#[from] crate::helpers::reader::UnifiedReaderError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    OdsError(#[from] crate::spreadsheet::ods::OdsError),
}

impl SheetError {
    /// Whether the error only says that the named spreadsheet or worksheet does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SheetError::SpreadsheetError(
                crate::spreadsheet::SpreadsheetError::SpreadsheetNotFound(_)
                    | crate::spreadsheet::SpreadsheetError::WorksheetNotFound { .. }
            )
        )
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| match e {
            // keep lookups matchable by callers
            e if e.is_not_found() => e,
            e => SheetError::WithContextError(format!("{}: {}", message, e)),
        })
    }
}
