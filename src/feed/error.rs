use crate::error::SheetError;
use crate::spreadsheet::SpreadsheetError;
use crate::worksheet::FilterError;
use chrono::NaiveDate;
use std::fmt::Display;
use thiserror::Error;

/// The feed cannot be built with the given settings or worksheet layout.
/// Raised before any entry is rendered.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("Cannot find spreadsheet titled '{0}'")]
    MissingSpreadsheet(String),

    #[error("Cannot find worksheet titled '{worksheet}' in the spreadsheet '{spreadsheet}'")]
    MissingWorksheet { spreadsheet: String, worksheet: String },

    #[error("Worksheet '{worksheet}' has no '{column}' data")]
    MissingColumn { worksheet: String, column: String },

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("Invalid UTC offset '{0}'")]
    InvalidOffset(String),

    #[error("Invalid date pattern '{0}'")]
    InvalidPattern(String),
}

/// A selected row lacks a field every entry needs.
#[derive(Error, Debug, PartialEq)]
pub enum DataError {
    #[error("Cannot process row {row} without a date")]
    MissingDate { row: usize },

    #[error("Empty title from row dated {date}")]
    MissingTitle { row: usize, date: NaiveDate },

    #[error("'{title}' has no audio link")]
    MissingEnclosure { row: usize, title: String },
}

/// Why a run produced no feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{0}")]
    Data(#[from] DataError),

    #[error("{0}")]
    Sheet(SheetError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<SheetError> for FeedError {
    /// Unknown spreadsheet and worksheet names are configuration mistakes.
    fn from(error: SheetError) -> Self {
        match error {
            SheetError::SpreadsheetError(SpreadsheetError::SpreadsheetNotFound(name)) => {
                ConfigurationError::MissingSpreadsheet(name).into()
            }
            SheetError::SpreadsheetError(SpreadsheetError::WorksheetNotFound { spreadsheet, worksheet }) => {
                ConfigurationError::MissingWorksheet { spreadsheet, worksheet }.into()
            }
            error => FeedError::Sheet(error),
        }
    }
}

/// A non-fatal condition met while rendering; the run still succeeds.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// The enclosure length could not be looked up and the default was used.
    LookupDegraded { url: String, reason: String },
    /// The entry had no description and a generated one was used.
    FallbackApplied { title: String, date: NaiveDate },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LookupDegraded { url, reason } => write!(f, "Cannot determine length of {url}: {reason}"),
            Self::FallbackApplied { title, .. } => write!(f, "No description for {title}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_configuration_error() {
        let error = FeedError::from(SheetError::from(SpreadsheetError::WorksheetNotFound {
            spreadsheet: "Messages".to_owned(),
            worksheet: "Media Log".to_owned(),
        }));
        assert!(matches!(
            error,
            FeedError::Configuration(ConfigurationError::MissingWorksheet { ref worksheet, .. }) if worksheet == "Media Log"
        ));

        let error = FeedError::from(SheetError::WithContextError("broken".to_owned()));
        assert!(matches!(error, FeedError::Sheet(_)));
        assert_eq!(error.to_string(), "broken");
    }

    #[test]
    fn diagnostics_read_as_warnings() {
        let fallback = Diagnostic::FallbackApplied {
            title: "Grace".to_owned(),
            date: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
        };
        assert_eq!(fallback.to_string(), "No description for Grace");
    }
}
