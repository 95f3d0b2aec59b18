//! # Spreadsheet Podcast Feeds
//!
//! Builds an RSS 2.0 podcast feed from a media log kept in a spreadsheet.
//!
//! ## Features
//!
//! - **Workbook formats**: reads Office Open XML (`.xlsx`, `.xlsm`) and OpenDocument (`.ods`)
//!   workbooks from disk or from a published download link
//! - **Worksheet snapshots**: one immutable copy of a table with typed, never-failing cell access
//! - **Composable filters**: value, prefix, weekday and count filters applied in a chosen order
//! - **Feed assembly**: newest entries selected, listed oldest first, with fallback descriptions
//!   and probed enclosure lengths
//! - **Staged output**: the document is complete in memory before anything is written
//!
//! ## Example
//!
//! ```no_run
//! use sheetcast::config::Config;
//! use sheetcast::feed::{generate, HttpLengthProbe, StatusChannel};
//! use sheetcast::source::FileSource;
//!
//! let config = Config::defaults();
//! let source = FileSource::new(&config.source.root);
//! let mut feed = Vec::new();
//! let report = generate(&source, &config, &HttpLengthProbe::default(), StatusChannel::silent(), &mut feed)?;
//! println!("{} entries", report.entries);
//! # Ok::<(), sheetcast::feed::FeedError>(())
//! ```
pub mod config;
pub mod error;
pub mod feed;
pub mod source;
pub mod worksheet;

mod helpers;
mod spreadsheet;

pub use error::SheetError;
pub use feed::generate;
pub use feed::FeedAssembler;
pub use feed::FeedError;
pub use feed::FeedReport;
pub use source::FileSource;
pub use source::MemorySource;
pub use source::SpreadsheetSource;
pub use spreadsheet::SpreadsheetError;
pub use worksheet::Row;
pub use worksheet::RowFilter;
pub use worksheet::Worksheet;
