//! # Feed Assembly
//!
//! Turns a media-log worksheet into an RSS document:
//!
//! 1. check the worksheet has the date, visibility, link and category columns
//! 2. order rows by date, most recent first
//! 3. keep public rows with a web link in the wanted category, optionally on
//!    given weekdays, and at most the configured number of them
//! 4. reverse, so the feed lists the selected entries oldest first
//! 5. build and render one entry per row
//!
//! A missing column, or a selected row without date, title or link, fails the
//! whole run and nothing is written. A missing description or enclosure
//! length is replaced and reported as a [`Diagnostic`].
use crate::config::Config;
use crate::feed::entry::fallback_description;
use crate::feed::entry::format_date;
use crate::feed::entry::format_timestamp;
use crate::feed::entry::parse_offset;
use crate::feed::entry::publish_instant;
use crate::feed::rss::ItemStyle;
use crate::feed::rss::RssWriter;
use crate::source::SpreadsheetSource;
use crate::worksheet::filter_rows;
use crate::worksheet::Row;
use crate::worksheet::RowFilter;
use crate::worksheet::Worksheet;
use chrono::FixedOffset;
use chrono::NaiveDate;
use std::io::Write;

pub mod enclosure;
pub mod entry;
pub mod error;
pub mod rss;
pub mod status;

pub use enclosure::EnclosureLength;
pub use enclosure::FixedLength;
pub use enclosure::HttpLengthProbe;
pub use enclosure::LookupError;
pub use enclosure::NoLengthLookup;
pub use entry::FeedEntry;
pub use error::ConfigurationError;
pub use error::DataError;
pub use error::Diagnostic;
pub use error::FeedError;
pub use status::StatusChannel;

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedReport {
    /// Number of entries written
    pub entries: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// A rendered document and the entries it holds.
#[derive(Clone, Debug)]
pub struct RenderedFeed {
    pub document: Vec<u8>,
    pub entries: Vec<FeedEntry>,
}

/// Selects rows of a worksheet and renders them as feed entries.
#[derive(Clone, Debug)]
pub struct FeedAssembler {
    config: Config,
    offset: FixedOffset,
    filters: Vec<RowFilter>,
}

impl FeedAssembler {
    /// Checks the settings and prepares the selection filters.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let offset = parse_offset(&config.entry.utc_offset)?;
        // Any instant will do, only the pattern is under test
        format_timestamp(&publish_instant(NaiveDate::default(), 0, offset), &config.entry.date_pattern)?;

        let selection = &config.selection;
        let mut filters = vec![
            RowFilter::value(&selection.visibility_column, &selection.visibility),
            RowFilter::value_starts_with(&selection.link_column, &selection.link_prefix),
            RowFilter::value(&selection.category_column, &selection.category),
        ];
        if !selection.weekdays.is_empty() {
            filters.push(RowFilter::weekday(&selection.date_column, &selection.weekdays)?);
        }
        filters.push(RowFilter::max_count(selection.max_entries));

        Ok(Self {
            config: config.clone(),
            offset,
            filters,
        })
    }

    /// Filters applied after ordering, in application order.
    pub fn filters(&self) -> &[RowFilter] {
        &self.filters
    }

    /// Fails on the first required column the worksheet lacks.
    pub fn validate(&self, worksheet: &Worksheet) -> Result<(), ConfigurationError> {
        let selection = &self.config.selection;
        let required = [
            &selection.date_column,
            &selection.visibility_column,
            &selection.link_column,
            &selection.category_column,
        ];
        match required.into_iter().find(|column| !worksheet.has_column(column)) {
            Some(column) => Err(ConfigurationError::MissingColumn {
                worksheet: worksheet.title().to_owned(),
                column: column.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Rows that become entries, in feed order.
    pub fn select<'w>(&self, worksheet: &'w Worksheet) -> Vec<&'w Row> {
        let ordered = worksheet.rows_ordered_by(&self.config.selection.date_column, false);
        let mut rows = filter_rows(&ordered, &self.filters);
        rows.reverse();
        tracing::debug!(worksheet = worksheet.title(), rows = worksheet.row_count(), selected = rows.len(), "selected rows");
        rows
    }

    /// Builds the entry for one selected row; `number` counts entries from 1.
    pub fn build_entry(
        &self,
        row: &Row,
        number: usize,
        lookup: &dyn EnclosureLength,
        status: &mut StatusChannel,
    ) -> Result<FeedEntry, FeedError> {
        let selection = &self.config.selection;
        let date = row
            .as_date(&selection.date_column)
            .ok_or(DataError::MissingDate { row: row.index() })?;
        let published = publish_instant(date, self.config.entry.publish_hour, self.offset);

        let title = row
            .value(&selection.title_column)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or(DataError::MissingTitle { row: row.index(), date })?;
        status.progress(format_args!("  {number}. {title} ({})", format_date(date)));

        let description = match row.value(&selection.description_column).map(str::trim) {
            Some(description) if !description.is_empty() => description.to_owned(),
            _ => {
                status.warn(Diagnostic::FallbackApplied { title: title.to_owned(), date });
                fallback_description(&self.config.entry.fallback_description, title, date)
            }
        };

        // Rows handed in directly have not been through the link filter
        let enclosure_url = row
            .value(&selection.link_column)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DataError::MissingEnclosure { row: row.index(), title: title.to_owned() })?;

        let enclosure_length = match lookup.length_of(enclosure_url) {
            Ok(length) => Some(length),
            Err(error) => {
                status.warn(Diagnostic::LookupDegraded {
                    url: enclosure_url.to_owned(),
                    reason: error.to_string(),
                });
                None
            }
        };

        Ok(FeedEntry {
            row: row.index(),
            date,
            published,
            title: title.to_owned(),
            description,
            enclosure_url: enclosure_url.to_owned(),
            enclosure_length,
        })
    }

    /// Validates, selects and renders the whole document in memory.
    pub fn assemble(
        &self,
        worksheet: &Worksheet,
        lookup: &dyn EnclosureLength,
        status: &mut StatusChannel,
    ) -> Result<RenderedFeed, FeedError> {
        self.validate(worksheet)?;
        let rows = self.select(worksheet);

        let style = ItemStyle {
            author: &self.config.entry.author,
            category: &self.config.entry.category,
            media_type: &self.config.enclosure.media_type,
            default_length: self.config.enclosure.default_length,
        };
        let mut writer = RssWriter::new();
        writer.header(&self.config.channel)?;
        status.progress(format_args!("Exporting {} entries...", rows.len()));
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let entry = self.build_entry(row, index + 1, lookup, status)?;
            let pub_date = format_timestamp(&entry.published, &self.config.entry.date_pattern)?;
            writer.entry(&entry, &pub_date, &style)?;
            entries.push(entry);
        }
        writer.footer()?;

        Ok(RenderedFeed {
            document: writer.finish(),
            entries,
        })
    }

    /// Assembles the feed and writes it to `out` only once it is complete.
    pub fn publish<W: Write + ?Sized>(
        &self,
        worksheet: &Worksheet,
        lookup: &dyn EnclosureLength,
        mut status: StatusChannel,
        out: &mut W,
    ) -> Result<FeedReport, FeedError> {
        let feed = self.assemble(worksheet, lookup, &mut status)?;
        out.write_all(&feed.document)?;
        out.flush()?;
        Ok(FeedReport {
            entries: feed.entries.len(),
            diagnostics: status.into_diagnostics(),
        })
    }
}

/// Fetches the configured worksheet and publishes its feed to `out`.
pub fn generate<W: Write + ?Sized>(
    source: &dyn SpreadsheetSource,
    config: &Config,
    lookup: &dyn EnclosureLength,
    mut status: StatusChannel,
    out: &mut W,
) -> Result<FeedReport, FeedError> {
    let assembler = FeedAssembler::from_config(config)?;
    let spreadsheet = &config.source.spreadsheet;
    status.progress(format_args!("Retrieving '{spreadsheet}' spreadsheet..."));
    let worksheet = source.fetch_worksheet(spreadsheet, &config.source.worksheet)?;
    assembler.publish(&worksheet, lookup, status, out)
}
