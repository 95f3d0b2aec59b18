//! Test builders for media-log worksheets.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use sheetcast::Worksheet;

// ---------------------------------------------------------------------------
// LogRowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for one media-log row.
///
/// Starts as a public Sunday service with an http link and a description;
/// each setter overrides one cell, and an empty string leaves the cell blank.
///
/// ```rust
/// let row = LogRowBuilder::new("2015-03-01", "Grace")
///     .visibility("Private")
///     .description("")
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct LogRowBuilder {
    cells: Vec<(String, String)>,
}

impl LogRowBuilder {
    pub fn new(date: &str, name: &str) -> Self {
        let slug = name.to_lowercase().replace(' ', "-");
        Self {
            cells: vec![
                ("date".to_owned(), date.to_owned()),
                ("name".to_owned(), name.to_owned()),
                ("visibility".to_owned(), "Public".to_owned()),
                ("playlist".to_owned(), "Service".to_owned()),
                ("audiolink".to_owned(), format!("http://media.example.org/{slug}.mp3")),
                ("description".to_owned(), format!("{name} sermon")),
            ],
        }
    }

    pub fn cell(mut self, column: &str, value: &str) -> Self {
        match self.cells.iter_mut().find(|(key, _)| key == column) {
            Some((_, cell)) => *cell = value.to_owned(),
            None => self.cells.push((column.to_owned(), value.to_owned())),
        }
        self
    }

    pub fn visibility(self, value: &str) -> Self {
        self.cell("visibility", value)
    }

    pub fn playlist(self, value: &str) -> Self {
        self.cell("playlist", value)
    }

    pub fn audiolink(self, value: &str) -> Self {
        self.cell("audiolink", value)
    }

    pub fn description(self, value: &str) -> Self {
        self.cell("description", value)
    }

    pub fn without(mut self, column: &str) -> Self {
        self.cells.retain(|(key, _)| key != column);
        self
    }

    pub fn build(self) -> Vec<(String, String)> {
        self.cells
    }
}

// ---------------------------------------------------------------------------
// Worksheets
// ---------------------------------------------------------------------------

/// Builds a worksheet titled "Media Log" from row builders.
pub fn media_log<I>(rows: I) -> Worksheet
where
    I: IntoIterator<Item = LogRowBuilder>,
{
    rows.into_iter()
        .fold(Worksheet::builder("Media Log"), |builder, row| builder.row(row.build()))
        .build()
}

/// Builds a worksheet from literal `(column, value)` rows.
pub fn worksheet(title: &str, rows: &[&[(&str, &str)]]) -> Worksheet {
    rows.iter()
        .fold(Worksheet::builder(title), |builder, row| builder.row(row.iter().copied()))
        .build()
}
