use crate::error::SheetError;
use crate::spreadsheet::cell::Cell;
use crate::worksheet::Worksheet;
use regex::Regex;
use std::collections::HashMap;
use std::collections::HashSet;

/// The raw cells of one sheet of a workbook file, before they become a [`Worksheet`].
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Builds the worksheet snapshot.
    ///
    /// The first non-empty row holds the column labels; each later row with at
    /// least one value under a labelled column becomes a record.
    pub(crate) fn into_worksheet(mut self) -> Result<Worksheet, SheetError> {
        self.cells.sort_by_key(|cell| (cell.row, cell.col));
        let pattern = Regex::new(r"[^a-z0-9.\-]").expect("Hardcode regex pattern");
        let mut builder = Worksheet::builder(&self.name);
        let mut rows = self.cells.chunk_by(|left, right| left.row == right.row);

        let Some(header) = rows.next() else {
            return Ok(builder.build());
        };
        let mut keys = HashMap::<usize, String>::new();
        let mut seen = HashSet::<String>::new();
        for cell in header {
            let key = column_key(&cell.text()?, &pattern);
            if !key.is_empty() && seen.insert(key.clone()) {
                keys.insert(cell.col, key);
            }
        }

        for record in rows {
            let values = record
                .iter()
                .filter_map(|cell| {
                    keys.get(&cell.col)
                        .map(|key| cell.text().map(|text| (key.to_owned(), text.trim().to_owned())))
                })
                .collect::<Result<Vec<_>, SheetError>>()?;
            if values.iter().any(|(_, value)| !value.is_empty()) {
                builder.push_row(values);
            }
        }
        let worksheet = builder.build();
        tracing::debug!(
            file = %self.file_name,
            sheet = %self.name,
            rows = worksheet.row_count(),
            columns = worksheet.column_count(),
            "loaded worksheet"
        );
        Ok(worksheet)
    }
}

/// Turns a header label into a column key: lower-cased, keeping only ASCII
/// letters, digits, '.' and '-' ("Audio Link" becomes "audiolink").
pub(crate) fn column_key(label: &str, pattern: &Regex) -> String {
    pattern.replace_all(&label.to_lowercase(), "").into_owned()
}
