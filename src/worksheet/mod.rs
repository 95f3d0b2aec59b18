//! # Worksheet Snapshot
//!
//! An immutable, in-memory copy of one named table of a spreadsheet. Rows keep
//! the physical order they were read in; every ordering or filtering operation
//! returns a new sequence of borrowed rows and leaves the snapshot untouched.
use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::HashSet;
use std::io::Write;

pub mod filter;
mod row;

pub use filter::filter_rows;
pub use filter::FilterError;
pub use filter::RowFilter;
pub use row::parse_date;
pub use row::parse_double;
pub use row::parse_long;
pub use row::Row;
pub use row::DATE_FORMAT;

/// A named table of rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Worksheet {
    title: String,
    /// Union of the row keys in first-seen order
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Worksheet {
    /// Starts building a snapshot with the given title.
    pub fn builder(title: &str) -> WorksheetBuilder {
        WorksheetBuilder {
            title: title.to_owned(),
            columns: Vec::new(),
            seen: HashSet::new(),
            rows: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column keys in first-seen order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Whether any row holds a value for the column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// All rows in physical order.
    pub fn rows(&self) -> Vec<&Row> {
        self.rows.iter().collect()
    }

    /// Row at a position; negative or out-of-range positions yield `None`.
    pub fn row(&self, index: i64) -> Option<&Row> {
        usize::try_from(index).ok().and_then(|index| self.rows.get(index))
    }

    pub fn cell(&self, row: i64, column: &str) -> Option<&str> {
        self.row(row).and_then(|row| row.value(column))
    }

    pub fn has_cell(&self, row: i64, column: &str) -> bool {
        self.row(row).map(|row| row.has_value(column)).unwrap_or(false)
    }

    pub fn cell_as_long(&self, row: i64, column: &str) -> Option<i64> {
        self.row(row).and_then(|row| row.as_long(column))
    }

    pub fn cell_as_double(&self, row: i64, column: &str) -> Option<f64> {
        self.row(row).and_then(|row| row.as_double(column))
    }

    pub fn cell_as_date(&self, row: i64, column: &str) -> Option<NaiveDate> {
        self.row(row).and_then(|row| row.as_date(column))
    }

    /// Rows sorted by the raw text of a column.
    ///
    /// The comparison is plain string ordering and a missing cell sorts as the
    /// empty string. The ascending sort is stable; the descending result is the
    /// exact reverse of the ascending one.
    pub fn rows_ordered_by(&self, column: &str, ascending: bool) -> Vec<&Row> {
        let mut rows = self.rows();
        rows.sort_by(|left, right| {
            let left = left.value(column).unwrap_or("");
            let right = right.value(column).unwrap_or("");
            left.cmp(right)
        });
        if !ascending {
            rows.reverse();
        }
        rows
    }

    /// Writes the given rows as a tab-separated table headed by the column names.
    pub fn describe<W: Write>(&self, rows: &[&Row], out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Worksheet: {}", self.title)?;
        writeln!(out, "{}", self.columns.join("\t"))?;
        for row in rows {
            let line = self.columns
                .iter()
                .map(|column| row.value(column).unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Accumulates rows for a [`Worksheet`] snapshot.
pub struct WorksheetBuilder {
    title: String,
    columns: Vec<String>,
    seen: HashSet<String>,
    rows: Vec<Row>,
}

impl WorksheetBuilder {
    /// Appends a row from `(column, value)` pairs. Blank values are dropped;
    /// a repeated column keeps its last value.
    pub fn row<I, K, V>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.push_row(cells);
        self
    }

    pub(crate) fn push_row<I, K, V>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (key, value) in cells {
            let key = key.into();
            let value = value.into();
            if key.is_empty() || value.trim().is_empty() {
                continue;
            }
            if self.seen.insert(key.clone()) {
                self.columns.push(key.clone());
            }
            values.insert(key, value);
        }
        let index = self.rows.len();
        self.rows.push(Row::new(index, values));
    }

    pub fn build(self) -> Worksheet {
        Worksheet {
            title: self.title,
            columns: self.columns,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn persons() -> Worksheet {
        Worksheet::builder("Persons")
            .row([
                ("firstname", "King"),
                ("lastname", "Kong"),
                ("age", "3.72"),
                ("weight", "1200"),
                ("holidaydate", "2014-07-04"),
            ])
            .row([
                ("firstname", "Kevin"),
                ("lastname", "Murray"),
                ("age", "48.75"),
                ("weight", "207"),
                ("holidaydate", "1967-10-18"),
            ])
            .row([
                ("firstname", "Tommy"),
                ("lastname", "Hilfiger"),
                ("age", "-23.4"),
                ("weight", "-34"),
                ("holidaydate", "2004-02-29"),
            ])
            .build()
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter()
            .map(|row| row.value("firstname").unwrap_or("").to_owned())
            .collect()
    }

    #[test]
    fn cells_exist() {
        let worksheet = persons();

        assert_eq!(worksheet.row_count(), 3);
        assert_eq!(worksheet.cell(0, "firstname"), Some("King"));
        assert_eq!(worksheet.cell(1, "holidaydate"), Some("1967-10-18"));
        assert_eq!(worksheet.cell(2, "age"), Some("-23.4"));
        assert_eq!(worksheet.cell(0, "nunsuch"), None);
        assert_eq!(worksheet.cell(-2, "lastname"), None);
        assert_eq!(worksheet.cell(99, "age"), None);
    }

    #[test]
    fn cell_existence_matches_value() {
        let worksheet = persons();
        for index in -1..=3 {
            for column in ["firstname", "age", "species"] {
                assert_eq!(
                    worksheet.has_cell(index, column),
                    worksheet.cell(index, column).is_some()
                );
            }
        }
        assert!(!worksheet.has_cell(-1, "firstname"));
        assert!(worksheet.has_cell(2, "firstname"));
        assert!(!worksheet.has_cell(3, "firstname"));
    }

    #[test]
    fn typed_cells() {
        let worksheet = persons();

        assert_eq!(worksheet.cell_as_long(0, "firstname"), None);
        assert_eq!(worksheet.cell_as_long(2, "holidaydate"), None);
        assert_eq!(worksheet.cell_as_long(0, "weight"), Some(1200));
        assert_eq!(worksheet.cell_as_long(1, "age"), Some(48));
        assert_eq!(worksheet.cell_as_long(2, "age"), Some(-23));
        assert_eq!(worksheet.cell_as_double(0, "age"), Some(3.72));
        assert_eq!(worksheet.cell_as_double(2, "weight"), Some(-34.0));
        assert_eq!(worksheet.cell_as_date(2, "weight"), None);
        assert_eq!(
            worksheet.cell_as_date(0, "holidaydate"),
            NaiveDate::from_ymd_opt(2014, 7, 4)
        );
    }

    #[test]
    fn sort_by_column() {
        let worksheet = persons();

        assert_eq!(names(&worksheet.rows_ordered_by("firstname", true)), ["Kevin", "King", "Tommy"]);
        assert_eq!(names(&worksheet.rows_ordered_by("firstname", false)), ["Tommy", "King", "Kevin"]);
        // physical order untouched
        assert_eq!(names(&worksheet.rows()), ["King", "Kevin", "Tommy"]);
    }

    #[test]
    fn sort_is_stable_and_missing_sorts_first() {
        let worksheet = Worksheet::builder("Ties")
            .row([("key", "b"), ("id", "1")])
            .row([("id", "2")])
            .row([("key", "a"), ("id", "3")])
            .row([("key", "b"), ("id", "4")])
            .build();

        let ids = |rows: Vec<&Row>| rows.iter().map(|row| row.value("id").unwrap_or("").to_owned()).collect::<Vec<_>>();
        assert_eq!(ids(worksheet.rows_ordered_by("key", true)), ["2", "3", "1", "4"]);
        assert_eq!(ids(worksheet.rows_ordered_by("key", false)), ["4", "1", "3", "2"]);
    }

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let worksheet = Worksheet::builder("Sparse")
            .row([("a", "1"), ("b", "  ")])
            .row([("c", "3"), ("a", "2")])
            .row([("b", "x")])
            .build();

        assert_eq!(worksheet.column_names(), ["a", "c", "b"]);
        assert!(worksheet.has_column("b"));
        assert!(!worksheet.has_cell(0, "b"));
        assert!(!worksheet.has_column("d"));
    }

    #[test]
    fn describe_lists_rows() {
        let worksheet = persons();
        let mut out = Vec::new();
        worksheet.describe(&worksheet.rows()[..1], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Worksheet: Persons\nfirstname\tlastname\tage\tweight\tholidaydate\nKing\tKong\t3.72\t1200\t2014-07-04\n"
        );
    }
}
