use chrono::NaiveDate;
use std::collections::HashMap;

/// Calendar date layout used by every date-valued cell.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One record of a worksheet: the non-blank cells of a single physical row.
///
/// Typed accessors re-parse the raw text on every call and never fail; a cell
/// that is absent or does not parse yields `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Position of the row within its worksheet (0-based)
    index: usize,
    /// Column key to raw cell text, blank cells are not stored
    values: HashMap<String, String>,
}

impl Row {
    pub(crate) fn new(index: usize, values: HashMap<String, String>) -> Self {
        Self { index, values }
    }

    /// Position of this row within its worksheet.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw text of a cell.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Whether the row holds a non-blank value for the column.
    pub fn has_value(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Cell parsed as an integer. Fractional numbers are truncated toward zero.
    pub fn as_long(&self, column: &str) -> Option<i64> {
        self.value(column).and_then(parse_long)
    }

    pub fn as_double(&self, column: &str) -> Option<f64> {
        self.value(column).and_then(parse_double)
    }

    /// Cell parsed as a `YYYY-MM-DD` calendar date.
    pub fn as_date(&self, column: &str) -> Option<NaiveDate> {
        self.value(column).and_then(parse_date)
    }

    /// Column keys present on this row, in no particular order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parses a base-10 number into an integer, truncating any fraction toward zero.
pub fn parse_long(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        parse_double(value)
            .filter(|number| (i64::MIN as f64..=i64::MAX as f64).contains(number))
            .map(|number| number.trunc() as i64)
    })
}

/// Parses a finite decimal number.
pub fn parse_double(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Parses a strict `YYYY-MM-DD` date; other layouts are rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let is_layout = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if is_layout {
        NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> Row {
        Row::new(
            0,
            cells
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn long_truncates_toward_zero() {
        let row = row(&[("age", "3.72"), ("neg", "-23.4"), ("weight", "-34"), ("name", "King")]);

        assert_eq!(row.as_long("age"), Some(3));
        assert_eq!(row.as_long("neg"), Some(-23));
        assert_eq!(row.as_long("weight"), Some(-34));
        assert_eq!(row.as_long("name"), None);
        assert_eq!(row.as_long("missing"), None);
    }

    #[test]
    fn long_rejects_non_numbers() {
        assert_eq!(parse_long("2004-02-29"), None);
        assert_eq!(parse_long("NaN"), None);
        assert_eq!(parse_long("inf"), None);
        assert_eq!(parse_long("1e30"), None);
        assert_eq!(parse_long("48.75"), Some(48));
    }

    #[test]
    fn double_parses_integers_and_fractions() {
        let row = row(&[("weight", "1200"), ("age", "-23.4"), ("date", "2014-07-04")]);

        assert_eq!(row.as_double("weight"), Some(1200.0));
        assert_eq!(row.as_double("age"), Some(-23.4));
        assert_eq!(row.as_double("date"), None);
    }

    #[test]
    fn date_is_strict() {
        assert_eq!(parse_date("2004-02-29"), NaiveDate::from_ymd_opt(2004, 2, 29));
        assert_eq!(parse_date("1967-10-18"), NaiveDate::from_ymd_opt(1967, 10, 18));
        assert_eq!(parse_date("2005-02-29"), None);
        assert_eq!(parse_date("2014-7-4"), None);
        assert_eq!(parse_date("2014-07-04 10:00:00"), None);
        assert_eq!(parse_date("1200"), None);
    }
}
