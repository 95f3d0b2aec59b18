use crate::worksheet::Row;
use chrono::Datelike;
use chrono::Weekday;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unknown weekday name '{0}'")]
    UnknownWeekday(String),

    #[error("Weekday filter on '{0}' needs at least one day")]
    NoWeekdays(String),
}

/// A pure, order-preserving transform narrowing a row sequence.
///
/// Filters are values: they hold no state between applications and never
/// modify the sequence they are given.
#[derive(Clone, Debug, PartialEq)]
pub enum RowFilter {
    /// Keeps the first `n` rows.
    MaxCount(usize),
    /// Keeps rows whose cell equals `expected` exactly.
    Value { column: String, expected: String },
    /// Keeps rows whose cell starts with `prefix`.
    ValueStartsWith { column: String, prefix: String },
    /// Keeps rows whose date cell falls on one of `days`.
    Weekday { column: String, days: Vec<Weekday> },
}

impl RowFilter {
    pub fn max_count(count: usize) -> Self {
        Self::MaxCount(count)
    }

    pub fn value(column: &str, expected: &str) -> Self {
        Self::Value {
            column: column.to_owned(),
            expected: expected.to_owned(),
        }
    }

    pub fn value_starts_with(column: &str, prefix: &str) -> Self {
        Self::ValueStartsWith {
            column: column.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    /// Builds a weekday filter from day names such as `"Wednesday"` or `"fri"`.
    pub fn weekday<S: AsRef<str>>(column: &str, names: &[S]) -> Result<Self, FilterError> {
        if names.is_empty() {
            Err(FilterError::NoWeekdays(column.to_owned()))?
        }
        let days = names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                name.parse::<Weekday>()
                    .map_err(|_| FilterError::UnknownWeekday(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Weekday {
            column: column.to_owned(),
            days,
        })
    }

    /// Decides a single row given how many rows survived before it.
    fn keep(&self, position: usize, row: &Row) -> bool {
        match self {
            Self::MaxCount(count) => position < *count,
            Self::Value { column, expected } => row.value(column) == Some(expected.as_str()),
            Self::ValueStartsWith { column, prefix } => row
                .value(column)
                .map(|value| value.starts_with(prefix.as_str()))
                .unwrap_or(false),
            Self::Weekday { column, days } => row
                .as_date(column)
                .map(|date| days.contains(&date.weekday()))
                .unwrap_or(false),
        }
    }

    /// Returns the surviving rows as a new sequence.
    pub fn apply<'a>(&self, rows: &[&'a Row]) -> Vec<&'a Row> {
        let mut survivors = Vec::with_capacity(rows.len());
        for row in rows {
            if self.keep(survivors.len(), row) {
                survivors.push(*row);
            } else if let Self::MaxCount(_) = self {
                break;
            }
        }
        survivors
    }
}

impl Display for RowFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxCount(count) => write!(f, "first {count}"),
            Self::Value { column, expected } => write!(f, "{column} = '{expected}'"),
            Self::ValueStartsWith { column, prefix } => write!(f, "{column} starts with '{prefix}'"),
            Self::Weekday { column, days } => {
                let days = days.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{column} on {}", days.join("|"))
            }
        }
    }
}

/// Applies filters left to right, each one consuming the previous output.
pub fn filter_rows<'a>(rows: &[&'a Row], filters: &[RowFilter]) -> Vec<&'a Row> {
    filters.iter().fold(rows.to_vec(), |rows, filter| {
        let survivors = filter.apply(&rows);
        tracing::debug!(filter = %filter, before = rows.len(), after = survivors.len(), "applied row filter");
        survivors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet::tests::persons;
    use crate::worksheet::Worksheet;

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter()
            .map(|row| row.value("firstname").unwrap_or("").to_owned())
            .collect()
    }

    #[test]
    fn max_count() {
        let worksheet = persons();
        let rows = worksheet.rows();

        let survivors = RowFilter::max_count(2).apply(&rows);

        assert_eq!(rows.len(), 3);
        assert_eq!(names(&survivors), ["King", "Kevin"]);
        assert_eq!(RowFilter::max_count(10).apply(&rows).len(), 3);
        assert!(RowFilter::max_count(0).apply(&rows).is_empty());
    }

    #[test]
    fn weekday() {
        let worksheet = persons();
        let rows = worksheet.rows();

        let wednesday = RowFilter::weekday("holidaydate", &["Wednesday"]).unwrap();
        assert_eq!(names(&wednesday.apply(&rows)), ["Kevin"]);

        let either = RowFilter::weekday("holidaydate", &["Wednesday", "Friday"]).unwrap();
        assert_eq!(names(&either.apply(&rows)), ["King", "Kevin"]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn weekday_rejects_unknown_names() {
        assert_eq!(
            RowFilter::weekday("holidaydate", &["Caturday"]),
            Err(FilterError::UnknownWeekday("Caturday".to_owned()))
        );
        assert_eq!(
            RowFilter::weekday::<&str>("holidaydate", &[]),
            Err(FilterError::NoWeekdays("holidaydate".to_owned()))
        );
    }

    #[test]
    fn value() {
        let worksheet = persons();
        let rows = worksheet.rows();

        assert_eq!(names(&RowFilter::value("lastname", "Kong").apply(&rows)), ["King"]);
        assert!(RowFilter::value("lastname", "kong").apply(&rows).is_empty());
        assert!(RowFilter::value("species", "").apply(&rows).is_empty());
    }

    #[test]
    fn value_starts_with() {
        let worksheet = persons();
        let rows = worksheet.rows();

        assert_eq!(names(&RowFilter::value_starts_with("age", "-").apply(&rows)), ["Tommy"]);
        assert!(RowFilter::value_starts_with("species", "").apply(&rows).is_empty());
    }

    #[test]
    fn empty_input_stays_empty() {
        let filters = [
            RowFilter::max_count(3),
            RowFilter::value("a", "b"),
            RowFilter::value_starts_with("a", "b"),
            RowFilter::weekday("a", &["Monday"]).unwrap(),
        ];
        for filter in &filters {
            assert!(filter.apply(&[]).is_empty());
        }
        assert!(filter_rows(&[], &filters).is_empty());
    }

    #[test]
    fn chain_order_matters() {
        let worksheet = Worksheet::builder("Log")
            .row([("kind", "a")])
            .row([("kind", "b")])
            .row([("kind", "a")])
            .row([("kind", "a")])
            .build();
        let rows = worksheet.rows();

        let count_first = filter_rows(&rows, &[RowFilter::max_count(2), RowFilter::value("kind", "a")]);
        let count_last = filter_rows(&rows, &[RowFilter::value("kind", "a"), RowFilter::max_count(2)]);

        assert_eq!(count_first.iter().map(|row| row.index()).collect::<Vec<_>>(), [0]);
        assert_eq!(count_last.iter().map(|row| row.index()).collect::<Vec<_>>(), [0, 2]);
    }

    #[test]
    fn chain_is_repeatable() {
        let worksheet = persons();
        let rows = worksheet.rows();
        let filters = [RowFilter::value_starts_with("age", "4"), RowFilter::max_count(5)];

        assert_eq!(filter_rows(&rows, &filters), filter_rows(&rows, &filters));
        assert_eq!(filter_rows(&rows, &[]), rows);
    }
}
