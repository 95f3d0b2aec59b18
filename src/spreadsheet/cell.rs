use crate::error::SheetError;
use crate::spreadsheet::reference::index_to_reference;
use chrono::NaiveDate;
use chrono::TimeDelta;

/// Types of cell data in workbook files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 1/0
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// ISO 8601 duration strings
    IsoDuration,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Analyzes format codes for date/time patterns.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_color && !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A single non-empty cell read from a workbook.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the workbook
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Renders the cell the way a spreadsheet shows it: dates as `YYYY-MM-DD`,
    /// date-times as `YYYY-MM-DD HH:MM:SS`, booleans as `TRUE`/`FALSE`.
    pub(crate) fn text(&self) -> Result<String, SheetError> {
        let text = match self.kind {
            CellType::Boolean => Ok(if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            CellType::NumberDateTime1900 => to_datetime_string(&self.value, false),
            CellType::NumberDate1900 => to_date_string(&self.value, false),
            CellType::NumberDateTime1904 => to_datetime_string(&self.value, true),
            CellType::NumberDate1904 => to_date_string(&self.value, true),
            CellType::NumberTime1900 | CellType::NumberTime1904 => to_time_string(&self.value),
            CellType::IsoDateTime => Ok(self.value.replace('T', " ")),
            CellType::IsoDuration => Ok(self
                .value
                .replace("PT", "")
                .replace('H', ":")
                .replace('M', ":")
                .replace('S', "")),
            _ => Ok(self.value.to_owned()),
        }
        .map_err(|e| SheetError::WithContextError(format!("Cell {}: {}", self.reference(), e)))?;
        Ok(text)
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Rounds an Excel serial to whole seconds once, so the date and the time of
/// day always come from the same instant.
fn to_serial_seconds(value: &str) -> Result<i64, SheetError> {
    let serial = value.parse::<f64>()?;
    let seconds = (serial * SECONDS_PER_DAY as f64).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return Err(SheetError::WithContextError(format!("Date serial '{value}' out of range")));
    }
    Ok(seconds as i64)
}

/// Converts Excel numeric date to ISO date string.
/// Handles Lotus 1-2-3 leap year bug for 1900 epoch.
fn to_date_string(value: &str, is_1904: bool) -> Result<String, SheetError> {
    let out_of_range = || SheetError::WithContextError(format!("Date serial '{value}' out of range"));
    let days = to_serial_seconds(value)?.div_euclid(SECONDS_PER_DAY);
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let duration = days.checked_add(offset).and_then(TimeDelta::try_days).ok_or_else(out_of_range)?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .ok_or_else(|| SheetError::WithContextError("Invalid date epoch".to_owned()))?;
    let date = epoch.checked_add_signed(duration).ok_or_else(out_of_range)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Converts Excel numeric time (fraction of a day) to `HH:MM:SS`.
fn to_time_string(value: &str) -> Result<String, SheetError> {
    let mut seconds = to_serial_seconds(value)?.rem_euclid(SECONDS_PER_DAY);
    let hours = seconds / 3_600;
    seconds %= 3_600;
    let minutes = seconds / 60;
    seconds %= 60;
    Ok(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}

/// Converts Excel numeric datetime to `YYYY-MM-DD HH:MM:SS`.
fn to_datetime_string(value: &str, is_1904: bool) -> Result<String, SheetError> {
    let date = to_date_string(value, is_1904)?;
    let time = to_time_string(value)?;
    Ok(format!("{date} {time}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell {
            row: 0,
            col: 0,
            kind,
            value: value.to_owned(),
        }
    }

    #[test]
    fn serial_dates_render_as_calendar_dates() {
        assert_eq!(cell(CellType::NumberDate1900, "41824").text().unwrap(), "2014-07-04");
        assert_eq!(cell(CellType::NumberDate1900, "24763").text().unwrap(), "1967-10-18");
        assert_eq!(cell(CellType::NumberDate1904, "40362").text().unwrap(), "2014-07-04");
        assert_eq!(cell(CellType::NumberDateTime1900, "41824.4166666667").text().unwrap(), "2014-07-04 10:00:00");
        assert_eq!(cell(CellType::NumberTime1900, "0.5").text().unwrap(), "12:00:00");
    }

    #[test]
    fn other_kinds_render_verbatim() {
        assert_eq!(cell(CellType::Boolean, "1").text().unwrap(), "TRUE");
        assert_eq!(cell(CellType::Boolean, "0").text().unwrap(), "FALSE");
        assert_eq!(cell(CellType::Number, "-23.4").text().unwrap(), "-23.4");
        assert_eq!(cell(CellType::IsoDateTime, "2014-07-04").text().unwrap(), "2014-07-04");
        assert_eq!(cell(CellType::IsoDuration, "PT10H30M00S").text().unwrap(), "10:30:00");
    }

    #[test]
    fn broken_serial_names_the_cell() {
        let error = cell(CellType::NumberDate1900, "soon").text().unwrap_err();
        assert!(error.to_string().starts_with("Cell A1:"), "{error}");
    }

    #[test]
    fn huge_serial_is_out_of_range() {
        for value in ["1e300", "-1e300", "9223372036854775807", "1e15", "2e11", "1e10"] {
            let error = cell(CellType::NumberDate1900, value).text().unwrap_err();
            assert_eq!(error.to_string(), format!("Cell A1: Date serial '{value}' out of range"));
        }
        let error = cell(CellType::NumberDateTime1904, "1e300").text().unwrap_err();
        assert!(error.to_string().ends_with("out of range"), "{error}");
    }

    #[test]
    fn last_second_of_day_rolls_over_once() {
        assert_eq!(cell(CellType::NumberDateTime1900, "41824.999999").text().unwrap(), "2014-07-05 00:00:00");
        assert_eq!(cell(CellType::NumberDateTime1900, "41824.99998").text().unwrap(), "2014-07-04 23:59:58");
        assert_eq!(cell(CellType::NumberTime1900, "0.999999").text().unwrap(), "00:00:00");
    }

    #[test]
    fn custom_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", true), CellType::NumberDateTime1904);
        assert_eq!(CellType::parse_custom_number_format("[Red]0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("\"days\"0", false), CellType::Number);
    }
}
