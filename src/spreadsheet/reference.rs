//! Excel-style cell references ("A1", "AB12") and their 0-based indexes.
use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Z]+)\$?(\d+)$").expect("Hardcode regex pattern"));

/// Converts column letters to a 0-based column index ("A" = 0, "AA" = 26).
pub(crate) fn col_to_index(col: &str) -> Option<usize> {
    if col.is_empty() {
        return None;
    }
    col.bytes().try_fold(0usize, |index, byte| {
        if byte.is_ascii_uppercase() {
            index.checked_mul(26)?.checked_add((byte - b'A') as usize + 1)
        } else {
            None
        }
    })
    .map(|number| number - 1)
}

/// Converts a 1-based row number to a 0-based row index.
pub(crate) fn row_to_index(row: &str) -> Option<usize> {
    row.parse::<usize>().ok().and_then(|number| number.checked_sub(1))
}

/// Parses a reference such as "C7" into `(row, col)` indexes.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let captures = REFERENCE.captures(reference)?;
    let col = col_to_index(captures.get(1)?.as_str())?;
    let row = row_to_index(captures.get(2)?.as_str())?;
    Some((row, col))
}

/// Formats `(row, col)` indexes as a reference such as "C7".
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut number = col + 1;
    while number > 0 {
        let remainder = (number - 1) % 26;
        letters.push(b'A' + remainder as u8);
        number = (number - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}
