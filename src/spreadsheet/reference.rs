//! Excel-style cell references ("A1", "AB12").

/// Converts a 0-based column index to column letters: 0 = A, 25 = Z, 26 = AA.
pub(crate) fn col_to_letters(col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::<char>::new();
    while column > 0 {
        column -= 1;
        letters.push((b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    letters.iter().rev().collect()
}

/// Converts 0-based row and column indexes to an Excel-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", col_to_letters(col), row + 1)
}
