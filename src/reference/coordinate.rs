//! Coordinate and grid value types

use crate::error::{XlError, XlResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A 1-based (column, row) cell position. Column 1 is "A", row 1 is the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    column: u32,
    row: u32,
}

impl Coordinate {
    /// Create a coordinate, rejecting a zero column or row
    pub fn new(column: u32, row: u32) -> XlResult<Self> {
        if column == 0 || row == 0 {
            return Err(XlError::MalformedReference(format!("{},{}", column, row)));
        }
        Ok(Self { column, row })
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// `(column, row)` as a plain tuple
    pub fn as_pair(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Format as an A1-style reference (column 28, row 3 → "AB3")
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_to_letters(self.column), self.row)
    }

    /// 0-based (row, col) as used by the xlsx writer
    pub(crate) fn zero_based(&self) -> (u32, u32) {
        (self.row - 1, self.column - 1)
    }
}

// Row-major: sheets store cells keyed by coordinate and iterate top to bottom.
impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Rectangular block of coordinates, row-major, rows and columns ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoordinateGrid {
    rows: Vec<Vec<Coordinate>>,
}

/// Largest number of cells a grid may expand to
pub const MAX_GRID_CELLS: u64 = 1 << 20;

impl CoordinateGrid {
    /// Expand the rectangle spanned by two corners, in either order.
    ///
    /// Fails with `RangeTooLarge` above [`MAX_GRID_CELLS`] cells.
    pub fn spanning(a: Coordinate, b: Coordinate) -> XlResult<Self> {
        let (start_col, end_col) = (a.column.min(b.column), a.column.max(b.column));
        let (start_row, end_row) = (a.row.min(b.row), a.row.max(b.row));

        let width = u64::from(end_col - start_col) + 1;
        let height = u64::from(end_row - start_row) + 1;
        let cells = width.checked_mul(height).unwrap_or(u64::MAX);
        if cells > MAX_GRID_CELLS {
            let start = Coordinate {
                column: start_col,
                row: start_row,
            };
            let end = Coordinate {
                column: end_col,
                row: end_row,
            };
            return Err(XlError::RangeTooLarge {
                range: format!("{}:{}", start.to_a1(), end.to_a1()),
                cells,
                max: MAX_GRID_CELLS,
            });
        }

        let rows = (start_row..=end_row)
            .map(|row| {
                (start_col..=end_col)
                    .map(|column| Coordinate { column, row })
                    .collect()
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Coordinate>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Coordinate>> {
        self.rows
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// All coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.rows.iter().flatten()
    }

    pub fn top_left(&self) -> Option<Coordinate> {
        self.rows.first().and_then(|r| r.first()).copied()
    }

    pub fn bottom_right(&self) -> Option<Coordinate> {
        self.rows.last().and_then(|r| r.last()).copied()
    }
}

impl fmt::Display for CoordinateGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.top_left(), self.bottom_right()) {
            (Some(start), Some(end)) => write!(
                f,
                "{}:{} ({} x {})",
                start.to_a1(),
                end.to_a1(),
                self.height(),
                self.width()
            ),
            _ => write!(f, "(empty)"),
        }
    }
}

/// Convert a 1-based column number to letters (1→A, 26→Z, 27→AA). Column 0 yields "".
pub fn column_to_letters(column: u32) -> String {
    let mut letters = Vec::new();
    let mut n = column;

    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    letters.iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters to a 1-based column number (A→1, Z→26, AA→27).
///
/// Case-insensitive. Returns `None` for an empty string, a non-letter, or a
/// column that does not fit in `u32`.
pub fn letters_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    letters.bytes().try_fold(0u32, |acc, byte| {
        let byte = byte.to_ascii_uppercase();
        if !byte.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(u32::from(byte - b'A' + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(52), "AZ");
        assert_eq!(column_to_letters(53), "BA");
        assert_eq!(column_to_letters(702), "ZZ");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(16384), "XFD");
        assert_eq!(column_to_letters(0), "");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A"), Some(1));
        assert_eq!(letters_to_column("z"), Some(26));
        assert_eq!(letters_to_column("AA"), Some(27));
        assert_eq!(letters_to_column("XFD"), Some(16384));
        assert_eq!(letters_to_column(""), None);
        assert_eq!(letters_to_column("A1"), None);
        // 26^7 already exceeds u32::MAX
        assert_eq!(letters_to_column("ZZZZZZZZ"), None);
    }

    #[test]
    fn test_letters_roundtrip_boundaries() {
        for column in [1, 26, 27, 52, 53, 702, 703, 18278, 18279] {
            assert_eq!(letters_to_column(&column_to_letters(column)), Some(column));
        }
    }

    #[test]
    fn test_coordinate_rejects_zero() {
        assert!(Coordinate::new(0, 1).is_err());
        assert!(Coordinate::new(1, 0).is_err());
        assert!(Coordinate::new(1, 1).is_ok());
    }

    #[test]
    fn test_coordinate_ordering_is_row_major() {
        let b1 = Coordinate::new(2, 1).unwrap();
        let a2 = Coordinate::new(1, 2).unwrap();
        assert!(b1 < a2);
    }

    #[test]
    fn test_coordinate_to_a1() {
        assert_eq!(Coordinate::new(28, 3).unwrap().to_a1(), "AB3");
        assert_eq!(Coordinate::new(1, 1).unwrap().to_string(), "(1, 1)");
    }

    #[test]
    fn test_grid_dimensions() {
        let a = Coordinate::new(3, 2).unwrap();
        let b = Coordinate::new(1, 5).unwrap();
        let grid = CoordinateGrid::spanning(a, b).unwrap();

        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.iter().count(), 12);
        assert_eq!(grid.top_left().unwrap().as_pair(), (1, 2));
        assert_eq!(grid.bottom_right().unwrap().as_pair(), (3, 5));
        assert_eq!(grid.to_string(), "A2:C5 (4 x 3)");
    }

    #[test]
    fn test_grid_size_limit() {
        let a = Coordinate::new(1, 1).unwrap();
        let edge = Coordinate::new(1024, 1024).unwrap();
        assert_eq!(CoordinateGrid::spanning(a, edge).unwrap().iter().count(), 1 << 20);

        let over = Coordinate::new(1025, 1024).unwrap();
        let err = CoordinateGrid::spanning(over, a).unwrap_err();
        match err {
            XlError::RangeTooLarge { range, cells, max } => {
                assert_eq!(range, "A1:AMK1024");
                assert_eq!(cells, 1025 * 1024);
                assert_eq!(max, MAX_GRID_CELLS);
            }
            other => panic!("Expected RangeTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_grid_into_rows() {
        let a = Coordinate::new(1, 1).unwrap();
        let b = Coordinate::new(2, 2).unwrap();
        let rows = CoordinateGrid::spanning(a, b).unwrap().into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].as_pair(), (1, 2));
    }
}
