//! A1-style reference resolution
//!
//! Converts human-readable references into 1-based coordinates:
//! - `"B3"` → `(2, 3)`
//! - `"A1:B2"` → `[[(1,1),(2,1)],[(1,2),(2,2)]]`
//! - `"B10:A1"` → same grid as `"A1:B10"` (corners are normalized)
//!
//! Every function here is pure. Nothing is cached per call apart from the
//! compiled reference pattern.

mod coordinate;

pub use coordinate::{
    column_to_letters, letters_to_column, Coordinate, CoordinateGrid, MAX_GRID_CELLS,
};

use crate::error::{XlError, XlResult};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Compiled `LETTERS DIGITS` pattern, applied to the upper-cased reference
fn cell_pattern(reference: &str) -> XlResult<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"^([A-Z]+)([0-9]+)$").map_err(|e| {
        XlError::MalformedReference(format!("{} (pattern error: {})", reference, e))
    })?;
    Ok(PATTERN.get_or_init(|| re))
}

/// Resolve a single cell reference such as `"AB27"` (case-insensitive)
pub fn resolve_cell(reference: &str) -> XlResult<Coordinate> {
    let malformed = || XlError::MalformedReference(reference.to_string());

    let upper = reference.to_ascii_uppercase();
    let caps = cell_pattern(reference)?
        .captures(&upper)
        .ok_or_else(malformed)?;

    let column = letters_to_column(&caps[1]).ok_or_else(malformed)?;
    let row: u32 = caps[2].parse().map_err(|_| malformed())?;

    // "A0" matches the pattern but has no 1-based row
    Coordinate::new(column, row).map_err(|_| malformed())
}

/// Resolve a range reference such as `"A1:C3"` into a row-major grid
pub fn resolve_range(range: &str) -> XlResult<CoordinateGrid> {
    let mut parts = range.split(':');
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(XlError::MalformedRange(range.to_string()));
    };

    let start = resolve_cell(start)?;
    let end = resolve_cell(end)?;
    CoordinateGrid::spanning(start, end)
}

/// Resolve a heterogeneous list of references, preserving order.
///
/// Fails on the first element that does not resolve.
pub fn resolve_mixed(refs: &[RefInput]) -> XlResult<Vec<Resolved>> {
    refs.iter().map(RefInput::resolve).collect()
}

/// One element of a mixed reference list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefInput {
    /// `"A1"` or `"A1:B2"`; a colon selects range resolution
    Text(String),
    /// Pre-resolved `(column, row)`
    Pair(u32, u32),
}

impl RefInput {
    pub fn is_range(&self) -> bool {
        matches!(self, RefInput::Text(s) if s.contains(':'))
    }

    pub fn resolve(&self) -> XlResult<Resolved> {
        match self {
            RefInput::Text(s) if s.contains(':') => resolve_range(s).map(Resolved::Grid),
            RefInput::Text(s) => resolve_cell(s).map(Resolved::Cell),
            RefInput::Pair(column, row) => Coordinate::new(*column, *row).map(Resolved::Cell),
        }
    }
}

impl From<&str> for RefInput {
    fn from(s: &str) -> Self {
        RefInput::Text(s.to_string())
    }
}

impl From<String> for RefInput {
    fn from(s: String) -> Self {
        RefInput::Text(s)
    }
}

impl From<(u32, u32)> for RefInput {
    fn from((column, row): (u32, u32)) -> Self {
        RefInput::Pair(column, row)
    }
}

impl From<Coordinate> for RefInput {
    fn from(coord: Coordinate) -> Self {
        RefInput::Pair(coord.column(), coord.row())
    }
}

/// Parses `"A1"`, `"A1:B2"` or a `"column,row"` pair such as `"3,7"`
impl FromStr for RefInput {
    type Err = XlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(',') {
            Some((column, row)) => {
                let malformed = || XlError::MalformedReference(s.to_string());
                let column = column.trim().parse().map_err(|_| malformed())?;
                let row = row.trim().parse().map_err(|_| malformed())?;
                Ok(RefInput::Pair(column, row))
            }
            None => Ok(RefInput::Text(s.to_string())),
        }
    }
}

impl fmt::Display for RefInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefInput::Text(s) => write!(f, "{}", s),
            RefInput::Pair(column, row) => write!(f, "{},{}", column, row),
        }
    }
}

/// Result of resolving one [`RefInput`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Cell(Coordinate),
    Grid(CoordinateGrid),
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Cell(coord) => write!(f, "{} {}", coord.to_a1(), coord),
            Resolved::Grid(grid) => write!(f, "{}", grid),
        }
    }
}
