//! Reference resolution tests
//!
//! Column letters are bijective base-26, rows are 1-based, ranges expand to
//! row-major grids whatever order their corners are given in.

use pretty_assertions::assert_eq;
use xlkit::reference::{column_to_letters, letters_to_column, MAX_GRID_CELLS};
use xlkit::{resolve_cell, resolve_mixed, resolve_range, Coordinate, RefInput, Resolved, XlError};

fn coord(column: u32, row: u32) -> Coordinate {
    Coordinate::new(column, row).unwrap()
}

fn grid_pairs(range: &str) -> Vec<Vec<(u32, u32)>> {
    resolve_range(range)
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.iter().map(Coordinate::as_pair).collect())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// SINGLE CELLS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_resolve_cell_basic() {
    assert_eq!(resolve_cell("A1").unwrap(), coord(1, 1));
    assert_eq!(resolve_cell("Z1").unwrap(), coord(26, 1));
    assert_eq!(resolve_cell("A100").unwrap(), coord(1, 100));
    assert_eq!(resolve_cell("B3").unwrap().as_pair(), (2, 3));
}

#[test]
fn test_resolve_cell_column_rollover() {
    assert_eq!(resolve_cell("AA1").unwrap().column(), 27);
    assert_eq!(resolve_cell("AZ1").unwrap().column(), 52);
    assert_eq!(resolve_cell("BA1").unwrap().column(), 53);
    assert_eq!(resolve_cell("ZZ1").unwrap().column(), 702);
    assert_eq!(resolve_cell("AAA1").unwrap().column(), 703);
    assert_eq!(resolve_cell("XFD1").unwrap().column(), 16384);
}

#[test]
fn test_resolve_cell_case_insensitive() {
    assert_eq!(resolve_cell("a1").unwrap(), resolve_cell("A1").unwrap());
    assert_eq!(resolve_cell("xfd9").unwrap(), resolve_cell("XFD9").unwrap());
}

#[test]
fn test_resolve_cell_malformed() {
    for bad in ["1A", "", "A", "A1B", "1", "A 1", "A1:B2", "A0"] {
        match resolve_cell(bad) {
            Err(XlError::MalformedReference(s)) => assert_eq!(s, bad),
            other => panic!("expected MalformedReference for {:?}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_resolve_cell_is_deterministic() {
    assert_eq!(resolve_cell("QR42").unwrap(), resolve_cell("QR42").unwrap());
    assert_eq!(grid_pairs("C3:A1"), grid_pairs("C3:A1"));
}

#[test]
fn test_letters_round_trip_through_a1() {
    for column in [1, 26, 27, 52, 53, 702, 703, 16384] {
        let letters = column_to_letters(column);
        assert_eq!(letters_to_column(&letters), Some(column));
        assert_eq!(resolve_cell(&format!("{}7", letters)).unwrap(), coord(column, 7));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RANGES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_resolve_range_two_by_two() {
    assert_eq!(
        grid_pairs("A1:B2"),
        vec![vec![(1, 1), (2, 1)], vec![(1, 2), (2, 2)]]
    );
}

#[test]
fn test_resolve_range_single_cell() {
    assert_eq!(grid_pairs("A1:A1"), vec![vec![(1, 1)]]);
}

#[test]
fn test_resolve_range_reversed_corners() {
    assert_eq!(
        resolve_range("B10:A1").unwrap(),
        resolve_range("A1:B10").unwrap()
    );
    assert_eq!(grid_pairs("B2:A1"), grid_pairs("A2:B1"));
}

#[test]
fn test_resolve_range_shape() {
    let grid = resolve_range("B2:D5").unwrap();
    assert_eq!(grid.height(), 4);
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.top_left(), Some(coord(2, 2)));
    assert_eq!(grid.bottom_right(), Some(coord(4, 5)));
    // every row shares its row number, every column its column number
    for (i, row) in grid.rows().iter().enumerate() {
        assert!(row.iter().all(|c| c.row() == 2 + i as u32));
        for (j, c) in row.iter().enumerate() {
            assert_eq!(c.column(), 2 + j as u32);
        }
    }
}

#[test]
fn test_resolve_range_lowercase() {
    assert_eq!(resolve_range("a1:b2").unwrap(), resolve_range("A1:B2").unwrap());
}

#[test]
fn test_resolve_range_errors() {
    assert!(matches!(resolve_range("A1"), Err(XlError::MalformedRange(_))));
    assert!(matches!(resolve_range("A1:B2:C3"), Err(XlError::MalformedRange(_))));
    assert!(matches!(resolve_range("A1:1A"), Err(XlError::MalformedReference(_))));
    assert!(matches!(resolve_range("A1:"), Err(XlError::MalformedReference(_))));
}

#[test]
fn test_resolve_range_too_large() {
    // a whole xlsx sheet, and a column reaching the last u32 row
    for range in ["A1:XFD1048576", "A1:A4294967295", "XFD1048576:A1"] {
        match resolve_range(range) {
            Err(err @ XlError::RangeTooLarge { .. }) => assert!(err.is_reference_error()),
            other => panic!("expected RangeTooLarge for {:?}, got {:?}", range, other),
        }
    }
}

#[test]
fn test_resolve_range_at_size_limit() {
    let grid = resolve_range("A1:AMJ1024").unwrap();
    assert_eq!(grid.iter().count() as u64, MAX_GRID_CELLS);
}

// ═══════════════════════════════════════════════════════════════════════════
// MIXED LISTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_resolve_mixed_preserves_order_and_shape() {
    let refs = vec![
        RefInput::from("B3"),
        RefInput::Pair(4, 9),
        RefInput::from("A1:B1"),
        RefInput::from(coord(3, 3)),
    ];
    let resolved = resolve_mixed(&refs).unwrap();

    assert_eq!(resolved.len(), 4);
    assert_eq!(resolved[0], Resolved::Cell(coord(2, 3)));
    assert_eq!(resolved[1], Resolved::Cell(coord(4, 9)));
    match &resolved[2] {
        Resolved::Grid(grid) => {
            assert_eq!(grid.height(), 1);
            assert_eq!(grid.width(), 2);
        }
        other => panic!("Expected grid, got {:?}", other),
    }
    assert_eq!(resolved[3], Resolved::Cell(coord(3, 3)));
}

#[test]
fn test_resolve_mixed_empty() {
    assert!(resolve_mixed(&[]).unwrap().is_empty());
}

#[test]
fn test_resolve_mixed_fails_on_bad_element() {
    let refs = vec![RefInput::from("A1"), RefInput::from("??"), RefInput::Pair(0, 1)];
    let err = resolve_mixed(&refs).unwrap_err();
    assert!(matches!(err, XlError::MalformedReference(ref s) if s == "??"));

    let refs = vec![RefInput::from("B2"), RefInput::from("A1:XFD1048576")];
    assert!(matches!(resolve_mixed(&refs), Err(XlError::RangeTooLarge { .. })));
}

#[test]
fn test_resolved_serializes_as_plain_coordinates() {
    let cell = resolve_mixed(&[RefInput::from("C2")]).unwrap();
    let json = serde_json::to_value(&cell).unwrap();
    assert_eq!(json, serde_json::json!([{ "column": 3, "row": 2 }]));

    let grid = resolve_mixed(&[RefInput::from("A1:A2")]).unwrap();
    let json = serde_json::to_value(&grid).unwrap();
    assert_eq!(
        json,
        serde_json::json!([[[{ "column": 1, "row": 1 }], [{ "column": 1, "row": 2 }]]])
    );
}
