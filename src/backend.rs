//! Spreadsheet backend seam
//!
//! The session never touches a file format directly. A backend opens and writes
//! workbooks and hands out a handle that owns the in-memory model.

use crate::error::XlResult;
use crate::reference::Coordinate;
use crate::types::{CellContent, CellInput, CellStyle};
use std::path::Path;

/// An open, in-memory workbook
pub trait WorkbookHandle {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|s| s == name)
    }

    /// Append an empty sheet. Fails with `DuplicateSheet` if the name is taken.
    fn add_sheet(&mut self, name: &str) -> XlResult<()>;

    /// Fails with `SheetNotFound`
    fn remove_sheet(&mut self, name: &str) -> XlResult<()>;

    /// Read a cell. Cells never written read as empty with the default style.
    fn get_cell(&self, sheet: &str, coord: Coordinate) -> XlResult<CellContent>;

    /// Write a value or formula. `style: None` keeps the cell's current style.
    fn set_cell(
        &mut self,
        sheet: &str,
        coord: Coordinate,
        input: CellInput,
        style: Option<CellStyle>,
    ) -> XlResult<()>;
}

/// Reads and writes persisted workbooks
pub trait SpreadsheetBackend {
    type Handle: WorkbookHandle;

    /// A workbook with no sheets
    fn new_workbook(&self) -> Self::Handle;

    /// Fails with `NotFound` when `path` does not exist, `Parse` when it cannot be read
    fn read_workbook(&self, path: &Path) -> XlResult<Self::Handle>;

    fn write_workbook(&self, workbook: &Self::Handle, path: &Path) -> XlResult<()>;
}
