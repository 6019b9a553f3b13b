//! xlsx backend
//!
//! Bidirectional conversion between .xlsx files and the in-memory [`Workbook`]:
//! - Import: calamine (values, cached formula results, formulas)
//! - Export: rust_xlsxwriter (values, formulas, basic styles)

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;

use crate::backend::SpreadsheetBackend;
use crate::error::XlResult;
use crate::workbook::Workbook;
use std::path::Path;

/// Default backend: .xlsx files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxBackend;

impl SpreadsheetBackend for XlsxBackend {
    type Handle = Workbook;

    fn new_workbook(&self) -> Workbook {
        Workbook::new()
    }

    fn read_workbook(&self, path: &Path) -> XlResult<Workbook> {
        ExcelImporter::new(path).import()
    }

    fn write_workbook(&self, workbook: &Workbook, path: &Path) -> XlResult<()> {
        ExcelExporter::new(workbook).export(path)
    }
}
