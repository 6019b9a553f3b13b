//! Excel importer implementation - .xlsx → in-memory workbook

use crate::error::{XlError, XlResult};
use crate::reference::Coordinate;
use crate::types::{CellContent, CellStyle, CellValue};
use crate::workbook::{Sheet, Workbook};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Number format given to imported date-time cells (calamine exposes no styles)
const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Reads an .xlsx file into a [`Workbook`]
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read every sheet: values, cached formula results and formulas
    pub fn import(&self) -> XlResult<Workbook> {
        if !self.path.exists() {
            return Err(XlError::NotFound(self.path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| XlError::Parse(format!("{}: {}", self.path.display(), e)))?;

        let mut model = Workbook::new();

        for sheet_name in workbook.sheet_names().to_vec() {
            let mut sheet = Sheet::new(sheet_name.as_str());

            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                XlError::Parse(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            self.read_values(&range, &mut sheet);

            // Sheets without formulas are fine
            if let Ok(formulas) = workbook.worksheet_formula(&sheet_name) {
                self.read_formulas(&formulas, &mut sheet);
            }

            debug!(sheet = %sheet_name, cells = sheet.len(), "imported sheet");
            model.push_sheet(sheet)?;
        }

        Ok(model)
    }

    fn read_values(&self, range: &Range<Data>, sheet: &mut Sheet) {
        let Some((start_row, start_col)) = range.start() else {
            return; // empty sheet
        };

        for (row, col, data) in range.used_cells() {
            let Some(coord) = absolute(start_row, start_col, row, col) else {
                continue;
            };
            let (value, style) = convert_data(data);
            sheet.insert(
                coord,
                CellContent {
                    value,
                    formula: None,
                    style,
                },
            );
        }
    }

    fn read_formulas(&self, formulas: &Range<String>, sheet: &mut Sheet) {
        let Some((start_row, start_col)) = formulas.start() else {
            return;
        };

        for (row, col, formula) in formulas.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let Some(coord) = absolute(start_row, start_col, row, col) else {
                continue;
            };
            // Value (if any) was already stored as the cached result
            let mut content = sheet.get(coord).cloned().unwrap_or_default();
            content.formula = Some(formula.strip_prefix('=').unwrap_or(formula).to_string());
            sheet.insert(coord, content);
        }
    }
}

/// calamine ranges are positioned at `start`; cells are addressed relative to it
fn absolute(start_row: u32, start_col: u32, row: usize, col: usize) -> Option<Coordinate> {
    let row = start_row.checked_add(u32::try_from(row).ok()?)?.checked_add(1)?;
    let col = start_col.checked_add(u32::try_from(col).ok()?)?.checked_add(1)?;
    Coordinate::new(col, row).ok()
}

/// Convert a calamine cell into a value plus the style it implies
fn convert_data(data: &Data) -> (CellValue, CellStyle) {
    let value = match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let code = if serial.fract() == 0.0 {
                DATE_FORMAT
            } else {
                DATETIME_FORMAT
            };
            return (
                CellValue::DateTime(serial),
                CellStyle::default().with_number_format(code),
            );
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    };
    (value, CellStyle::default())
}
