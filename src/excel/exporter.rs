//! Excel exporter implementation - in-memory workbook → .xlsx

use crate::error::{XlError, XlResult};
use crate::reference::Coordinate;
use crate::types::{CellContent, CellStyle, CellValue};
use crate::workbook::{Sheet, Workbook};
use rust_xlsxwriter::{Color, Format, Formula, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

/// Writes a [`Workbook`] to an .xlsx file
pub struct ExcelExporter<'a> {
    workbook: &'a Workbook,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Export every sheet, in order, to `output_path`
    pub fn export(&self, output_path: &Path) -> XlResult<()> {
        let mut xlsx = XlsxWorkbook::new();

        for sheet in self.workbook.sheets() {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet.name()).map_err(|e| {
                XlError::Export(format!(
                    "Failed to set worksheet name '{}': {}",
                    sheet.name(),
                    e
                ))
            })?;
            self.export_sheet(sheet, worksheet)?;
        }

        xlsx.save(output_path).map_err(|e| {
            XlError::Export(format!("Failed to save {}: {}", output_path.display(), e))
        })?;

        Ok(())
    }

    fn export_sheet(&self, sheet: &Sheet, worksheet: &mut Worksheet) -> XlResult<()> {
        for (coord, content) in sheet.cells() {
            write_cell(worksheet, *coord, content)?;
        }
        debug!(sheet = %sheet.name(), cells = sheet.len(), "exported sheet");
        Ok(())
    }
}

fn write_cell(worksheet: &mut Worksheet, coord: Coordinate, content: &CellContent) -> XlResult<()> {
    let (row, col) = coord.zero_based();
    let col = u16::try_from(col)
        .map_err(|_| XlError::Export(format!("Column out of range at {}", coord.to_a1())))?;
    let format = build_format(&content.style);
    let failed = |e: XlsxError| XlError::Export(format!("Failed to write {}: {}", coord.to_a1(), e));

    if let Some(formula) = &content.formula {
        let mut formula = Formula::new(formula);
        if !content.value.is_empty() {
            formula = formula.set_result(content.value.to_string());
        }
        worksheet
            .write_formula_with_format(row, col, formula, &format)
            .map_err(failed)?;
        return Ok(());
    }

    match &content.value {
        CellValue::Empty => worksheet.write_blank(row, col, &format),
        CellValue::Number(n) | CellValue::DateTime(n) => {
            worksheet.write_number_with_format(row, col, *n, &format)
        }
        CellValue::Text(s) | CellValue::Error(s) => {
            worksheet.write_string_with_format(row, col, s, &format)
        }
        CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, &format),
    }
    .map_err(failed)?;

    Ok(())
}

fn build_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if let Some(code) = &style.number_format {
        format = format.set_num_format(code);
    }
    if let Some(rgb) = style.fill_color {
        format = format.set_background_color(Color::RGB(rgb));
    }
    format
}
