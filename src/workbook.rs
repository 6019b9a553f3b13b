//! In-memory workbook model used by the xlsx backend

use crate::backend::WorkbookHandle;
use crate::error::{XlError, XlResult};
use crate::reference::Coordinate;
use crate::types::{CellContent, CellInput, CellStyle, CellValue};
use std::collections::BTreeMap;

/// A named, sparse grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<Coordinate, CellContent>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, coord: Coordinate) -> Option<&CellContent> {
        self.cells.get(&coord)
    }

    /// Store a cell; blank content removes it
    pub fn insert(&mut self, coord: Coordinate, content: CellContent) {
        if content.is_blank() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, content);
        }
    }

    /// Non-blank cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (&Coordinate, &CellContent)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest rectangle holding every stored cell, as (top-left, bottom-right)
    pub fn used_bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.cells.keys().next()?;
        let last = self.cells.keys().next_back()?;
        let min_col = self.cells.keys().map(Coordinate::column).min()?;
        let max_col = self.cells.keys().map(Coordinate::column).max()?;

        let top_left = Coordinate::new(min_col, first.row()).ok()?;
        let bottom_right = Coordinate::new(max_col, last.row()).ok()?;
        Some((top_left, bottom_right))
    }
}

/// Ordered collection of uniquely named sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Append a populated sheet
    pub fn push_sheet(&mut self, sheet: Sheet) -> XlResult<()> {
        if self.sheet(&sheet.name).is_some() {
            return Err(XlError::DuplicateSheet(sheet.name));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    fn require_sheet(&self, name: &str) -> XlResult<&Sheet> {
        self.sheet(name)
            .ok_or_else(|| XlError::SheetNotFound(name.to_string()))
    }
}

impl WorkbookHandle for Workbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    fn add_sheet(&mut self, name: &str) -> XlResult<()> {
        self.push_sheet(Sheet::new(name))
    }

    fn remove_sheet(&mut self, name: &str) -> XlResult<()> {
        let idx = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| XlError::SheetNotFound(name.to_string()))?;
        self.sheets.remove(idx);
        Ok(())
    }

    fn get_cell(&self, sheet: &str, coord: Coordinate) -> XlResult<CellContent> {
        Ok(self
            .require_sheet(sheet)?
            .get(coord)
            .cloned()
            .unwrap_or_default())
    }

    fn set_cell(
        &mut self,
        sheet: &str,
        coord: Coordinate,
        input: CellInput,
        style: Option<CellStyle>,
    ) -> XlResult<()> {
        let target = self
            .sheet_mut(sheet)
            .ok_or_else(|| XlError::SheetNotFound(sheet.to_string()))?;

        let mut content = target.get(coord).cloned().unwrap_or_default();
        match input {
            CellInput::Value(value) => {
                content.value = value;
                content.formula = None;
            }
            CellInput::Formula { formula, cached } => {
                let formula = formula.strip_prefix('=').unwrap_or(&formula).to_string();
                content.value = cached.unwrap_or(CellValue::Empty);
                content.formula = Some(formula);
            }
        }
        if let Some(style) = style {
            content.style = style;
        }

        target.insert(coord, content);
        Ok(())
    }
}
