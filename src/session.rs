//! Workbook session
//!
//! Tracks the workbooks opened through a backend plus the active workbook and
//! sheet. Files live at `<directory>/<name>.<extension>`; when a call leaves the
//! directory unset, the directory of the last `open` is used, then
//! [`SessionConfig::default_directory`].
//!
//! Every operation returns a `Result`. Diagnostics are emitted with `tracing`.

use crate::backend::{SpreadsheetBackend, WorkbookHandle};
use crate::config::SessionConfig;
use crate::error::{XlError, XlResult};
use crate::reference::{resolve_mixed, Coordinate, RefInput, Resolved};
use crate::types::{FetchFormat, Fetched, FetchedItem};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sheet created by [`Session::add_workbook`]
pub const DEFAULT_SHEET: &str = "Sheet1";

struct OpenWorkbook<H> {
    name: String,
    handle: H,
}

pub struct Session<B: SpreadsheetBackend> {
    backend: B,
    config: SessionConfig,
    /// Insertion order is listing and `save_all` order
    workbooks: Vec<OpenWorkbook<B::Handle>>,
    active_workbook: Option<String>,
    active_sheet: Option<String>,
    input_dir: Option<PathBuf>,
}

impl<B: SpreadsheetBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SessionConfig::default())
    }

    pub fn with_config(backend: B, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            workbooks: Vec::new(),
            active_workbook: None,
            active_sheet: None,
            input_dir: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True while at least one workbook is open
    pub fn is_open(&self) -> bool {
        !self.workbooks.is_empty()
    }

    /// Directory of the last `open`, cleared once every workbook is closed
    pub fn input_dir(&self) -> Option<&Path> {
        self.input_dir.as_deref()
    }

    pub fn active_workbook_name(&self) -> Option<&str> {
        self.active_workbook.as_deref()
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    //--------------------------------------------------------------------------
    // File management
    //--------------------------------------------------------------------------

    /// Open `names` from `directory`, adding each under its name.
    ///
    /// Stops at the first file that fails; files opened before it stay open.
    /// Opening a single file into an otherwise empty session selects it.
    pub fn open<S: AsRef<str>>(
        &mut self,
        names: &[S],
        directory: Option<&Path>,
        extension: Option<&str>,
    ) -> XlResult<()> {
        let directory = directory
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.default_directory.clone());
        self.input_dir = Some(directory.clone());

        for name in names {
            let name = name.as_ref();
            let path = self.path_for(&directory, name, extension);

            let handle = self.backend.read_workbook(&path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "opening failed");
                e
            })?;

            self.insert(name, handle);
            info!(workbook = name, path = %path.display(), "opened");
        }

        if let [only] = names {
            if self.workbooks.len() == 1 {
                self.use_workbook(only.as_ref())?;
            }
        }

        Ok(())
    }

    /// Write the active workbook under its own name
    pub fn save(&self, directory: Option<&Path>, extension: Option<&str>) -> XlResult<PathBuf> {
        let name = self.require_active_workbook()?;
        let path = self.path_for(&self.output_dir(directory), name, extension);

        self.write(name, &path)?;
        info!(workbook = name, path = %path.display(), "saved");
        Ok(path)
    }

    /// Write the active workbook once per name in `names`.
    ///
    /// Every name is attempted; the first failure is returned afterwards.
    pub fn save_as<S: AsRef<str>>(
        &self,
        names: &[S],
        directory: Option<&Path>,
        extension: Option<&str>,
    ) -> XlResult<Vec<PathBuf>> {
        let active = self.require_active_workbook()?;
        let directory = self.output_dir(directory);

        let mut saved = Vec::new();
        let mut first_error = None;

        for name in names {
            let path = self.path_for(&directory, name.as_ref(), extension);
            match self.write(active, &path) {
                Ok(()) => {
                    info!(workbook = active, path = %path.display(), "saved as");
                    saved.push(path);
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    /// Write every open workbook under its own name, stopping at the first failure
    pub fn save_all(
        &self,
        directory: Option<&Path>,
        extension: Option<&str>,
    ) -> XlResult<Vec<PathBuf>> {
        if !self.is_open() {
            return Err(XlError::NoWorkbooksOpen);
        }
        let directory = self.output_dir(directory);

        let mut saved = Vec::with_capacity(self.workbooks.len());
        for open in &self.workbooks {
            let path = self.path_for(&directory, &open.name, extension);
            self.write(&open.name, &path)?;
            info!(workbook = %open.name, path = %path.display(), "saved");
            saved.push(path);
        }
        Ok(saved)
    }

    /// Delete the file of `name` (or the active workbook), optionally closing it first
    pub fn delete(
        &mut self,
        name: Option<&str>,
        close: bool,
        directory: Option<&Path>,
        extension: Option<&str>,
    ) -> XlResult<PathBuf> {
        let target = name
            .or(self.active_workbook.as_deref())
            .ok_or(XlError::NoWorkbookSelected)?
            .to_string();
        let path = self.path_for(&self.output_dir(directory), &target, extension);

        if close && self.position(&target).is_some() {
            self.close(Some(&target))?;
        }

        fs::remove_file(&path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to delete workbook");
            match e.kind() {
                io::ErrorKind::NotFound => XlError::NotFound(path.display().to_string()),
                _ => XlError::Io(e),
            }
        })?;

        info!(workbook = %target, path = %path.display(), "deleted workbook");
        Ok(path)
    }

    /// Close `name` (or the active workbook) without saving
    pub fn close(&mut self, name: Option<&str>) -> XlResult<()> {
        if !self.is_open() {
            return Err(XlError::NoWorkbooksOpen);
        }

        let target = name
            .or(self.active_workbook.as_deref())
            .ok_or(XlError::NoWorkbookSelected)?
            .to_string();
        let idx = self
            .position(&target)
            .ok_or_else(|| XlError::WorkbookNotOpen(target.clone()))?;

        self.workbooks.remove(idx);
        info!(workbook = %target, "closed");

        if self.active_workbook.as_deref() == Some(target.as_str()) {
            self.active_workbook = None;
            self.active_sheet = None;
        }

        if self.workbooks.is_empty() {
            self.input_dir = None;
            debug!("no workbooks left open");
        }

        Ok(())
    }

    /// Close every workbook without saving
    pub fn close_all(&mut self) -> XlResult<()> {
        if !self.is_open() {
            return Err(XlError::NoWorkbooksOpen);
        }

        self.active_workbook = None;
        self.active_sheet = None;
        for open in self.workbooks.drain(..) {
            info!(workbook = %open.name, "closed");
        }
        self.input_dir = None;
        debug!("no workbooks left open");

        Ok(())
    }

    //--------------------------------------------------------------------------
    // Workbooks
    //--------------------------------------------------------------------------

    /// Names of open workbooks in the order they were opened
    pub fn list_workbooks(&self) -> XlResult<Vec<String>> {
        if !self.is_open() {
            return Err(XlError::NoWorkbooksOpen);
        }
        Ok(self.workbooks.iter().map(|w| w.name.clone()).collect())
    }

    /// Add a new workbook holding one empty [`DEFAULT_SHEET`].
    ///
    /// An open workbook with the same name is replaced. Replacing the active
    /// workbook selects its new [`DEFAULT_SHEET`].
    pub fn add_workbook(&mut self, name: &str, use_it: bool) -> XlResult<()> {
        let mut handle = self.backend.new_workbook();
        handle.add_sheet(DEFAULT_SHEET)?;
        self.insert(name, handle);
        info!(workbook = name, "added workbook");

        let replaced_active = self.active_workbook.as_deref() == Some(name);
        if use_it {
            self.active_workbook = Some(name.to_string());
        }
        if use_it || replaced_active {
            self.active_sheet = Some(DEFAULT_SHEET.to_string());
        }
        Ok(())
    }

    /// Select `name` and its first sheet (if any)
    pub fn use_workbook(&mut self, name: &str) -> XlResult<()> {
        if !self.is_open() {
            return Err(XlError::NoWorkbooksOpen);
        }
        let first_sheet = self.handle(name)?.sheet_names().into_iter().next();

        if self.active_workbook.as_deref() == Some(name) {
            debug!(workbook = name, "already using workbook");
            return Ok(());
        }

        self.active_workbook = Some(name.to_string());
        self.active_sheet = first_sheet;
        info!(
            workbook = name,
            sheet = self.active_sheet.as_deref().unwrap_or(""),
            "using workbook"
        );
        Ok(())
    }

    /// Handle of `name`, or of the active workbook
    pub fn workbook(&self, name: Option<&str>) -> XlResult<&B::Handle> {
        let target = self.target_workbook(name)?;
        self.handle(target)
    }

    pub fn workbook_mut(&mut self, name: Option<&str>) -> XlResult<&mut B::Handle> {
        let target = self.target_workbook(name)?.to_string();
        self.handle_mut(&target)
    }

    //--------------------------------------------------------------------------
    // Sheets
    //--------------------------------------------------------------------------

    /// Sheet names of `workbook`, or of the active workbook
    pub fn list_sheets(&self, workbook: Option<&str>) -> XlResult<Vec<String>> {
        Ok(self.workbook(workbook)?.sheet_names())
    }

    /// Add a sheet to `workbook` (or the active one). With `use_it`, that
    /// workbook and the new sheet become active.
    pub fn add_sheet(&mut self, name: &str, workbook: Option<&str>, use_it: bool) -> XlResult<()> {
        let target = self.target_workbook(workbook)?.to_string();
        self.handle_mut(&target)?.add_sheet(name).map_err(|e| {
            warn!(workbook = %target, sheet = name, error = %e, "failed adding sheet");
            e
        })?;
        info!(workbook = %target, sheet = name, "added sheet");

        if use_it {
            self.active_workbook = Some(target);
            self.active_sheet = Some(name.to_string());
        }
        Ok(())
    }

    /// Resolve `name` (or the active sheet) in `workbook` (or the active one).
    ///
    /// Returns the `(workbook, sheet)` pair once both are known to exist.
    pub fn sheet<'a>(
        &'a self,
        name: Option<&'a str>,
        workbook: Option<&'a str>,
    ) -> XlResult<(&'a str, &'a str)> {
        let sheet = name
            .or(self.active_sheet.as_deref())
            .ok_or(XlError::NoSheetSelected)?;
        let workbook = self.target_workbook(workbook)?;

        if !self.handle(workbook)?.has_sheet(sheet) {
            return Err(XlError::SheetNotFound(sheet.to_string()));
        }
        Ok((workbook, sheet))
    }

    /// Select a sheet of the active workbook
    pub fn use_sheet(&mut self, name: &str) -> XlResult<()> {
        let active = self.require_active_workbook()?;
        if !self.handle(active)?.has_sheet(name) {
            return Err(XlError::SheetNotFound(name.to_string()));
        }

        self.active_sheet = Some(name.to_string());
        info!(sheet = name, "using sheet");
        Ok(())
    }

    /// Remove a sheet from `workbook` (or the active one)
    pub fn delete_sheet(&mut self, name: &str, workbook: Option<&str>) -> XlResult<()> {
        let target = self.target_workbook(workbook)?.to_string();
        self.handle_mut(&target)?.remove_sheet(name)?;
        info!(workbook = %target, sheet = name, "removed sheet");

        if self.active_workbook.as_deref() == Some(target.as_str())
            && self.active_sheet.as_deref() == Some(name)
        {
            self.active_sheet = None;
            debug!("deleted active sheet");
        }
        Ok(())
    }

    //--------------------------------------------------------------------------
    // Fetching
    //--------------------------------------------------------------------------

    /// Fetch one cell of the active sheet.
    ///
    /// `reference` must name a single cell; a range is a `MalformedReference`.
    pub fn fetch(&self, reference: impl Into<RefInput>, format: FetchFormat) -> XlResult<Fetched> {
        let (workbook, sheet) = self.sheet(None, None)?;

        let reference = reference.into();
        let coord = match reference.resolve()? {
            Resolved::Cell(coord) => coord,
            Resolved::Grid(_) => return Err(XlError::MalformedReference(reference.to_string())),
        };

        self.fetch_at(workbook, sheet, coord, format)
    }

    /// Fetch cells and ranges of the active sheet, preserving input order.
    ///
    /// Ranges come back as row-major grids.
    pub fn fetch_range(&self, refs: &[RefInput], format: FetchFormat) -> XlResult<Vec<FetchedItem>> {
        let (workbook, sheet) = self.sheet(None, None)?;

        resolve_mixed(refs)?
            .into_iter()
            .map(|resolved| match resolved {
                Resolved::Cell(coord) => self
                    .fetch_at(workbook, sheet, coord, format)
                    .map(FetchedItem::Single),
                Resolved::Grid(grid) => grid
                    .into_rows()
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .map(|coord| self.fetch_at(workbook, sheet, coord, format))
                            .collect::<XlResult<Vec<_>>>()
                    })
                    .collect::<XlResult<Vec<_>>>()
                    .map(FetchedItem::Grid),
            })
            .collect()
    }

    //--------------------------------------------------------------------------
    // Internals
    //--------------------------------------------------------------------------

    fn fetch_at(
        &self,
        workbook: &str,
        sheet: &str,
        coord: Coordinate,
        format: FetchFormat,
    ) -> XlResult<Fetched> {
        let content = self.handle(workbook)?.get_cell(sheet, coord)?;
        Ok(Fetched::from_content(content, format))
    }

    fn write(&self, name: &str, path: &Path) -> XlResult<()> {
        let handle = self.handle(name)?;
        self.backend.write_workbook(handle, path).map_err(|e| {
            warn!(workbook = name, path = %path.display(), error = %e, "saving failed");
            e
        })
    }

    fn path_for(&self, directory: &Path, name: &str, extension: Option<&str>) -> PathBuf {
        let extension = extension.unwrap_or(&self.config.default_extension);
        directory.join(format!("{}.{}", name, extension.trim_start_matches('.')))
    }

    /// Explicit directory, else the last input directory, else the configured default
    fn output_dir(&self, directory: Option<&Path>) -> PathBuf {
        directory
            .map(Path::to_path_buf)
            .or_else(|| self.input_dir.clone())
            .unwrap_or_else(|| self.config.default_directory.clone())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.workbooks.iter().position(|w| w.name == name)
    }

    fn insert(&mut self, name: &str, handle: B::Handle) {
        match self.position(name) {
            Some(idx) => self.workbooks[idx].handle = handle,
            None => self.workbooks.push(OpenWorkbook {
                name: name.to_string(),
                handle,
            }),
        }
    }

    fn handle(&self, name: &str) -> XlResult<&B::Handle> {
        self.workbooks
            .iter()
            .find(|w| w.name == name)
            .map(|w| &w.handle)
            .ok_or_else(|| XlError::WorkbookNotOpen(name.to_string()))
    }

    fn handle_mut(&mut self, name: &str) -> XlResult<&mut B::Handle> {
        self.workbooks
            .iter_mut()
            .find(|w| w.name == name)
            .map(|w| &mut w.handle)
            .ok_or_else(|| XlError::WorkbookNotOpen(name.to_string()))
    }

    fn target_workbook<'a>(&'a self, name: Option<&'a str>) -> XlResult<&'a str> {
        name.or(self.active_workbook.as_deref())
            .ok_or(XlError::NoWorkbookSelected)
    }

    fn require_active_workbook(&self) -> XlResult<&str> {
        self.active_workbook
            .as_deref()
            .ok_or(XlError::NoWorkbookSelected)
    }
}
