use thiserror::Error;

pub type XlResult<T> = Result<T, XlError>;

#[derive(Error, Debug)]
pub enum XlError {
    #[error("Malformed cell reference '{0}'")]
    MalformedReference(String),

    #[error("Malformed range '{0}': expected exactly one ':' separator")]
    MalformedRange(String),

    #[error("Range '{range}' spans {cells} cells, more than the limit of {max}")]
    RangeTooLarge { range: String, cells: u64, max: u64 },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read workbook: {0}")]
    Parse(String),

    #[error("Failed to write workbook: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No workbooks open")]
    NoWorkbooksOpen,

    #[error("No workbook selected")]
    NoWorkbookSelected,

    #[error("Workbook '{0}' is not open")]
    WorkbookNotOpen(String),

    #[error("No sheet selected")]
    NoSheetSelected,

    #[error("Sheet '{0}' does not exist")]
    SheetNotFound(String),

    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),
}

impl XlError {
    /// True for the errors raised by reference resolution
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            XlError::MalformedReference(_)
                | XlError::MalformedRange(_)
                | XlError::RangeTooLarge { .. }
        )
    }
}
