//! Error handling tests

use std::io;
use xlkit::error::{XlError, XlResult};
use xlkit::{resolve_cell, resolve_range};

#[test]
fn test_malformed_reference_display() {
    let err = XlError::MalformedReference("1A".to_string());
    assert_eq!(err.to_string(), "Malformed cell reference '1A'");
}

#[test]
fn test_malformed_range_display() {
    let err = XlError::MalformedRange("A1:B2:C3".to_string());
    let msg = err.to_string();
    assert!(msg.contains("A1:B2:C3"));
    assert!(msg.contains("exactly one ':'"));
}

#[test]
fn test_range_too_large_display() {
    let err = XlError::RangeTooLarge {
        range: "A1:XFD1048576".to_string(),
        cells: 17_179_869_184,
        max: 1_048_576,
    };
    assert_eq!(
        err.to_string(),
        "Range 'A1:XFD1048576' spans 17179869184 cells, more than the limit of 1048576"
    );
    assert!(err.is_reference_error());
}

#[test]
fn test_session_error_display() {
    assert_eq!(XlError::NoWorkbooksOpen.to_string(), "No workbooks open");
    assert_eq!(XlError::NoWorkbookSelected.to_string(), "No workbook selected");
    assert_eq!(XlError::NoSheetSelected.to_string(), "No sheet selected");
    assert_eq!(
        XlError::WorkbookNotOpen("Budget".to_string()).to_string(),
        "Workbook 'Budget' is not open"
    );
    assert_eq!(
        XlError::SheetNotFound("Q3".to_string()).to_string(),
        "Sheet 'Q3' does not exist"
    );
    assert_eq!(
        XlError::DuplicateSheet("Q3".to_string()).to_string(),
        "Sheet 'Q3' already exists"
    );
}

#[test]
fn test_backend_error_display() {
    assert_eq!(
        XlError::NotFound("in/Book1.xlsx".to_string()).to_string(),
        "File not found: in/Book1.xlsx"
    );
    assert!(XlError::Parse("zip".to_string())
        .to_string()
        .starts_with("Failed to read workbook"));
    assert!(XlError::Export("disk full".to_string())
        .to_string()
        .starts_with("Failed to write workbook"));
}

#[test]
fn test_io_error_conversion() {
    fn fails() -> XlResult<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert!(matches!(err, XlError::Io(_)));
    assert!(err.to_string().contains("denied"));
}

#[test]
fn test_json_error_conversion() {
    fn fails() -> XlResult<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }

    assert!(matches!(fails(), Err(XlError::Json(_))));
}

#[test]
fn test_is_reference_error() {
    assert!(resolve_cell("A").unwrap_err().is_reference_error());
    assert!(resolve_range("A1").unwrap_err().is_reference_error());
    assert!(!XlError::NoSheetSelected.is_reference_error());
    assert!(!XlError::NotFound("x".to_string()).is_reference_error());
}

#[test]
fn test_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(XlError::NoWorkbooksOpen);
    assert_eq!(err.to_string(), "No workbooks open");
}
