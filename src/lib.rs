//! xlkit - A1 reference resolution and a workbook session over xlsx files
//!
//! This library converts spreadsheet references into numeric coordinates and
//! keeps a session of open workbooks with an active workbook and sheet.
//!
//! # Features
//!
//! - `"AB27"` → `(28, 27)`, case-insensitive, bijective base-26 columns
//! - Ranges expand to row-major grids with normalized corners
//! - Open, save, save-as, close and delete workbooks by name
//! - Fetch values, formulas, styles or whole cells through any reference form
//! - xlsx reading via calamine, writing via rust_xlsxwriter
//!
//! # Example
//!
//! ```no_run
//! use xlkit::{resolve_cell, resolve_range, FetchFormat, Session, XlsxBackend};
//! use std::path::Path;
//!
//! assert_eq!(resolve_cell("B3")?.as_pair(), (2, 3));
//! assert_eq!(resolve_range("B2:A1")?.height(), 2);
//!
//! let mut session = Session::new(XlsxBackend);
//! session.open(&["Budget"], Some(Path::new("data")), None)?;
//! let total = session.fetch("C10", FetchFormat::Value)?;
//! println!("Total: {}", total);
//! # Ok::<(), xlkit::XlError>(())
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod reference;
pub mod session;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use backend::{SpreadsheetBackend, WorkbookHandle};
pub use config::SessionConfig;
pub use error::{XlError, XlResult};
pub use excel::XlsxBackend;
pub use reference::{
    resolve_cell, resolve_mixed, resolve_range, Coordinate, CoordinateGrid, RefInput, Resolved,
};
pub use session::{Session, DEFAULT_SHEET};
pub use types::{CellContent, CellInput, CellStyle, CellValue, FetchFormat, Fetched, FetchedItem};
pub use workbook::{Sheet, Workbook};
