//! In-memory spreadsheet document model
//!
//! This crate provides the core types for representing a workbook in
//! memory: sheets, cells, styles, merged regions, and layout. File I/O
//! lives in `scenelist-xlsx`; the scene-list export pipeline lives in
//! `scenelist-export`.
//!
//! # Example
//!
//! ```
//! use scenelist_core::{Workbook, CellValue};
//!
//! let mut wb = Workbook::new();
//! let ws = wb.worksheet_mut(0).unwrap();
//! ws.set_value(0, 0, "S#");
//! ws.set_value(0, 1, 1.0);
//! assert_eq!(ws.get_value(0, 0), CellValue::string("S#"));
//! ```

pub mod cell;
pub mod error;
pub mod style;
mod workbook;
mod worksheet;

pub use cell::{CellAddress, CellData, CellRange, CellRangeIterator, CellStorage, CellValue, SharedString};
pub use error::{Error, Result};
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, Style, StylePool, VerticalAlignment,
};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;
