//! XLSX (Office Open XML spreadsheet) reading and writing
//!
//! Translates between `.xlsx` archives and the `scenelist-core` document
//! model. The reader preserves what the export pipeline needs from a
//! template: cell values, styles, merged regions, column widths, row
//! heights, and the declared dimension.

pub mod error;
pub mod reader;
mod styles;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
