//! Cell types: addresses, ranges, values, and sparse storage

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use storage::{CellData, CellStorage};
pub use value::{CellValue, SharedString};
