//! Worksheet implementation

use crate::cell::{CellData, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::style::{Style, StylePool};
use crate::{CellAddress, CellRange, MAX_COLS, MAX_ROWS};

/// A single worksheet within a workbook
///
/// Holds sparse cell storage plus sheet-level layout: merged regions,
/// row heights, column widths, and the declared used range.
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name (what appears on the tab)
    name: String,

    /// Cell storage
    cells: CellStorage,

    /// Declared used range, as read from the file's dimension record.
    /// `None` for sheets built from scratch; the computed bounds are
    /// used as a fallback.
    dimension: Option<CellRange>,
}

impl Worksheet {
    /// Create a new empty worksheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            dimension: None,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // ==================== Cell access ====================

    /// Get a cell's data, if present
    pub fn get_cell(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get a cell's value (Empty if the cell is not stored)
    pub fn get_value(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Set a cell's value, preserving any existing style
    pub fn set_value<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) {
        self.cells.set_value(row, col, value.into());
    }

    /// Set a cell's value and style as one unit
    ///
    /// An empty value is coerced to an empty text cell so the style still
    /// renders (borders and fills on blank cells). Numeric values stay
    /// numeric; everything else is stored as given.
    pub fn set_cell<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
        style: Option<&Style>,
    ) {
        let value = match value.into() {
            CellValue::Empty => CellValue::string(""),
            v => v,
        };
        let style_index = match style {
            Some(s) => self.cells.style_pool_mut().get_or_insert(s.clone()),
            None => self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0),
        };
        self.cells
            .set(row, col, CellData::with_style(value, style_index));
    }

    /// Apply a style to a cell, preserving its value
    pub fn set_style(&mut self, row: u32, col: u16, style: &Style) {
        let idx = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, idx);
    }

    /// Intern a style and return its index
    pub fn style_index_for(&mut self, style: &Style) -> u32 {
        self.cells.style_pool_mut().get_or_insert(style.clone())
    }

    /// Look up the style behind a cell's style index
    pub fn style_of(&self, row: u32, col: u16) -> Option<&Style> {
        let idx = self.cells.get(row, col)?.style_index;
        self.cells.style_pool().get(idx)
    }

    /// Iterate over all non-empty cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate over non-empty cells in one row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    // ==================== Used range ====================

    /// Set the declared used range (from a file's dimension record)
    pub fn set_dimension(&mut self, range: CellRange) {
        self.dimension = Some(range);
    }

    /// The declared used range, if any
    pub fn dimension(&self) -> Option<CellRange> {
        self.dimension
    }

    /// The effective used range: the declared dimension when present,
    /// otherwise the bounding box of stored cells.
    pub fn used_range(&self) -> Option<CellRange> {
        if let Some(dim) = self.dimension {
            return Some(dim);
        }
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Grow the declared used range to cover at least the given cell.
    ///
    /// The range only ever grows; a smaller request leaves it unchanged.
    pub fn expand_used_range(&mut self, end_row: u32, end_col: u16) {
        let current = self.used_range().unwrap_or_else(|| {
            CellRange::from_indices(0, 0, end_row, end_col)
        });
        let new_end_row = current.end.row.max(end_row);
        let new_end_col = current.end.col.max(end_col);
        self.dimension = Some(CellRange::new(
            current.start,
            CellAddress::new(new_end_row, new_end_col),
        ));
    }

    // ==================== Column insertion ====================

    /// Insert `count` empty columns before column `start`.
    ///
    /// Every cell, merged region, and column width at or after `start`
    /// shifts right by `count`; the declared used range widens by the
    /// same amount. A zero count is a no-op.
    pub fn insert_columns(&mut self, start: u16, count: u16) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let end_col = self
            .used_range()
            .map(|r| r.end.col)
            .unwrap_or(start);
        let new_end = end_col as u32 + count as u32;
        if new_end >= MAX_COLS as u32 {
            return Err(Error::ColumnOutOfBounds(end_col, MAX_COLS - 1));
        }

        self.cells.shift_columns_right(start, count);

        if let Some(dim) = self.dimension {
            let mut end = dim.end;
            end.col += count;
            self.dimension = Some(CellRange::new(dim.start, end));
        }

        Ok(())
    }

    // ==================== Merged regions ====================

    /// Merge a range of cells, rejecting overlaps with existing merges
    pub fn merge_cells(&mut self, range: CellRange) -> Result<()> {
        if range.end.row > MAX_ROWS - 1 || range.end.col > MAX_COLS - 1 {
            return Err(Error::InvalidRange(range.to_a1_string()));
        }
        for existing in self.cells.merged_regions() {
            if existing.overlaps(&range) {
                return Err(Error::MergedCellConflict(range.to_a1_string()));
            }
        }
        self.cells.add_merged_region(range);
        Ok(())
    }

    /// Add a merged region without overlap checking (for file loading)
    pub fn add_merged_region(&mut self, range: CellRange) {
        self.cells.add_merged_region(range);
    }

    /// All merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    /// Extend the merged region whose top-left corner is (`row`, `col`) so
    /// its right edge reaches at least `new_end_col`. Returns true if a
    /// region was found and is now wide enough.
    pub fn extend_merge_right(&mut self, row: u32, col: u16, new_end_col: u16) -> bool {
        for region in self.cells.merged_regions_mut() {
            if region.start.row == row && region.start.col == col {
                if region.end.col < new_end_col {
                    region.end.col = new_end_col;
                }
                return true;
            }
        }
        false
    }

    // ==================== Layout ====================

    /// Get a row's height in points
    pub fn row_height(&self, row: u32) -> f64 {
        self.cells.row_height(row)
    }

    /// Set a row's height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.cells.set_row_height(row, height);
    }

    /// Get a column's width in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.cells.column_width(col)
    }

    /// Set a column's width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.cells.set_column_width(col, width);
    }

    /// All custom row heights
    pub fn custom_row_heights(&self) -> &std::collections::BTreeMap<u32, f64> {
        self.cells.custom_row_heights()
    }

    /// All custom column widths
    pub fn custom_column_widths(&self) -> &std::collections::BTreeMap<u16, f64> {
        self.cells.custom_column_widths()
    }

    /// Get the style pool
    pub fn style_pool(&self) -> &StylePool {
        self.cells.style_pool()
    }

    /// Get the style pool mutably
    pub fn style_pool_mut(&mut self) -> &mut StylePool {
        self.cells.style_pool_mut()
    }
}
