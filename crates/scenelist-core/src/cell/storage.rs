//! Cell storage implementation
//!
//! This module provides efficient sparse storage for spreadsheet cells.
//! Only non-empty cells are stored, using a row-based BTreeMap structure.

use std::collections::BTreeMap;

use super::CellValue;
use crate::style::StylePool;
use crate::CellRange;

/// Complete data for a single cell
#[derive(Debug, Clone)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            style_index: 0,
        }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Design decisions:
/// - Uses BTreeMap for ordered iteration (required for streaming writes)
/// - Row-major layout matches the file format's internal structure
/// - Only stores non-empty cells (sparse)
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellData>>`
#[derive(Debug)]
pub struct CellStorage {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,

    /// Shared style pool for deduplication
    pub(crate) style_pool: StylePool,

    /// Default row height in points (default: 15.0)
    default_row_height: f64,

    /// Default column width in characters (default: 8.43)
    default_column_width: f64,

    /// Custom row heights
    row_heights: BTreeMap<u32, f64>,

    /// Custom column widths
    column_widths: BTreeMap<u16, f64>,

    /// Merged cell regions
    merged_regions: Vec<CellRange>,

    /// Cached bounds (invalidated on changes)
    cached_bounds: Option<CachedBounds>,
}

#[derive(Debug, Clone, Copy)]
struct CachedBounds {
    min_row: u32,
    max_row: u32,
    min_col: u16,
    max_col: u16,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            style_pool: StylePool::new(),
            default_row_height: 15.0,
            default_column_width: 8.43,
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            merged_regions: Vec::new(),
            cached_bounds: None,
        }
    }

    /// Get a cell value
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell value
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Set a cell value
    ///
    /// If the cell data is empty (no value, default style), the cell is removed.
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        self.invalidate_bounds();

        if data.is_empty() {
            // Remove empty cells to save memory
            if let Some(row_map) = self.rows.get_mut(&row) {
                row_map.remove(&col);
                if row_map.is_empty() {
                    self.rows.remove(&row);
                }
            }
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        self.invalidate_bounds();

        if let Some(cell) = self.get_mut(row, col) {
            cell.value = value;
            if cell.is_empty() {
                self.set(row, col, CellData::empty());
            }
        } else if !value.is_empty() {
            self.set(row, col, CellData::new(value));
        }
    }

    /// Set just the cell style (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        if let Some(cell) = self.get_mut(row, col) {
            cell.style_index = style_index;
        } else if style_index != 0 {
            self.set(row, col, CellData::with_style(CellValue::Empty, style_index));
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        self.invalidate_bounds();

        let result = self.rows.get_mut(&row).and_then(|r| r.remove(&col));

        if let Some(row_map) = self.rows.get(&row) {
            if row_map.is_empty() {
                self.rows.remove(&row);
            }
        }

        result
    }

    /// Clear all cells
    pub fn clear(&mut self) {
        self.rows.clear();
        self.merged_regions.clear();
        self.invalidate_bounds();
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of used cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        if self.rows.is_empty() {
            return None;
        }

        if let Some(bounds) = self.cached_bounds {
            return Some((
                bounds.min_row,
                bounds.min_col,
                bounds.max_row,
                bounds.max_col,
            ));
        }

        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let mut min_col = u16::MAX;
        let mut max_col = 0u16;

        for row_data in self.rows.values() {
            if let Some(&col) = row_data.keys().next() {
                min_col = min_col.min(col);
            }
            if let Some(&col) = row_data.keys().next_back() {
                max_col = max_col.max(col);
            }
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Iterate over row indices that have data
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Shift every cell, merged region, and column width at or after `start`
    /// to the right by `count` columns.
    ///
    /// The vacated width slots are filled with explicit default-width entries
    /// so the width table grows by exactly `count`. Callers are responsible
    /// for checking column bounds before shifting.
    pub fn shift_columns_right(&mut self, start: u16, count: u16) {
        if count == 0 {
            return;
        }
        self.invalidate_bounds();

        // Cells: rebuild each row's column map with shifted keys
        for row_map in self.rows.values_mut() {
            let old = std::mem::take(row_map);
            for (col, data) in old {
                let new_col = if col >= start { col + count } else { col };
                row_map.insert(new_col, data);
            }
        }

        // Merged regions: shift bounds that fall at or after the split point
        for region in &mut self.merged_regions {
            if region.start.col >= start {
                region.start.col += count;
            }
            if region.end.col >= start {
                region.end.col += count;
            }
        }

        // Column widths: shift keys, then fill the new slots with defaults
        let old_widths = std::mem::take(&mut self.column_widths);
        for (col, width) in old_widths {
            let new_col = if col >= start { col + count } else { col };
            self.column_widths.insert(new_col, width);
        }
        for offset in 0..count {
            self.column_widths
                .insert(start + offset, self.default_column_width);
        }
    }

    /// Get default row height
    pub fn default_row_height(&self) -> f64 {
        self.default_row_height
    }

    /// Set default row height
    pub fn set_default_row_height(&mut self, height: f64) {
        self.default_row_height = height;
    }

    /// Get row height (returns default if not customized)
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    /// Set custom row height
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        if (height - self.default_row_height).abs() < 0.001 {
            self.row_heights.remove(&row);
        } else {
            self.row_heights.insert(row, height);
        }
    }

    /// Get default column width
    pub fn default_column_width(&self) -> f64 {
        self.default_column_width
    }

    /// Set default column width
    pub fn set_default_column_width(&mut self, width: f64) {
        self.default_column_width = width;
    }

    /// Get column width (returns default if not customized)
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    /// Set custom column width
    ///
    /// Widths are always stored explicitly, even when equal to the default,
    /// so they survive column insertion and round-trip through files.
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Get all custom row heights (row index → height in points).
    pub fn custom_row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    /// Get all custom column widths (column index → width in characters).
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    /// Get merged regions mutably
    pub fn merged_regions_mut(&mut self) -> &mut Vec<CellRange> {
        &mut self.merged_regions
    }

    /// Add a merged region
    pub fn add_merged_region(&mut self, range: CellRange) {
        self.merged_regions.push(range);
    }

    /// Check if a cell is part of a merged region
    pub fn is_merged(&self, row: u32, col: u16) -> bool {
        let addr = crate::CellAddress::new(row, col);
        self.merged_regions.iter().any(|r| r.contains(&addr))
    }

    /// Get the style pool
    pub fn style_pool(&self) -> &StylePool {
        &self.style_pool
    }

    /// Get the style pool mutably
    pub fn style_pool_mut(&mut self) -> &mut StylePool {
        &mut self.style_pool
    }

    /// Invalidate cached bounds
    fn invalidate_bounds(&mut self) {
        self.cached_bounds = None;
    }
}

impl Default for CellStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        storage.set(0, 0, CellData::new(CellValue::Number(42.0)));
        let cell = storage.get(0, 0).unwrap();
        assert_eq!(cell.value.as_number(), Some(42.0));

        assert!(storage.get(1, 1).is_none());
    }

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();

        storage.set(0, 0, CellData::new(CellValue::Number(42.0)));
        assert_eq!(storage.cell_count(), 1);

        storage.set(0, 0, CellData::empty());
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.get(0, 0).is_none());
    }

    #[test]
    fn test_used_bounds() {
        let mut storage = CellStorage::new();

        assert!(storage.used_bounds().is_none());

        storage.set(5, 3, CellData::new(CellValue::Number(1.0)));
        storage.set(10, 7, CellData::new(CellValue::Number(2.0)));
        storage.set(2, 1, CellData::new(CellValue::Number(3.0)));

        let (min_row, min_col, max_row, max_col) = storage.used_bounds().unwrap();
        assert_eq!(min_row, 2);
        assert_eq!(min_col, 1);
        assert_eq!(max_row, 10);
        assert_eq!(max_col, 7);
    }

    #[test]
    fn test_shift_columns_right() {
        let mut storage = CellStorage::new();

        storage.set(0, 0, CellData::new(CellValue::from("keep")));
        storage.set(0, 2, CellData::new(CellValue::from("move")));
        storage.set(1, 5, CellData::new(CellValue::from("far")));
        storage.set_column_width(0, 6.0);
        storage.set_column_width(2, 20.0);
        storage.add_merged_region(CellRange::from_indices(0, 0, 0, 1));
        storage.add_merged_region(CellRange::from_indices(3, 2, 3, 4));

        storage.shift_columns_right(2, 3);

        // Cells before the split stay, cells at/after move
        assert_eq!(storage.get(0, 0).unwrap().value.as_string(), Some("keep"));
        assert!(storage.get(0, 2).is_none());
        assert_eq!(storage.get(0, 5).unwrap().value.as_string(), Some("move"));
        assert_eq!(storage.get(1, 8).unwrap().value.as_string(), Some("far"));

        // Widths: old entry moved, vacated slots filled with defaults
        assert_eq!(storage.custom_column_widths().len(), 5);
        assert_eq!(storage.column_width(0), 6.0);
        assert_eq!(storage.column_width(5), 20.0);
        assert_eq!(storage.column_width(2), storage.default_column_width());

        // Merges: unaffected region stays, spanning region shifts
        assert_eq!(storage.merged_regions()[0], CellRange::from_indices(0, 0, 0, 1));
        assert_eq!(storage.merged_regions()[1], CellRange::from_indices(3, 5, 3, 7));
    }

    #[test]
    fn test_shift_zero_is_noop() {
        let mut storage = CellStorage::new();
        storage.set(0, 3, CellData::new(CellValue::Number(1.0)));
        storage.shift_columns_right(0, 0);
        assert!(storage.get(0, 3).is_some());
        assert!(storage.custom_column_widths().is_empty());
    }

    #[test]
    fn test_row_column_properties() {
        let mut storage = CellStorage::new();

        assert_eq!(storage.row_height(0), 15.0);
        assert_eq!(storage.column_width(0), 8.43);

        storage.set_row_height(5, 30.0);
        storage.set_column_width(3, 20.0);

        assert_eq!(storage.row_height(5), 30.0);
        assert_eq!(storage.column_width(3), 20.0);
    }
}
