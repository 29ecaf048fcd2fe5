//! Template anchor location
//!
//! The template's layout is discovered by scanning cell text, never by
//! hard-coded addresses. Complexity is proportional to populated cells.

use scenelist_core::{CellAddress, Worksheet};

use crate::error::{ExportError, ExportResult};
use crate::options::ExportOptions;

/// How cell text is matched during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
}

impl MatchMode {
    fn matches(self, cell_text: &str, needle: &str) -> bool {
        match self {
            MatchMode::Exact => cell_text == needle,
            MatchMode::Contains => cell_text.contains(needle),
        }
    }
}

/// Find the first cell whose string value matches `text` under `mode`.
///
/// Scan order is row-major over populated cells; the template is expected
/// to contain at most one match per search term.
pub fn find_cell_by_text(sheet: &Worksheet, text: &str, mode: MatchMode) -> Option<CellAddress> {
    for (row, col, cell) in sheet.iter_cells() {
        if let Some(s) = cell.value.as_string() {
            if mode.matches(s, text) {
                return Some(CellAddress::new(row, col));
            }
        }
    }
    None
}

/// Locate the header row via the scene-number marker.
///
/// Absence is fatal: column positions are meaningless without it.
pub fn find_header_row(sheet: &Worksheet, marker: &str) -> ExportResult<u32> {
    find_cell_by_text(sheet, marker, MatchMode::Contains)
        .map(|addr| addr.row)
        .ok_or_else(|| ExportError::AnchorNotFound(format!("header marker '{}'", marker)))
}

/// Find a column in one row by header text
pub fn find_column_in_row(
    sheet: &Worksheet,
    row: u32,
    text: &str,
    mode: MatchMode,
) -> Option<u16> {
    for (col, cell) in sheet.iter_row(row) {
        if let Some(s) = cell.value.as_string() {
            if mode.matches(s, text) {
                return Some(col);
            }
        }
    }
    None
}

/// Every anchor the exporter needs, resolved against one template sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAnchors {
    /// Cell holding the title placeholder, if the template has one
    pub title_cell: Option<CellAddress>,
    pub header_row: u32,
    pub scene_no_col: u16,
    pub location_col: u16,
    pub int_ext_col: u16,
    pub day_night_col: u16,
    pub content_col: u16,
    pub remarks_col: u16,
}

/// Resolve all template anchors.
///
/// The scene-number marker, content header, and remarks header are
/// required. The in-between columns fall back to fixed offsets from the
/// scene-number column when their headers are missing or renamed.
pub fn locate_template_anchors(
    sheet: &Worksheet,
    options: &ExportOptions,
) -> ExportResult<TemplateAnchors> {
    let marker_cell = find_cell_by_text(sheet, &options.scene_no_header, MatchMode::Contains)
        .ok_or_else(|| {
            ExportError::AnchorNotFound(format!("header marker '{}'", options.scene_no_header))
        })?;
    let header_row = marker_cell.row;
    let scene_no_col = marker_cell.col;

    let content_col = find_column_in_row(sheet, header_row, &options.content_header, MatchMode::Contains)
        .ok_or_else(|| {
            ExportError::AnchorNotFound(format!(
                "header '{}' in row {}",
                options.content_header,
                header_row + 1
            ))
        })?;
    let remarks_col = find_column_in_row(sheet, header_row, &options.remarks_header, MatchMode::Contains)
        .ok_or_else(|| {
            ExportError::AnchorNotFound(format!(
                "header '{}' in row {}",
                options.remarks_header,
                header_row + 1
            ))
        })?;

    let location_col =
        find_column_in_row(sheet, header_row, &options.location_header, MatchMode::Contains)
            .unwrap_or(scene_no_col + 1);
    let int_ext_col =
        find_column_in_row(sheet, header_row, &options.int_ext_header, MatchMode::Contains)
            .unwrap_or(scene_no_col + 2);
    let day_night_col =
        find_column_in_row(sheet, header_row, &options.day_night_header, MatchMode::Contains)
            .unwrap_or(scene_no_col + 3);

    let title_cell = find_cell_by_text(sheet, &options.title_placeholder, MatchMode::Contains);
    if title_cell.is_none() {
        log::warn!(
            "title placeholder '{}' not found, will fall back to {}",
            options.title_placeholder,
            options.title_fallback_cell
        );
    }

    Ok(TemplateAnchors {
        title_cell,
        header_row,
        scene_no_col,
        location_col,
        int_ext_col,
        day_night_col,
        content_col,
        remarks_col,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelist_core::Worksheet;

    fn template_sheet() -> Worksheet {
        let mut ws = Worksheet::new("SceneList");
        ws.set_value(0, 1, "<제목> SceneList");
        for (col, label) in ["S#", "장소", "I/E", "D/N", "내용", "비고"]
            .iter()
            .enumerate()
        {
            ws.set_value(2, col as u16, *label);
        }
        ws
    }

    #[test]
    fn test_find_cell_by_text_modes() {
        let ws = template_sheet();
        assert_eq!(
            find_cell_by_text(&ws, "장소", MatchMode::Exact),
            Some(CellAddress::new(2, 1))
        );
        assert_eq!(
            find_cell_by_text(&ws, "제목", MatchMode::Contains),
            Some(CellAddress::new(0, 1))
        );
        assert_eq!(find_cell_by_text(&ws, "제목", MatchMode::Exact), None);
    }

    #[test]
    fn test_locate_anchors() {
        let ws = template_sheet();
        let anchors = locate_template_anchors(&ws, &ExportOptions::default()).unwrap();

        assert_eq!(anchors.header_row, 2);
        assert_eq!(anchors.scene_no_col, 0);
        assert_eq!(anchors.content_col, 4);
        assert_eq!(anchors.remarks_col, 5);
        assert_eq!(anchors.title_cell, Some(CellAddress::new(0, 1)));
    }

    #[test]
    fn test_missing_middle_headers_fall_back_to_offsets() {
        let mut ws = Worksheet::new("s");
        ws.set_value(1, 2, "S#");
        ws.set_value(1, 6, "내용");
        ws.set_value(1, 7, "비고");

        let anchors = locate_template_anchors(&ws, &ExportOptions::default()).unwrap();
        assert_eq!(anchors.header_row, 1);
        assert_eq!(anchors.location_col, 3);
        assert_eq!(anchors.int_ext_col, 4);
        assert_eq!(anchors.day_night_col, 5);
        assert!(anchors.title_cell.is_none());
    }

    #[test]
    fn test_missing_marker_is_fatal() {
        let ws = Worksheet::new("empty");
        let err = locate_template_anchors(&ws, &ExportOptions::default());
        assert!(matches!(err, Err(ExportError::AnchorNotFound(_))));
    }
}
