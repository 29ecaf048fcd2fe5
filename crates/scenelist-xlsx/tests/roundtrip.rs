//! Write-then-read fidelity tests for the XLSX codec.
//!
//! Everything the export pipeline relies on when mutating a template must
//! survive a trip through the archive: values, styles, merged regions,
//! column widths, row heights, and the declared dimension.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use scenelist_core::style::{BorderLineStyle, Color, HorizontalAlignment, Style};
use scenelist_core::{CellRange, CellValue, Workbook};
use scenelist_xlsx::{XlsxReader, XlsxWriter};

fn roundtrip(workbook: &Workbook) -> Workbook {
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(workbook, &mut buf).unwrap();
    XlsxReader::read(Cursor::new(buf.into_inner())).unwrap()
}

fn template_workbook() -> Workbook {
    let mut wb = Workbook::empty();
    let ws = wb.add_worksheet("SceneList").unwrap();

    // Title row with a merge, a header row, and one data row
    ws.set_value(0, 1, "<제목> SceneList");
    ws.add_merged_region(CellRange::from_indices(0, 1, 0, 5));

    for (col, label) in ["S#", "장소", "I/E", "D/N", "내용", "비고"]
        .iter()
        .enumerate()
    {
        ws.set_value(3, col as u16, *label);
    }
    ws.set_value(4, 0, 1.0);
    ws.set_value(4, 4, "오프닝. 한강 둔치");

    ws.set_column_width(4, 55.0);
    ws.set_row_height(0, 30.0);
    ws.set_row_height(3, 30.0);
    ws.set_dimension(CellRange::from_indices(0, 0, 4, 5));

    wb
}

#[test]
fn values_and_sheet_name_survive() {
    let wb = template_workbook();
    let read = roundtrip(&wb);

    assert_eq!(read.sheet_count(), 1);
    let ws = read.worksheet(0).unwrap();
    assert_eq!(ws.name(), "SceneList");

    assert_eq!(ws.get_value(0, 1).as_string(), Some("<제목> SceneList"));
    assert_eq!(ws.get_value(3, 4).as_string(), Some("내용"));
    assert_eq!(ws.get_value(4, 0), CellValue::Number(1.0));
    assert_eq!(ws.get_value(4, 4).as_string(), Some("오프닝. 한강 둔치"));
}

#[test]
fn layout_survives() {
    let wb = template_workbook();
    let read = roundtrip(&wb);
    let ws = read.worksheet(0).unwrap();

    assert_eq!(ws.column_width(4), 55.0);
    assert_eq!(ws.row_height(0), 30.0);
    assert_eq!(ws.row_height(3), 30.0);

    assert_eq!(ws.merged_regions(), &[CellRange::from_indices(0, 1, 0, 5)]);
    assert_eq!(
        ws.dimension(),
        Some(CellRange::from_indices(0, 0, 4, 5))
    );
}

#[test]
fn styles_survive() {
    let mut wb = Workbook::empty();
    let ws = wb.add_worksheet("s").unwrap();

    let header = Style::new()
        .bold(true)
        .fill_color(Color::HEADER_GRAY)
        .horizontal_alignment(HorizontalAlignment::Center)
        .border_all(BorderLineStyle::Thin, Color::BLACK);
    let body = Style::new()
        .wrap_text(true)
        .border_all(BorderLineStyle::Thin, Color::BLACK);

    ws.set_cell(0, 0, "인물", Some(&header));
    ws.set_cell(1, 0, "○", Some(&body));
    // Styled blank cell keeps its border
    ws.set_cell(1, 1, CellValue::Empty, Some(&body));

    let read = roundtrip(&wb);
    let ws = read.worksheet(0).unwrap();

    assert_eq!(ws.style_of(0, 0), Some(&header));
    assert_eq!(ws.style_of(1, 0), Some(&body));
    assert_eq!(ws.get_value(1, 1).as_string(), Some(""));
    assert_eq!(ws.style_of(1, 1), Some(&body));
}

#[test]
fn multiple_sheets_keep_order() {
    let mut wb = Workbook::empty();
    wb.add_worksheet("첫번째").unwrap();
    wb.add_worksheet("second").unwrap();
    wb.worksheet_mut(1).unwrap().set_value(0, 0, "b");

    let read = roundtrip(&wb);
    assert_eq!(read.sheet_count(), 2);
    assert_eq!(read.worksheet(0).unwrap().name(), "첫번째");
    assert_eq!(read.worksheet(1).unwrap().name(), "second");
    assert_eq!(read.worksheet(1).unwrap().get_value(0, 0).as_string(), Some("b"));
}

#[test]
fn write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene_list.xlsx");

    let wb = template_workbook();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let read = XlsxReader::read_file(&path).unwrap();
    assert_eq!(
        read.worksheet(0).unwrap().get_value(4, 4).as_string(),
        Some("오프닝. 한강 둔치")
    );
}
