//! End-to-end export tests against a synthetic in-memory template.

use std::collections::BTreeMap;
use std::io::Cursor;

use pretty_assertions::assert_eq;
use scenelist_core::{CellRange, Workbook};
use scenelist_export::{export_scene_list, ExportError, ExportOptions, SceneRecord};
use scenelist_xlsx::{XlsxReader, XlsxWriter};

/// Build a minimal template: merged title row, a spacer row, and a header
/// row with the six fixed columns.
fn template_bytes() -> Vec<u8> {
    let mut wb = Workbook::empty();
    let ws = wb.add_worksheet("SceneList").unwrap();

    ws.set_value(0, 1, "<제목> SceneList");
    ws.add_merged_region(CellRange::from_indices(0, 0, 0, 5));

    for (col, label) in ["S#", "장소", "I/E", "D/N", "내용", "비고"]
        .iter()
        .enumerate()
    {
        ws.set_value(2, col as u16, *label);
    }
    ws.set_dimension(CellRange::from_indices(0, 0, 2, 5));

    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&wb, &mut buf).unwrap();
    buf.into_inner()
}

fn scene(
    scene_no: &str,
    summary: &str,
    characters: &[(&str, bool)],
    extras: &str,
) -> SceneRecord {
    SceneRecord {
        scene_no: scene_no.into(),
        location: "Loc".into(),
        int_ext: "I".into(),
        day_night: "D".into(),
        summary: summary.into(),
        characters: characters
            .iter()
            .map(|(n, p)| (n.to_string(), *p))
            .collect::<BTreeMap<_, _>>(),
        extras: extras.into(),
    }
}

fn row_strings(ws: &scenelist_core::Worksheet, row: u32, cols: u16) -> Vec<String> {
    (0..cols)
        .map(|col| {
            ws.get_value(row, col)
                .as_string()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

#[test]
fn end_to_end_scenario() {
    let tracked = vec!["A".to_string(), "B".to_string()];
    let scenes = vec![scene(
        "1",
        "A and B talk",
        &[("A", true), ("B", false)],
        "C",
    )];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &tracked,
        "my_script.pdf",
        &ExportOptions::default(),
    )
    .unwrap();

    assert_eq!(output.file_name, "my_script_SceneList.xlsx");

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();

    assert_eq!(
        row_strings(ws, 2, 8),
        ["S#", "장소", "I/E", "D/N", "내용", "A", "B", "비고"]
    );
    // B gets the glyph despite its false flag: "B" appears in the summary
    assert_eq!(
        row_strings(ws, 3, 8),
        ["1", "Loc", "I", "D", "A and B talk", "○", "○", "C"]
    );
}

#[test]
fn presence_flag_roundtrip() {
    let tracked = vec!["민수".to_string()];
    let scenes = vec![
        scene("1", "혼자 걷는다", &[("민수", true)], ""),
        scene("2", "빈 방", &[("민수", false)], ""),
    ];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &tracked,
        "script",
        &ExportOptions::default(),
    )
    .unwrap();

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();

    // Column 5 is the single character column
    assert_eq!(ws.get_value(3, 5).as_string(), Some("○"));
    assert_eq!(ws.get_value(4, 5).as_string(), Some(""));
}

#[test]
fn empty_tracked_list_gets_placeholder_column() {
    let scenes = vec![scene("1", "장면", &[], "")];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &[],
        "script",
        &ExportOptions::default(),
    )
    .unwrap();

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();

    assert_eq!(
        row_strings(ws, 2, 7),
        ["S#", "장소", "I/E", "D/N", "내용", "인물", "비고"]
    );
    assert_eq!(ws.get_value(3, 5).as_string(), Some(""));
}

#[test]
fn title_is_derived_and_written() {
    let scenes = vec![scene("1", "장면", &[], "")];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &[],
        "2. 결혼하지마요_알고.pdf",
        &ExportOptions::default(),
    )
    .unwrap();

    assert_eq!(output.file_name, "결혼하지마요_알고_SceneList.xlsx");

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();
    assert_eq!(
        ws.get_value(0, 1).as_string(),
        Some("<결혼하지마요_알고> SceneList")
    );
}

#[test]
fn missing_title_placeholder_falls_back_to_fixed_cell() {
    let mut wb = Workbook::empty();
    let ws = wb.add_worksheet("SceneList").unwrap();
    for (col, label) in ["S#", "장소", "I/E", "D/N", "내용", "비고"]
        .iter()
        .enumerate()
    {
        ws.set_value(2, col as u16, *label);
    }
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&wb, &mut buf).unwrap();

    let output = export_scene_list(
        &buf.into_inner(),
        &[scene("1", "장면", &[], "")],
        &[],
        "script",
        &ExportOptions::default(),
    )
    .unwrap();

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();
    assert_eq!(ws.get_value(0, 1).as_string(), Some("<script> SceneList"));
}

#[test]
fn scene_numbers_are_normalized() {
    let scenes = vec![
        scene("Prologue", "인트로", &[], ""),
        scene("12", "본편", &[], ""),
        scene("Epilogue", "엔딩", &[], ""),
    ];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &[],
        "script",
        &ExportOptions::default(),
    )
    .unwrap();

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();

    assert_eq!(ws.get_value(3, 0).as_string(), Some("Pr"));
    assert_eq!(ws.get_value(4, 0).as_string(), Some("12"));
    assert_eq!(ws.get_value(5, 0).as_string(), Some("Ep"));
}

#[test]
fn layout_is_extended_for_inserted_columns() {
    let tracked = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let long_summary = "가".repeat(200);
    let scenes = vec![scene("1", &long_summary, &[("A", true)], "")];

    let output = export_scene_list(
        &template_bytes(),
        &scenes,
        &tracked,
        "script",
        &ExportOptions::default(),
    )
    .unwrap();

    let read = XlsxReader::read(Cursor::new(output.bytes)).unwrap();
    let ws = read.worksheet(0).unwrap();

    // Three character columns pushed remarks from column 5 to column 8
    let last_col = 8;
    assert_eq!(ws.get_value(2, last_col).as_string(), Some("비고"));

    // Title merge spans the full new width
    assert!(ws
        .merged_regions()
        .iter()
        .any(|m| m.start.row == 0 && m.start.col == 0 && m.end.col >= last_col));

    // Declared range covers the data row and the new last column
    let dim = ws.dimension().unwrap();
    assert!(dim.end.col >= last_col);
    assert!(dim.end.row >= 3);

    // Fixed widths plus narrow character columns and the remarks width
    assert_eq!(ws.column_width(4), 55.0);
    assert_eq!(ws.column_width(5), 6.0);
    assert_eq!(ws.column_width(6), 6.0);
    assert_eq!(ws.column_width(7), 6.0);
    assert_eq!(ws.column_width(last_col), 20.0);

    // 200 chars at width 55 wraps to 3 lines
    assert_eq!(ws.row_height(3), 64.0);
    assert_eq!(ws.row_height(0), 30.0);
    assert_eq!(ws.row_height(2), 30.0);
}

#[test]
fn missing_header_marker_aborts() {
    let mut wb = Workbook::empty();
    let ws = wb.add_worksheet("broken").unwrap();
    ws.set_value(0, 0, "제목만 있는 시트");
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&wb, &mut buf).unwrap();

    let result = export_scene_list(
        &buf.into_inner(),
        &[scene("1", "장면", &[], "")],
        &[],
        "script",
        &ExportOptions::default(),
    );

    assert!(matches!(result, Err(ExportError::AnchorNotFound(_))));
}

#[test]
fn garbage_template_is_fatal() {
    let result = export_scene_list(
        b"not a spreadsheet",
        &[],
        &[],
        "script",
        &ExportOptions::default(),
    );
    assert!(matches!(result, Err(ExportError::Template(_))));
}
