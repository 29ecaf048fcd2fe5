//! Scene-list export orchestration
//!
//! One synchronous pass over an in-memory workbook: locate the template's
//! anchors, splice in the character columns, write the title, header, and
//! data rows with explicit styles, fix up layout, and serialize. Either
//! the whole pipeline completes and a full file is produced, or nothing
//! is.

use std::io::Cursor;

use scenelist_core::style::{
    BorderLineStyle, Color, HorizontalAlignment, Style, VerticalAlignment,
};
use scenelist_core::Worksheet;
use scenelist_xlsx::{XlsxReader, XlsxWriter};

use crate::error::ExportResult;
use crate::layout::{
    estimate_row_height, HEADER_ROW_HEIGHT, SPACER_ROW_HEIGHT, TITLE_ROW_HEIGHT,
};
use crate::locate::{locate_template_anchors, TemplateAnchors};
use crate::options::ExportOptions;
use crate::plan::ColumnPlan;
use crate::scene::SceneRecord;
use crate::title::derive_title;

/// The finished export: serialized workbook bytes plus the file name to
/// offer for download
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

struct ExportStyles {
    title: Style,
    header: Style,
    body: Style,
    content: Style,
}

impl ExportStyles {
    fn build(options: &ExportOptions) -> Self {
        let bordered = Style::new()
            .font_name(options.font_name.clone())
            .font_size(11.0)
            .border_all(BorderLineStyle::Thin, Color::BLACK)
            .horizontal_alignment(HorizontalAlignment::Center)
            .vertical_alignment(VerticalAlignment::Center)
            .wrap_text(true);

        Self {
            title: Style::new()
                .font_name(options.font_name.clone())
                .font_size(20.0)
                .bold(true)
                .horizontal_alignment(HorizontalAlignment::Center)
                .vertical_alignment(VerticalAlignment::Center)
                .wrap_text(true),
            header: bordered.clone().bold(true).fill_color(Color::HEADER_GRAY),
            content: bordered
                .clone()
                .font_size(10.0)
                .horizontal_alignment(HorizontalAlignment::Left),
            body: bordered,
        }
    }
}

/// Build the scene-list spreadsheet from a template.
///
/// `template` is the raw bytes of the template asset; `source_name` is
/// the uploaded screenplay's file name, from which the title is derived.
/// The template being unreadable or missing its required anchors is
/// fatal; a missing title placeholder and an empty tracked list degrade
/// gracefully.
pub fn export_scene_list(
    template: &[u8],
    scenes: &[SceneRecord],
    tracked: &[String],
    source_name: &str,
    options: &ExportOptions,
) -> ExportResult<ExportOutput> {
    let title = derive_title(source_name);

    let mut workbook = XlsxReader::read(Cursor::new(template))?;
    let sheet = workbook.worksheet_mut(0)?;

    let anchors = locate_template_anchors(sheet, options)?;
    let plan = ColumnPlan::build(tracked, scenes);
    let labels = plan.column_labels(&options.character_placeholder);

    log::debug!(
        "export: header row {}, {} scene(s), {} character column(s)",
        anchors.header_row + 1,
        scenes.len(),
        labels.len()
    );

    let styles = ExportStyles::build(options);

    write_title(sheet, &anchors, &title, &styles, options);

    // Character columns go between content and remarks; remarks is pushed
    // right and content stays put
    sheet.insert_columns(anchors.remarks_col, plan.insert_count())?;

    let header_row = anchors.header_row;
    let start_row = header_row + 1;
    let base_col = anchors.scene_no_col;
    let char_col = anchors.remarks_col;
    let remarks_col = anchors.remarks_col + plan.insert_count();
    let last_col = remarks_col;

    write_header_row(sheet, &anchors, &labels, remarks_col, &styles, options);

    for (i, record) in scenes.iter().enumerate() {
        let row = start_row + i as u32;
        write_scene_row(
            sheet,
            row,
            record,
            &anchors,
            plan.characters(),
            char_col,
            remarks_col,
            &styles,
            options,
        );
    }

    apply_column_widths(sheet, base_col, char_col, remarks_col, &labels, options);
    apply_row_heights(sheet, header_row, start_row, scenes, options);

    sheet.extend_merge_right(0, 0, last_col);
    let last_row = start_row + scenes.len().saturating_sub(1) as u32;
    sheet.expand_used_range(last_row, last_col);

    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&workbook, &mut buf)?;

    Ok(ExportOutput {
        file_name: format!("{}{}.xlsx", title, options.file_suffix),
        bytes: buf.into_inner(),
    })
}

/// Replace the title placeholder, or fall back to the fixed cell
fn write_title(
    sheet: &mut Worksheet,
    anchors: &TemplateAnchors,
    title: &str,
    styles: &ExportStyles,
    options: &ExportOptions,
) {
    let text = format!("<{}> {}", title, options.title_suffix);
    let addr = anchors.title_cell.unwrap_or(options.title_fallback_cell);
    sheet.set_cell(addr.row, addr.col, text, Some(&styles.title));
}

fn write_header_row(
    sheet: &mut Worksheet,
    anchors: &TemplateAnchors,
    labels: &[String],
    remarks_col: u16,
    styles: &ExportStyles,
    options: &ExportOptions,
) {
    let row = anchors.header_row;
    let fixed = [
        (anchors.scene_no_col, options.scene_no_header.as_str()),
        (anchors.location_col, options.location_header.as_str()),
        (anchors.int_ext_col, options.int_ext_header.as_str()),
        (anchors.day_night_col, options.day_night_header.as_str()),
        (anchors.content_col, options.content_header.as_str()),
    ];
    for (col, label) in fixed {
        sheet.set_cell(row, col, label, Some(&styles.header));
    }
    for (i, label) in labels.iter().enumerate() {
        sheet.set_cell(
            row,
            anchors.remarks_col + i as u16,
            label.as_str(),
            Some(&styles.header),
        );
    }
    sheet.set_cell(
        row,
        remarks_col,
        options.remarks_header.as_str(),
        Some(&styles.header),
    );
}

#[allow(clippy::too_many_arguments)]
fn write_scene_row(
    sheet: &mut Worksheet,
    row: u32,
    record: &SceneRecord,
    anchors: &TemplateAnchors,
    characters: &[String],
    char_col: u16,
    remarks_col: u16,
    styles: &ExportStyles,
    options: &ExportOptions,
) {
    let scene_no = options.markers.normalize(&record.scene_no);

    sheet.set_cell(row, anchors.scene_no_col, scene_no, Some(&styles.body));
    sheet.set_cell(
        row,
        anchors.location_col,
        record.location.as_str(),
        Some(&styles.body),
    );
    sheet.set_cell(
        row,
        anchors.int_ext_col,
        record.int_ext.as_str(),
        Some(&styles.body),
    );
    sheet.set_cell(
        row,
        anchors.day_night_col,
        record.day_night.as_str(),
        Some(&styles.body),
    );
    sheet.set_cell(
        row,
        anchors.content_col,
        record.summary.as_str(),
        Some(&styles.content),
    );

    if characters.is_empty() {
        // Placeholder column stays blank but keeps the table border
        sheet.set_cell(row, char_col, "", Some(&styles.body));
    } else {
        for (i, name) in characters.iter().enumerate() {
            // Curated flag, or best-effort recall from the summary text
            let present = record.characters.get(name).copied().unwrap_or(false)
                || record.summary.contains(name.as_str());
            let mark = if present {
                options.presence_glyph.as_str()
            } else {
                ""
            };
            sheet.set_cell(row, char_col + i as u16, mark, Some(&styles.body));
        }
    }

    sheet.set_cell(row, remarks_col, record.extras.as_str(), Some(&styles.body));
}

fn apply_column_widths(
    sheet: &mut Worksheet,
    base_col: u16,
    char_col: u16,
    remarks_col: u16,
    labels: &[String],
    options: &ExportOptions,
) {
    for (i, width) in options.fixed_widths.iter().enumerate() {
        sheet.set_column_width(base_col + i as u16, *width);
    }
    for i in 0..labels.len() {
        sheet.set_column_width(char_col + i as u16, options.character_width);
    }
    sheet.set_column_width(remarks_col, options.remarks_width);
}

fn apply_row_heights(
    sheet: &mut Worksheet,
    header_row: u32,
    start_row: u32,
    scenes: &[SceneRecord],
    options: &ExportOptions,
) {
    sheet.set_row_height(0, TITLE_ROW_HEIGHT);
    for row in 1..header_row {
        sheet.set_row_height(row, SPACER_ROW_HEIGHT);
    }
    if header_row > 0 {
        sheet.set_row_height(header_row, HEADER_ROW_HEIGHT);
    }

    for (i, record) in scenes.iter().enumerate() {
        let height = estimate_row_height(&record.summary, options.content_wrap_width);
        sheet.set_row_height(start_row + i as u32, height);
    }
}
