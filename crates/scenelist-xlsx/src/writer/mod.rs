//! XLSX writer

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use crate::styles::XlsxStyleTable;
use scenelist_core::{CellAddress, CellValue, Workbook};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        // Workbook-wide style table, deduplicated across sheets
        let style_table = XlsxStyleTable::build(workbook);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for i in 0..workbook.sheet_count() {
            Self::write_worksheet(&mut zip, workbook, i, &style_table)?;
        }

        zip.finish()?;
        log::debug!("wrote workbook: {} sheet(s)", workbook.sheet_count());
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                Self::escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str(
            r#"
</Relationships>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        let xml = style_table.to_styles_xml();
        zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let sheet = workbook.worksheet(index)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if let Some(range) = sheet.used_range() {
            content.push_str(&format!(
                "\n    <dimension ref=\"{}\"/>",
                range.to_a1_string()
            ));
        }

        // Column widths (1-based min/max in the file)
        let widths = sheet.custom_column_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (&col, &width) in widths {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    col + 1,
                    col + 1,
                    width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        // Rows with cells plus rows that only carry a custom height
        let heights = sheet.custom_row_heights();
        let mut row_numbers: BTreeSet<u32> = heights.keys().copied().collect();
        for (row, _col, _cell) in sheet.iter_cells() {
            row_numbers.insert(row);
        }

        for row in row_numbers {
            let height_attrs = match heights.get(&row) {
                Some(h) => format!(" ht=\"{}\" customHeight=\"1\"", h),
                None => String::new(),
            };

            let mut row_cells = sheet.iter_row(row).peekable();
            if row_cells.peek().is_none() {
                content.push_str(&format!("\n        <row r=\"{}\"{}/>", row + 1, height_attrs));
                continue;
            }

            content.push_str(&format!("\n        <row r=\"{}\"{}>", row + 1, height_attrs));

            for (col, cell) in row_cells {
                let cell_ref = CellAddress::new(row, col).to_a1_string();

                let xf_id = style_table.xf_id_for(index, cell.style_index);
                let style_attr = if xf_id != 0 {
                    format!(" s=\"{}\"", xf_id)
                } else {
                    String::new()
                };

                match &cell.value {
                    CellValue::Number(n) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{}><v>{}</v></c>",
                            cell_ref, style_attr, n
                        ));
                    }
                    CellValue::String(s) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t>{}</t></is></c>",
                            cell_ref,
                            style_attr,
                            Self::escape_xml(s.as_str())
                        ));
                    }
                    CellValue::Boolean(b) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                            cell_ref,
                            style_attr,
                            if *b { 1 } else { 0 }
                        ));
                    }
                    CellValue::Empty => {
                        // Preserve style-only cells
                        if xf_id != 0 {
                            content.push_str(&format!(
                                "\n            <c r=\"{}\"{}/>",
                                cell_ref, style_attr
                            ));
                        }
                    }
                }
            }

            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");

        let merged_regions = sheet.merged_regions();
        if !merged_regions.is_empty() {
            content.push_str(&format!(
                "\n    <mergeCells count=\"{}\">",
                merged_regions.len()
            ));
            for range in merged_regions {
                content.push_str(&format!(
                    "\n        <mergeCell ref=\"{}\"/>",
                    range.to_a1_string()
                ));
            }
            content.push_str("\n    </mergeCells>");
        }

        content.push_str("\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelist_core::style::{BorderLineStyle, Color, Style};
    use scenelist_core::CellRange;
    use std::io::Cursor;

    fn sample_workbook() -> Workbook {
        let mut wb = Workbook::empty();
        let ws = wb.add_worksheet("SceneList").unwrap();
        ws.set_value(0, 1, "<제목> SceneList");
        ws.set_value(3, 0, "S#");
        ws.set_value(4, 0, 1.0);
        ws.set_column_width(4, 55.0);
        ws.set_row_height(0, 30.0);
        ws.add_merged_region(CellRange::from_indices(0, 1, 0, 5));
        wb
    }

    #[test]
    fn test_write_produces_zip_with_required_parts() {
        let wb = sample_workbook();
        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buf).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing part {}", part);
        }
    }

    #[test]
    fn test_sheet_xml_contains_layout() {
        let wb = sample_workbook();
        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buf).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut sheet_xml = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
            &mut sheet_xml,
        )
        .unwrap();

        assert!(sheet_xml.contains("<dimension ref=\"A1:B5\"/>"));
        assert!(sheet_xml.contains("min=\"5\" max=\"5\" width=\"55\""));
        assert!(sheet_xml.contains("ht=\"30\" customHeight=\"1\""));
        assert!(sheet_xml.contains("<mergeCell ref=\"B1:F1\"/>"));
        assert!(sheet_xml.contains("&lt;제목&gt; SceneList"));
    }

    #[test]
    fn test_styled_blank_cell_is_written() {
        let mut wb = Workbook::empty();
        let ws = wb.add_worksheet("s").unwrap();
        let style = Style::new().border_all(BorderLineStyle::Thin, Color::BLACK);
        ws.set_style(2, 2, &style);

        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buf).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut sheet_xml = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
            &mut sheet_xml,
        )
        .unwrap();

        assert!(sheet_xml.contains("<c r=\"C3\" s=\"1\"/>"));
    }
}
