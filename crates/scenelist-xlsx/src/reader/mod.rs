//! XLSX reader
//!
//! Loads a workbook from an `.xlsx` archive, keeping everything the
//! export pipeline needs from a template: values, styles, merged
//! regions, column widths, row heights, and the declared dimension.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;
use scenelist_core::style::Style;
use scenelist_core::{CellAddress, CellRange, CellValue, Workbook, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode control characters in XML:
/// `_x000d_` = CR, `_x000a_` = LF, `_x0009_` = Tab, `_x005f_` = escaped
/// underscore.
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' {
            let mut hex_chars = String::new();
            let mut is_escape = false;

            if chars.peek() == Some(&'x') {
                chars.next();

                for _ in 0..4 {
                    if let Some(&ch) = chars.peek() {
                        if ch.is_ascii_hexdigit() {
                            hex_chars.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }

                if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                    chars.next();
                    if let Ok(code) = u32::from_str_radix(&hex_chars, 16) {
                        if let Some(decoded) = char::from_u32(code) {
                            result.push(decoded);
                            is_escape = true;
                        }
                    }
                }
            }

            if !is_escape {
                result.push('_');
                if !hex_chars.is_empty() {
                    result.push('x');
                    result.push_str(&hex_chars);
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let cell_styles = Self::read_styles(&mut archive)?;

        // Sheet order comes from workbook.xml; the rels map rIds to paths
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            if let Some(path) = sheet_paths.get(r_id) {
                let worksheet = workbook.add_worksheet(name.clone())?;
                Self::read_worksheet(
                    &mut archive,
                    path,
                    worksheet,
                    &shared_strings,
                    &cell_styles,
                )?;
            }
        }

        if workbook.sheet_count() == 0 {
            workbook.add_worksheet("Sheet1")?;
        }

        log::debug!(
            "read workbook: {} sheet(s), {} shared string(s)",
            workbook.sheet_count(),
            shared_strings.len()
        );

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        let file = match archive.by_name("xl/styles.xml") {
            Ok(f) => f,
            Err(_) => return Ok(vec![Style::default()]),
        };
        read_styles_xml(file)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"r:id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless rooted
                            let full_path = if let Some(stripped) = target.strip_prefix('/') {
                                stripped.to_string()
                            } else {
                                format!("xl/{}", target)
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part into the given sheet
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        cell_styles: &[Style],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();

        // Current cell state
        let mut current_cell_ref: Option<String> = None;
        let mut current_cell_type: Option<String> = None;
        let mut current_cell_style: Option<u32> = None;
        let mut current_value: Option<String> = None;
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        Self::apply_row_attrs(&e, worksheet);
                    }
                    b"c" => {
                        in_cell = true;
                        current_cell_ref = None;
                        current_cell_type = None;
                        current_cell_style = None;
                        current_value = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    current_cell_ref =
                                        attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"t" => {
                                    current_cell_type =
                                        attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"s" => {
                                    current_cell_style = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse::<u32>().ok());
                                }
                                _ => {}
                            }
                        }
                    }
                    b"v" if in_cell => {
                        in_value = true;
                    }
                    b"is" if in_cell => {
                        in_inline_str = true;
                        // Empty inline strings still count as text cells
                        current_cell_type = Some("inlineStr".to_string());
                        current_value = Some(String::new());
                    }
                    b"t" if in_inline_str => {
                        in_inline_text = true;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(ref cell_ref) = current_cell_ref {
                            Self::process_cell(
                                worksheet,
                                cell_ref,
                                current_cell_type.as_deref(),
                                current_value.as_deref(),
                                current_cell_style,
                                shared_strings,
                                cell_styles,
                            )?;
                        }
                        in_cell = false;
                    }
                    b"v" => {
                        in_value = false;
                    }
                    b"is" => {
                        in_inline_str = false;
                    }
                    b"t" if in_inline_str => {
                        in_inline_text = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        if let Ok(text) = e.unescape() {
                            current_value = Some(text.to_string());
                        }
                    } else if in_inline_text {
                        if let Ok(text) = e.unescape() {
                            current_value.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"dimension" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"ref" {
                                if let Ok(v) = attr.unescape_value() {
                                    if let Ok(range) = CellRange::parse(&v) {
                                        worksheet.set_dimension(range);
                                    }
                                }
                            }
                        }
                    }
                    b"row" => {
                        // Self-closing <row .../> with no cells
                        Self::apply_row_attrs(&e, worksheet);
                    }
                    b"col" => {
                        let mut col_min: Option<u16> = None;
                        let mut col_max: Option<u16> = None;
                        let mut width: Option<f64> = None;
                        let mut custom_width = false;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"min" => {
                                    col_min = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse::<u16>().ok());
                                }
                                b"max" => {
                                    col_max = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse::<u16>().ok());
                                }
                                b"width" => {
                                    width = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse::<f64>().ok());
                                }
                                b"customWidth" => {
                                    custom_width = attr.unescape_value().ok().map_or(false, |s| {
                                        s.as_ref() == "1" || s.as_ref() == "true"
                                    });
                                }
                                _ => {}
                            }
                        }
                        if let (Some(min), Some(max)) = (col_min, col_max) {
                            // min/max are 1-based in the file
                            for col in min..=max {
                                let col_idx = col.saturating_sub(1);
                                if custom_width {
                                    if let Some(w) = width {
                                        worksheet.set_column_width(col_idx, w);
                                    }
                                }
                            }
                        }
                    }
                    b"c" => {
                        // Empty cell element (may still carry a style)
                        let mut cell_ref: Option<String> = None;
                        let mut cell_type: Option<String> = None;
                        let mut cell_style: Option<u32> = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    cell_ref = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"t" => {
                                    cell_type = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                b"s" => {
                                    cell_style = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse::<u32>().ok());
                                }
                                _ => {}
                            }
                        }

                        if let Some(cell_ref) = cell_ref {
                            Self::process_cell(
                                worksheet,
                                &cell_ref,
                                cell_type.as_deref(),
                                None,
                                cell_style,
                                shared_strings,
                                cell_styles,
                            )?;
                        }
                    }
                    b"mergeCell" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"ref" {
                                let ref_str = String::from_utf8_lossy(&attr.value);
                                if let Ok(range) = CellRange::parse(&ref_str) {
                                    worksheet.add_merged_region(range);
                                }
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Parse row attributes (r, ht, customHeight) and apply them
    fn apply_row_attrs(e: &quick_xml::events::BytesStart, worksheet: &mut Worksheet) {
        let mut row_num: Option<u32> = None;
        let mut ht: Option<f64> = None;
        let mut custom_height = false;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    row_num = attr.unescape_value().ok().and_then(|s| s.parse::<u32>().ok());
                }
                b"ht" => {
                    ht = attr.unescape_value().ok().and_then(|s| s.parse::<f64>().ok());
                }
                b"customHeight" => {
                    custom_height = attr
                        .unescape_value()
                        .ok()
                        .map_or(false, |s| s.as_ref() == "1" || s.as_ref() == "true");
                }
                _ => {}
            }
        }
        if let (Some(r), true, Some(h)) = (row_num, custom_height, ht) {
            // Row numbers are 1-based in the file
            worksheet.set_row_height(r.saturating_sub(1), h);
        }
    }

    /// Process a cell and add it to the worksheet
    fn process_cell(
        worksheet: &mut Worksheet,
        cell_ref: &str,
        cell_type: Option<&str>,
        value: Option<&str>,
        style_idx: Option<u32>,
        shared_strings: &[String],
        styles: &[Style],
    ) -> XlsxResult<()> {
        let addr = CellAddress::parse(cell_ref).map_err(|e| {
            XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
        })?;

        if let Some(value) = value {
            let cell_value = match cell_type {
                // Shared string
                Some("s") => {
                    let idx: usize = value.parse().map_err(|_| {
                        XlsxError::Parse(format!("Invalid shared string index: {}", value))
                    })?;
                    let s = shared_strings.get(idx).ok_or_else(|| {
                        XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                    })?;
                    CellValue::string(s.clone())
                }

                // Boolean
                Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

                // Inline or explicit string
                Some("inlineStr") | Some("str") => {
                    CellValue::string(decode_excel_escapes(value))
                }

                // Number (default type or explicit "n")
                None | Some("n") => match value.parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::string(value),
                },

                // Unknown type, treat as string
                Some(_) => CellValue::string(value),
            };

            worksheet.set_value(addr.row, addr.col, cell_value);
        }

        if let Some(s) = style_idx {
            if s != 0 {
                let style = styles
                    .get(s as usize)
                    .ok_or_else(|| XlsxError::Parse(format!("Style index {} out of bounds", s)))?;
                worksheet.set_style(addr.row, addr.col, style);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("a_x000a_b"), "a\nb");
        assert_eq!(decode_excel_escapes("a_x000d_b"), "a\rb");
        assert_eq!(decode_excel_escapes("_x005f_"), "_");
        assert_eq!(decode_excel_escapes("plain"), "plain");
        // Incomplete sequences pass through unchanged
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("a_b"), "a_b");
    }

    #[test]
    fn test_reject_non_xlsx_archive() {
        let data: Vec<u8> = b"not a zip file".to_vec();
        let result = XlsxReader::read(std::io::Cursor::new(data));
        assert!(result.is_err());
    }
}
