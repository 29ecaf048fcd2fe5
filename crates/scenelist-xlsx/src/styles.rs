//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use scenelist_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, Style, VerticalAlignment,
};
use scenelist_core::Workbook;

// === Writing ===

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xfId.
    sheet_maps: Vec<HashMap<u32, u32>>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();

        // Index 0 is always default style
        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        let mut sheet_maps: Vec<HashMap<u32, u32>> = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if local_idx == 0 || map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet
                    .style_pool()
                    .get(local_idx)
                    .cloned()
                    .unwrap_or_default();

                let xf_id = match style_to_xf.get(&style) {
                    Some(&id) => id,
                    None => {
                        let id = styles.len() as u32;
                        styles.push(style.clone());
                        style_to_xf.insert(style, id);
                        id
                    }
                };

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);
        }

        Self { styles, sheet_maps }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        // Build component tables
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = Vec::new();

        let default_font = FontStyle::default();
        fonts.push(default_font.clone());
        font_ids.insert(default_font, 0);

        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = Vec::new();
        // The format requires the first two fills to be none and gray125;
        // gray125 is emitted literally below since the model has no
        // pattern fills.
        fills.push(FillStyle::None); // id 0, id 1 is gray125
        fill_ids.insert(FillStyle::None, 0);

        let mut border_ids: HashMap<BorderStyle, u32> = HashMap::new();
        let mut borders: Vec<BorderStyle> = Vec::new();
        let default_border = BorderStyle::default();
        borders.push(default_border.clone());
        border_ids.insert(default_border, 0);

        // Resolve component IDs for each style
        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = match font_ids.get(&style.font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(style.font.clone());
                    font_ids.insert(style.font.clone(), id);
                    id
                }
            };

            let fill_id = match &style.fill {
                FillStyle::None => 0,
                other => {
                    if let Some(&id) = fill_ids.get(other) {
                        id
                    } else {
                        // +1 accounts for the literal gray125 fill at id 1
                        let id = fills.len() as u32 + 1;
                        fills.push(other.clone());
                        fill_ids.insert(other.clone(), id);
                        id
                    }
                }
            };

            let border_id = match border_ids.get(&style.border) {
                Some(&id) => id,
                None => {
                    let id = borders.len() as u32;
                    borders.push(style.border.clone());
                    border_ids.insert(style.border.clone(), id);
                    id
                }
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                border_id,
            });
        }

        // Write XML
        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        // Fonts
        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        // Fills (none + gray125, then solids)
        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len() + 1));
        xml.push_str("\n    <fill><patternFill patternType=\"none\"/></fill>");
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for fill in fills.iter().skip(1) {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        // Borders
        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        // cellStyleXfs (required)
        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        // cellXfs
        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for (i, ids) in resolved.iter().enumerate() {
            let style = &self.styles[i];
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        // cellStyles (required)
        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " indexed=\"64\"".to_string(),
        Color::Rgb { r, g, b } => format!(" rgb=\"FF{:02X}{:02X}{:02X}\"", r, g, b),
        Color::Argb { a, r, g, b } => {
            format!(" rgb=\"{:02X}{:02X}{:02X}{:02X}\"", a, r, g, b)
        }
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, tint } => {
            if *tint == 0 {
                format!(" theme=\"{}\"", index)
            } else {
                format!(" theme=\"{}\" tint=\"{}\"", index, (*tint as f64) / 100.0)
            }
        }
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&format!("<color{}/>", color_attrs(&font.color)));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => {
            format!(
                "<fill><patternFill patternType=\"solid\"><fgColor{}/><bgColor indexed=\"64\"/></patternFill></fill>",
                color_attrs(color)
            )
        }
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    match edge {
        None => format!("<{tag}/>"),
        Some(e) => match e.style.as_xml_str() {
            None => format!("<{tag}/>"),
            Some(style) => format!(
                "<{tag} style=\"{}\"><color{}/></{tag}>",
                style,
                color_attrs(&e.color)
            ),
        },
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str("<diagonal/></border>");
    s
}

fn horiz_to_str(h: HorizontalAlignment) -> &'static str {
    match h {
        HorizontalAlignment::General => "general",
        HorizontalAlignment::Left => "left",
        HorizontalAlignment::Center => "center",
        HorizontalAlignment::Right => "right",
        HorizontalAlignment::Justify => "justify",
    }
}

fn vert_to_str(v: VerticalAlignment) -> &'static str {
    match v {
        VerticalAlignment::Top => "top",
        VerticalAlignment::Center => "center",
        VerticalAlignment::Bottom => "bottom",
    }
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }

    let default = Alignment::default();
    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", horiz_to_str(al.horizontal)));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", vert_to_str(al.vertical)));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if style.font != FontStyle::default() {
        attrs.push_str(" applyFont=\"1\"");
    }
    if style.fill != FillStyle::None {
        attrs.push_str(" applyFill=\"1\"");
    }
    if style.border != BorderStyle::default() {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if !style.alignment.is_default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"0\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    if alignment_xml.is_empty() {
        s.push_str("/>");
    } else {
        s.push('>');
        s.push_str(&alignment_xml);
        s.push_str("</xf>");
    }
    s
}

// === Reading ===

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut borders: Vec<BorderStyle> = Vec::new();
    let mut cell_xfs: Vec<Style> = Vec::new();

    // Current objects while parsing
    let mut current_font: Option<FontStyle> = None;
    let mut in_fill = false;
    let mut current_fill_solid = false;
    let mut current_fill_fg: Color = Color::Auto;

    let mut current_border: Option<BorderStyle> = None;
    let mut current_border_edge: Option<&'static str> = None;

    let mut current_xf: Option<(u32, u32, u32, Alignment)> = None;
    let mut in_cell_xfs = false;

    loop {
        let ev = xml_reader.read_event_into(&mut buf);
        match ev {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let is_empty = matches!(ev, Ok(Event::Empty(_)));
                match e.name().as_ref() {
                    b"cellXfs" => {
                        in_cell_xfs = true;
                    }

                    b"font" => {
                        if is_empty {
                            fonts.push(FontStyle::default());
                        } else {
                            current_font = Some(FontStyle::default());
                        }
                    }

                    b"fill" => {
                        in_fill = true;
                        current_fill_solid = false;
                        current_fill_fg = Color::Auto;
                    }

                    b"patternFill" if in_fill => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"patternType" {
                                if let Ok(v) = attr.unescape_value() {
                                    current_fill_solid = v.as_ref() == "solid";
                                }
                            }
                        }
                    }

                    b"border" => {
                        current_border = Some(BorderStyle::default());
                        current_border_edge = None;
                    }

                    b"left" | b"right" | b"top" | b"bottom" => {
                        if let Some(border) = current_border.as_mut() {
                            let edge_name: &'static str = match e.name().as_ref() {
                                b"left" => "left",
                                b"right" => "right",
                                b"top" => "top",
                                _ => "bottom",
                            };
                            current_border_edge = Some(edge_name);

                            let mut style = BorderLineStyle::None;
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"style" {
                                    if let Ok(v) = attr.unescape_value() {
                                        style = BorderLineStyle::from_xml_str(&v);
                                    }
                                }
                            }
                            if style != BorderLineStyle::None {
                                set_border_edge(
                                    border,
                                    edge_name,
                                    Some(BorderEdge {
                                        style,
                                        color: Color::Auto,
                                    }),
                                );
                            }
                        }
                    }

                    b"xf" if in_cell_xfs => {
                        let mut font_id = 0u32;
                        let mut fill_id = 0u32;
                        let mut border_id = 0u32;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"fontId" => {
                                    font_id = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse().ok())
                                        .unwrap_or(0);
                                }
                                b"fillId" => {
                                    fill_id = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse().ok())
                                        .unwrap_or(0);
                                }
                                b"borderId" => {
                                    border_id = attr
                                        .unescape_value()
                                        .ok()
                                        .and_then(|s| s.parse().ok())
                                        .unwrap_or(0);
                                }
                                _ => {}
                            }
                        }
                        if is_empty {
                            cell_xfs.push(compose_style(
                                &fonts,
                                &fills,
                                &borders,
                                font_id,
                                fill_id,
                                border_id,
                                Alignment::default(),
                            ));
                        } else {
                            current_xf = Some((font_id, fill_id, border_id, Alignment::default()));
                        }
                    }

                    b"alignment" => {
                        if let Some((_f, _fi, _b, align)) = current_xf.as_mut() {
                            for attr in e.attributes().flatten() {
                                let val = match attr.unescape_value() {
                                    Ok(v) => v,
                                    Err(_) => continue,
                                };
                                match attr.key.as_ref() {
                                    b"horizontal" => {
                                        if let Some(h) = str_to_horizontal(&val) {
                                            align.horizontal = h;
                                        }
                                    }
                                    b"vertical" => {
                                        if let Some(v) = str_to_vertical(&val) {
                                            align.vertical = v;
                                        }
                                    }
                                    b"wrapText" => {
                                        align.wrap_text =
                                            val.as_ref() == "1" || val.as_ref() == "true";
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }

                    // Font sub-elements
                    b"b" => {
                        if let Some(font) = current_font.as_mut() {
                            font.bold = true;
                        }
                    }
                    b"i" => {
                        if let Some(font) = current_font.as_mut() {
                            font.italic = true;
                        }
                    }
                    b"sz" => {
                        if let Some(font) = current_font.as_mut() {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"val" {
                                    if let Ok(v) = attr.unescape_value() {
                                        font.size = v.parse::<f64>().unwrap_or(font.size);
                                    }
                                }
                            }
                        }
                    }
                    b"name" => {
                        if let Some(font) = current_font.as_mut() {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"val" {
                                    if let Ok(v) = attr.unescape_value() {
                                        font.name = v.to_string();
                                    }
                                }
                            }
                        }
                    }

                    b"color" => {
                        let color = parse_color_attrs(e);
                        if let Some(font) = current_font.as_mut() {
                            font.color = color;
                        } else if let (Some(border), Some(edge_name)) =
                            (current_border.as_mut(), current_border_edge)
                        {
                            let edge_opt = get_border_edge(border, edge_name).clone();
                            if let Some(mut edge) = edge_opt {
                                edge.color = color;
                                set_border_edge(border, edge_name, Some(edge));
                            }
                        }
                    }

                    b"fgColor" if in_fill => {
                        current_fill_fg = parse_color_attrs(e);
                    }

                    _ => {}
                }
            }

            Ok(Event::End(e)) => match e.name().as_ref() {
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fill" => {
                    if in_fill {
                        let fill = if current_fill_solid {
                            FillStyle::Solid {
                                color: current_fill_fg,
                            }
                        } else {
                            FillStyle::None
                        };
                        fills.push(fill);
                        in_fill = false;
                    }
                }
                b"border" => {
                    if let Some(border) = current_border.take() {
                        borders.push(border);
                    }
                    current_border_edge = None;
                }
                b"left" | b"right" | b"top" | b"bottom" => {
                    current_border_edge = None;
                }
                b"xf" => {
                    if let Some((font_id, fill_id, border_id, align)) = current_xf.take() {
                        if in_cell_xfs {
                            cell_xfs.push(compose_style(
                                &fonts, &fills, &borders, font_id, fill_id, border_id, align,
                            ));
                        }
                    }
                }
                b"cellXfs" => {
                    in_cell_xfs = false;
                }
                _ => {}
            },

            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    // Self-closing <xf .../> elements arrive as Empty events and are
    // handled above; flush any trailing state.
    if let Some((font_id, fill_id, border_id, align)) = current_xf.take() {
        if in_cell_xfs {
            cell_xfs.push(compose_style(
                &fonts, &fills, &borders, font_id, fill_id, border_id, align,
            ));
        }
    }

    if cell_xfs.is_empty() {
        cell_xfs.push(Style::default());
    }

    Ok(cell_xfs)
}

#[allow(clippy::too_many_arguments)]
fn compose_style(
    fonts: &[FontStyle],
    fills: &[FillStyle],
    borders: &[BorderStyle],
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Alignment,
) -> Style {
    Style {
        font: fonts.get(font_id as usize).cloned().unwrap_or_default(),
        fill: fills.get(fill_id as usize).cloned().unwrap_or_default(),
        border: borders.get(border_id as usize).cloned().unwrap_or_default(),
        alignment,
    }
}

fn parse_color_attrs(e: &quick_xml::events::BytesStart) -> Color {
    let mut color = Color::Auto;
    let mut theme: Option<u8> = None;
    let mut tint: i8 = 0;

    for attr in e.attributes().flatten() {
        let val = match attr.unescape_value() {
            Ok(v) => v,
            Err(_) => continue,
        };
        match attr.key.as_ref() {
            b"rgb" => {
                if let Some(c) = Color::from_hex(&val) {
                    color = c;
                }
            }
            b"indexed" => {
                if let Ok(i) = val.parse::<u8>() {
                    // 64 is the automatic/system color
                    color = if i == 64 { Color::Auto } else { Color::Indexed(i) };
                }
            }
            b"theme" => {
                theme = val.parse::<u8>().ok();
            }
            b"tint" => {
                if let Ok(t) = val.parse::<f64>() {
                    tint = (t * 100.0).round().clamp(-100.0, 100.0) as i8;
                }
            }
            _ => {}
        }
    }

    if let Some(index) = theme {
        return Color::Theme { index, tint };
    }
    color
}

fn str_to_horizontal(s: &str) -> Option<HorizontalAlignment> {
    match s {
        "general" => Some(HorizontalAlignment::General),
        "left" => Some(HorizontalAlignment::Left),
        "center" => Some(HorizontalAlignment::Center),
        "right" => Some(HorizontalAlignment::Right),
        "justify" => Some(HorizontalAlignment::Justify),
        _ => None,
    }
}

fn str_to_vertical(s: &str) -> Option<VerticalAlignment> {
    match s {
        "top" => Some(VerticalAlignment::Top),
        "center" => Some(VerticalAlignment::Center),
        "bottom" => Some(VerticalAlignment::Bottom),
        _ => None,
    }
}

fn set_border_edge(border: &mut BorderStyle, edge_name: &str, edge: Option<BorderEdge>) {
    match edge_name {
        "left" => border.left = edge,
        "right" => border.right = edge,
        "top" => border.top = edge,
        "bottom" => border.bottom = edge,
        _ => {}
    }
}

fn get_border_edge<'a>(border: &'a BorderStyle, edge_name: &str) -> &'a Option<BorderEdge> {
    match edge_name {
        "left" => &border.left,
        "right" => &border.right,
        "top" => &border.top,
        "bottom" => &border.bottom,
        _ => &None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenelist_core::Workbook;

    #[test]
    fn test_style_table_dedup_across_sheets() {
        let mut wb = Workbook::empty();
        let style = Style::new().bold(true).fill_color(Color::HEADER_GRAY);

        wb.add_worksheet("a").unwrap();
        wb.add_worksheet("b").unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell(0, 0, "x", Some(&style));
        wb.worksheet_mut(1)
            .unwrap()
            .set_cell(0, 0, "y", Some(&style));

        let table = XlsxStyleTable::build(&wb);
        let xf_a = table.xf_id_for(0, wb.worksheet(0).unwrap().get_cell(0, 0).unwrap().style_index);
        let xf_b = table.xf_id_for(1, wb.worksheet(1).unwrap().get_cell(0, 0).unwrap().style_index);
        assert_eq!(xf_a, xf_b);
        assert_ne!(xf_a, 0);
    }

    #[test]
    fn test_styles_xml_roundtrip() {
        let mut wb = Workbook::empty();
        let style = Style::new()
            .bold(true)
            .fill_color(Color::HEADER_GRAY)
            .horizontal_alignment(HorizontalAlignment::Center)
            .wrap_text(true)
            .border_all(BorderLineStyle::Thin, Color::BLACK);
        wb.add_worksheet("s").unwrap();
        wb.worksheet_mut(0)
            .unwrap()
            .set_cell(0, 0, "x", Some(&style));

        let table = XlsxStyleTable::build(&wb);
        let xml = table.to_styles_xml();

        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], style);
    }

    #[test]
    fn test_parse_missing_styles_defaults() {
        let xml = r#"<?xml version="1.0"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
</styleSheet>"#;
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed, vec![Style::default()]);
    }
}
