//! XLSX styles (styles.xml) read/write helpers

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_xml;
use gridcodec_core::{
    Border, BorderEdge, BorderLineStyle, Color, Fill, Font, NumberFormatDef, PatternType,
    StyleDefinition, Stylesheet,
};

// === Writing ===

/// Render the styles part for `sheet`
pub(crate) fn write_styles_xml(sheet: &Stylesheet) -> String {
    let mut xml = String::new();
    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    let numfmts = sheet.number_formats();
    if !numfmts.is_empty() {
        xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
        for fmt in numfmts {
            xml.push_str(&format!(
                "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                fmt.id,
                escape_xml(&fmt.code)
            ));
        }
        xml.push_str("\n  </numFmts>");
    }

    xml.push_str(&format!("\n  <fonts count=\"{}\">", sheet.fonts().len()));
    for font in sheet.fonts() {
        xml.push_str("\n    ");
        xml.push_str(&write_font(font));
    }
    xml.push_str("\n  </fonts>");

    xml.push_str(&format!("\n  <fills count=\"{}\">", sheet.fills().len()));
    for fill in sheet.fills() {
        xml.push_str("\n    ");
        xml.push_str(&write_fill(fill));
    }
    xml.push_str("\n  </fills>");

    xml.push_str(&format!("\n  <borders count=\"{}\">", sheet.borders().len()));
    for border in sheet.borders() {
        xml.push_str("\n    ");
        xml.push_str(&write_border(border));
    }
    xml.push_str("\n  </borders>");

    xml.push_str(
        r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
    );

    xml.push_str(&format!("\n  <cellXfs count=\"{}\">", sheet.catalog().len()));
    for def in sheet.catalog().iter() {
        xml.push_str("\n    ");
        xml.push_str(&write_xf(def));
    }
    xml.push_str("\n  </cellXfs>");

    xml.push_str(
        r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
    );
    xml
}

fn write_color(tag: &str, color: &Color) -> String {
    match color.to_xml_attr() {
        Some(attr) => format!("<{tag} {attr}/>"),
        None => format!("<{tag} auto=\"1\"/>"),
    }
}

fn write_font(font: &Font) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &Fill) -> String {
    match fill {
        Fill::None | Fill::Gray125 => format!(
            "<fill><patternFill patternType=\"{}\"/></fill>",
            fill.pattern_type().as_str()
        ),
        Fill::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}</patternFill></fill>",
            write_color("fgColor", color)
        ),
        Fill::Pattern {
            pattern,
            foreground,
            background,
        } => format!(
            "<fill><patternFill patternType=\"{}\">{}{}</patternFill></fill>",
            pattern.as_str(),
            write_color("fgColor", foreground),
            write_color("bgColor", background)
        ),
    }
}

fn write_border(border: &Border) -> String {
    let mut s = String::from("<border>");
    for (tag, edge) in border.edges() {
        match edge {
            None => s.push_str(&format!("<{tag}/>")),
            Some(edge) => {
                s.push_str(&format!("<{tag} style=\"{}\">", edge.style.as_str()));
                s.push_str(&write_color("color", &edge.color));
                s.push_str(&format!("</{tag}>"));
            }
        }
    }
    s.push_str("<diagonal/></border>");
    s
}

fn write_xf(def: &StyleDefinition) -> String {
    let mut attrs = String::new();
    if def.number_format_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if def.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if def.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if def.border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }

    format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}/>",
        def.number_format_id, def.font_id, def.fill_id, def.border_id, attrs
    )
}

// === Reading ===

/// Top-level list of styles.xml currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

impl Section {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        Some(match tag {
            b"numFmts" => Section::NumFmts,
            b"fonts" => Section::Fonts,
            b"fills" => Section::Fills,
            b"borders" => Section::Borders,
            b"cellXfs" => Section::CellXfs,
            b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" | b"extLst" => {
                Section::Other
            }
            _ => return None,
        })
    }
}

struct StylesParser {
    section: Section,
    fonts: Vec<Font>,
    fills: Vec<Fill>,
    borders: Vec<Border>,
    numfmts: Vec<NumberFormatDef>,
    cell_xfs: Vec<StyleDefinition>,

    current_font: Option<Font>,
    in_fill: bool,
    fill_pattern: PatternType,
    fill_fg: Color,
    fill_bg: Color,
    current_border: Option<Border>,
    border_edge: Option<String>,
}

impl StylesParser {
    fn new() -> Self {
        Self {
            section: Section::Other,
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            numfmts: Vec::new(),
            cell_xfs: Vec::new(),
            current_font: None,
            in_fill: false,
            fill_pattern: PatternType::None,
            fill_fg: Color::Auto,
            fill_bg: Color::Auto,
            current_border: None,
            border_edge: None,
        }
    }

    /// Handle an opening tag. `empty` is set for self-closing elements,
    /// which get no matching end event.
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        let name = e.name();
        let tag = name.as_ref();

        if let Some(section) = Section::from_tag(tag) {
            if !empty {
                self.section = section;
            }
            return;
        }

        match (self.section, tag) {
            (Section::NumFmts, b"numFmt") => {
                let id = attr_value(e, b"numFmtId").and_then(|v| v.parse().ok());
                let code = attr_value(e, b"formatCode");
                if let (Some(id), Some(code)) = (id, code) {
                    self.numfmts.push(NumberFormatDef::new(id, code));
                }
            }

            (Section::Fonts, b"font") => {
                let font = Font {
                    name: String::new(),
                    ..Font::default()
                };
                if empty {
                    self.fonts.push(font);
                } else {
                    self.current_font = Some(font);
                }
            }
            (Section::Fonts, b"b") => {
                if let Some(font) = self.current_font.as_mut() {
                    font.bold = flag_value(e);
                }
            }
            (Section::Fonts, b"i") => {
                if let Some(font) = self.current_font.as_mut() {
                    font.italic = flag_value(e);
                }
            }
            (Section::Fonts, b"sz") => {
                if let Some(font) = self.current_font.as_mut() {
                    if let Some(size) = attr_value(e, b"val").and_then(|v| v.parse().ok()) {
                        font.size = size;
                    }
                }
            }
            (Section::Fonts, b"name") => {
                if let Some(font) = self.current_font.as_mut() {
                    if let Some(name) = attr_value(e, b"val") {
                        font.name = name;
                    }
                }
            }
            (Section::Fonts, b"color") => {
                if let Some(font) = self.current_font.as_mut() {
                    font.color = parse_color_attrs(e);
                }
            }

            (Section::Fills, b"fill") => {
                if empty {
                    self.fills.push(Fill::None);
                } else {
                    self.in_fill = true;
                    self.fill_pattern = PatternType::None;
                    self.fill_fg = Color::Auto;
                    self.fill_bg = Color::Auto;
                }
            }
            (Section::Fills, b"patternFill") if self.in_fill => {
                if let Some(p) = attr_value(e, b"patternType") {
                    self.fill_pattern = PatternType::from_xlsx(&p);
                }
            }
            (Section::Fills, b"fgColor") if self.in_fill => {
                self.fill_fg = fill_color(parse_color_attrs(e));
            }
            (Section::Fills, b"bgColor") if self.in_fill => {
                self.fill_bg = fill_color(parse_color_attrs(e));
            }

            (Section::Borders, b"border") => {
                if empty {
                    self.borders.push(Border::new());
                } else {
                    self.current_border = Some(Border::new());
                }
            }
            (Section::Borders, b"color") => {
                let color = parse_color_attrs(e);
                if let (Some(border), Some(edge_name)) =
                    (self.current_border.as_mut(), self.border_edge.as_deref())
                {
                    if let Some(Some(edge)) = border.edge_mut(edge_name) {
                        edge.color = color;
                    }
                }
            }
            (Section::Borders, edge_tag) => {
                let Some(border) = self.current_border.as_mut() else {
                    return;
                };
                let edge_name = String::from_utf8_lossy(edge_tag).into_owned();
                let Some(slot) = border.edge_mut(&edge_name) else {
                    return;
                };
                *slot = attr_value(e, b"style")
                    .and_then(|s| BorderLineStyle::from_xlsx(&s))
                    .map(|style| BorderEdge {
                        style,
                        color: Color::Auto,
                    });
                if !empty {
                    self.border_edge = Some(edge_name);
                }
            }

            (Section::CellXfs, b"xf") => {
                let id = |key: &[u8]| -> u32 {
                    attr_value(e, key)
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0)
                };
                self.cell_xfs.push(StyleDefinition {
                    number_format_id: id(b"numFmtId"),
                    font_id: id(b"fontId"),
                    fill_id: id(b"fillId"),
                    border_id: id(b"borderId"),
                });
            }

            _ => {}
        }
    }

    fn close(&mut self, tag: &[u8]) {
        if Section::from_tag(tag).is_some() {
            self.section = Section::Other;
            return;
        }

        match tag {
            b"font" => {
                if let Some(font) = self.current_font.take() {
                    self.fonts.push(font);
                }
            }
            b"fill" if self.in_fill => {
                self.in_fill = false;
                self.fills
                    .push(Fill::from_pattern(self.fill_pattern, self.fill_fg, self.fill_bg));
            }
            b"border" => {
                if let Some(border) = self.current_border.take() {
                    self.borders.push(border);
                }
            }
            b"left" | b"right" | b"top" | b"bottom" | b"start" | b"end" => {
                self.border_edge = None;
            }
            _ => {}
        }
    }

    fn finish(self) -> Stylesheet {
        Stylesheet::from_parts(
            self.fonts,
            self.fills,
            self.borders,
            self.numfmts,
            self.cell_xfs,
        )
    }
}

/// Parse the styles part into a [`Stylesheet`]. Tables are kept as stored;
/// differential formats and named cell styles are not read.
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Stylesheet> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parser = StylesParser::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.open(&e, false),
            Ok(Event::Empty(e)) => parser.open(&e, true),
            Ok(Event::End(e)) => parser.close(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let sheet = parser.finish();
    log::debug!(
        "read styles: {} fonts, {} fills, {} borders, {} cell formats",
        sheet.fonts().len(),
        sheet.fills().len(),
        sheet.borders().len(),
        sheet.catalog().len()
    );
    Ok(sheet)
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// `<b/>` is on; `<b val="0"/>` and `<b val="false"/>` are off
fn flag_value(e: &BytesStart<'_>) -> bool {
    !matches!(attr_value(e, b"val").as_deref(), Some("0") | Some("false"))
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    let mut rgb = None;
    let mut theme = None;
    let mut indexed = None;

    for attr in e.attributes().flatten() {
        let Ok(val) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"rgb" => rgb = Color::from_hex(&val),
            b"theme" => theme = val.parse::<u32>().ok(),
            b"indexed" => indexed = val.parse::<u32>().ok(),
            _ => {}
        }
    }

    rgb.or(theme.map(Color::Theme))
        .or(indexed.map(Color::Indexed))
        .unwrap_or(Color::Auto)
}

/// Palette index 64 is the system background, which fills treat as automatic
fn fill_color(color: Color) -> Color {
    match color {
        Color::Indexed(64) => Color::Auto,
        c => c,
    }
}
