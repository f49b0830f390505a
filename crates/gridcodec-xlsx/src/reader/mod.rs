//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::codec::{decode, DecodeContext, Fallback, StorageType};
use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use crate::options::{ReadOptions, SheetSelector};
use crate::report::ReadReport;
use crate::shared_strings::{read_shared_strings_xml, SharedStringTable};
use crate::styles::read_styles_xml;
use gridcodec_core::{CellAddress, ColumnWidth, DateSystem, GenericCell, Grid, Scalar, Stylesheet};

/// A decoded sheet and what happened while decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRead {
    pub grid: Grid,
    /// Column width hints stored with the sheet
    pub columns: Vec<ColumnWidth>,
    pub report: ReadReport,
}

/// Sheets listed by workbook.xml as `(name, r:id)`, in workbook order
struct WorkbookInfo {
    sheets: Vec<(String, String)>,
    date_system: DateSystem,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first sheet of an XLSX file
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Grid> {
        Self::read_file_with(path, &ReadOptions::default()).map(|read| read.grid)
    }

    /// Read the sheet chosen by `options` from an XLSX file
    pub fn read_file_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> XlsxResult<SheetRead> {
        let file = File::open(path.as_ref())?;
        Self::read_with(BufReader::new(file), options)
    }

    /// Read the first sheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Grid> {
        Self::read_with(reader, &ReadOptions::default()).map(|read| read.grid)
    }

    /// Read the sheet chosen by `options` from a reader.
    ///
    /// Cells that cannot be decoded as their stored type degrade to a
    /// fallback value instead of failing the read; the returned report
    /// counts them.
    pub fn read_with<R: Read + Seek>(reader: R, options: &ReadOptions) -> XlsxResult<SheetRead> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let workbook = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let (name, r_id) = Self::select_sheet(&workbook.sheets, &options.sheet)?;
        let path = sheet_paths.get(r_id).ok_or_else(|| {
            XlsxError::MissingPart(format!("worksheet relationship {} for sheet '{}'", r_id, name))
        })?;

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let stylesheet = Self::read_styles(&mut archive)?;

        let ctx = DecodeContext {
            stylesheet: &stylesheet,
            shared_strings: &shared_strings,
            date_system: workbook.date_system,
        };
        let read = Self::read_worksheet(&mut archive, path, name, &ctx)?;

        log::debug!("{}", read.report);
        Ok(read)
    }

    fn select_sheet<'a>(
        sheets: &'a [(String, String)],
        selector: &SheetSelector,
    ) -> XlsxResult<&'a (String, String)> {
        let found = match selector {
            SheetSelector::First => sheets.first(),
            SheetSelector::Index(i) => sheets.get(*i),
            SheetSelector::Name(name) => sheets.iter().find(|(n, _)| n == name),
        };
        found.ok_or_else(|| {
            XlsxError::SheetNotFound(match selector {
                SheetSelector::First => "workbook lists no sheets".to_string(),
                SheetSelector::Index(i) => format!("index {} of {}", i, sheets.len()),
                SheetSelector::Name(name) => format!("'{}'", name),
            })
        })
    }

    /// Read the shared strings table; a document without one has no text cells
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<SharedStringTable> {
        match archive.by_name("xl/sharedStrings.xml") {
            Ok(file) => read_shared_strings_xml(file),
            Err(_) => Ok(SharedStringTable::new()),
        }
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Stylesheet> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(Stylesheet::default()),
        }
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<WorkbookInfo> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date1904 = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let name = attr_value(&e, b"name");
                        let r_id = attr_value(&e, b"r:id");
                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        date1904 = matches!(
                            attr_value(&e, b"date1904").as_deref(),
                            Some("1") | Some("true")
                        );
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(WorkbookInfo {
            sheets,
            date_system: DateSystem::from_date1904(date1904),
        })
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only worksheet relationships matter here
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
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

    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet_name: &str,
        ctx: &DecodeContext<'_>,
    ) -> XlsxResult<SheetRead> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        // whitespace inside <v> and <t> is content
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut grid = Grid::new();
        let mut columns = Vec::new();
        let mut report = ReadReport {
            sheet_name: sheet_name.to_string(),
            ..ReadReport::default()
        };

        let mut current_row: Option<Vec<GenericCell>> = None;
        let mut cell = PendingCell::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => current_row = Some(Vec::new()),
                    b"c" => {
                        cell = PendingCell::from_attrs(&e);
                        in_cell = true;
                    }
                    b"v" if in_cell => in_value = true,
                    b"is" if in_cell => {
                        in_inline_str = true;
                        cell.raw.get_or_insert_with(String::new);
                    }
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    _ => {}
                },

                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => grid.push_row(Vec::new()),
                    b"c" => {
                        let empty = PendingCell::from_attrs(&e);
                        if let Some(row) = current_row.as_mut() {
                            empty.finish(row, grid.len(), ctx, &mut report);
                        }
                    }
                    b"col" => {
                        if let Some(col) = parse_col(&e) {
                            columns.push(col);
                        }
                    }
                    _ => {}
                },

                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    let text = e.unescape()?;
                    cell.raw.get_or_insert_with(String::new).push_str(&text);
                }
                Ok(Event::CData(e)) if in_value || in_inline_text => {
                    cell.raw
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }

                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            grid.push_row(row);
                        }
                    }
                    b"c" if in_cell => {
                        in_cell = false;
                        let done = std::mem::take(&mut cell);
                        if let Some(row) = current_row.as_mut() {
                            done.finish(row, grid.len(), ctx, &mut report);
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },

                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        report.row_count = grid.len();
        Ok(SheetRead {
            grid,
            columns,
            report,
        })
    }
}

/// A `<c>` element collected up to its end tag
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    storage: Option<StorageType>,
    style_id: u32,
    raw: Option<String>,
}

impl PendingCell {
    fn from_attrs(e: &BytesStart<'_>) -> Self {
        let mut cell = Self::default();
        for attr in e.attributes().flatten() {
            let Ok(val) = attr.unescape_value() else {
                continue;
            };
            match attr.key.as_ref() {
                b"r" => cell.reference = Some(val.into_owned()),
                b"t" => cell.storage = StorageType::from_xlsx(&val),
                // unparsable style ids read as style 0
                b"s" => cell.style_id = val.trim().parse().unwrap_or(0),
                _ => {}
            }
        }
        cell
    }

    /// Decode the cell and append it to `row`, which is row `row_index` of the sheet
    fn finish(
        self,
        row: &mut Vec<GenericCell>,
        row_index: usize,
        ctx: &DecodeContext<'_>,
        report: &mut ReadReport,
    ) {
        let col_index = row.len();
        let reference = || {
            self.reference.clone().unwrap_or_else(|| {
                CellAddress::from_position(row_index, col_index)
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| format!("row {} cell {}", row_index + 1, col_index + 1))
            })
        };

        let mut style_id = self.style_id;
        if style_id != 0 && !ctx.stylesheet.catalog().contains(style_id) {
            log::warn!(
                "{}: {} ({}), using style 0",
                reference(),
                Fallback::StyleIndex,
                style_id
            );
            report.fallbacks.record(Fallback::StyleIndex);
            style_id = 0;
        }

        let text_storage = matches!(
            self.storage,
            Some(StorageType::SharedString | StorageType::Text | StorageType::InlineString)
        );

        let value = self.raw.as_deref().map(|raw| {
            let raw = if matches!(
                self.storage,
                Some(StorageType::Text | StorageType::InlineString)
            ) {
                decode_excel_escapes(raw)
            } else {
                raw.to_string()
            };

            let decoded = decode(&raw, self.storage, style_id, ctx);
            for fallback in &decoded.fallbacks {
                log::warn!("{}: {} ({:?})", reference(), fallback, raw);
                report.fallbacks.record(*fallback);
            }
            decoded.value
        });

        // text read from a text cell is written back as text
        let store_as_text = text_storage && matches!(value, Some(Scalar::Text(_)));

        row.push(GenericCell {
            value,
            style_id,
            store_as_text,
        });
        report.cell_count += 1;
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a `<col min=".." max=".." width=".." customWidth="1"/>` element
fn parse_col(e: &BytesStart<'_>) -> Option<ColumnWidth> {
    let min = attr_value(e, b"min")?.parse().ok()?;
    let max = attr_value(e, b"max")?.parse().ok()?;
    let width = attr_value(e, b"width")?.parse().ok()?;
    let mut col = ColumnWidth::new(min, max, width);
    col.custom_width = matches!(
        attr_value(e, b"customWidth").as_deref(),
        Some("1") | Some("true")
    );
    Some(col)
}
