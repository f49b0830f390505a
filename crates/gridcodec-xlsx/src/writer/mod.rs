//! XLSX writer

use std::io::{Seek, Write};
use std::path::Path;

use crate::atomic::atomic_write;
use crate::codec::{encode, StorageType};
use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_xml;
use crate::shared_strings::SharedStringTable;
use crate::styles::write_styles_xml;
use gridcodec_core::{CellAddress, ColumnWidth, Grid, Stylesheet, MAX_SHEET_NAME_LEN};

const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// A cell after encoding, ready for the worksheet part
struct StoredCell {
    reference: CellAddress,
    style_id: u32,
    /// `None` for a cell without a value, written as a bare `<c>`
    stored: Option<(String, StorageType)>,
}

/// Encoded rows plus the shared string table they reference
struct EncodedSheet {
    rows: Vec<Vec<StoredCell>>,
    shared_strings: SharedStringTable,
    /// Number of cells referencing the shared string table
    string_refs: usize,
    cell_count: usize,
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write `grid` as the only sheet of an XLSX file.
    ///
    /// The document is built in a temp file next to `path` and renamed over
    /// it once complete; on failure an existing file at `path` is untouched.
    pub fn write_file<P: AsRef<Path>>(
        path: P,
        sheet_name: &str,
        stylesheet: &Stylesheet,
        columns: &[ColumnWidth],
        grid: &Grid,
    ) -> XlsxResult<()> {
        // fail before touching the filesystem
        validate_sheet_name(sheet_name)?;
        atomic_write(path.as_ref(), |file| {
            Self::write(file, sheet_name, stylesheet, columns, grid)
        })
    }

    /// Write `grid` as the only sheet of an XLSX package to a writer
    pub fn write<W: Write + Seek>(
        writer: W,
        sheet_name: &str,
        stylesheet: &Stylesheet,
        columns: &[ColumnWidth],
        grid: &Grid,
    ) -> XlsxResult<()> {
        validate_sheet_name(sheet_name)?;
        let sheet = Self::encode_grid(grid, stylesheet)?;

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_doc_props(&mut zip)?;
        Self::write_workbook_xml(&mut zip, sheet_name)?;
        Self::write_workbook_rels(&mut zip)?;
        Self::write_part(&mut zip, "xl/styles.xml", &write_styles_xml(stylesheet))?;
        Self::write_part(
            &mut zip,
            "xl/sharedStrings.xml",
            &sheet.shared_strings.to_xml(sheet.string_refs),
        )?;
        Self::write_worksheet(&mut zip, columns, &sheet)?;

        zip.finish()?;

        log::debug!(
            "wrote sheet '{}': {} rows, {} cells, {} unique strings",
            sheet_name,
            sheet.rows.len(),
            sheet.cell_count,
            sheet.shared_strings.len()
        );
        Ok(())
    }

    /// Encode every cell in row-then-column order, moving text into the
    /// shared string table. Style ids missing from `stylesheet` become 0.
    fn encode_grid(grid: &Grid, stylesheet: &Stylesheet) -> XlsxResult<EncodedSheet> {
        let mut shared_strings = SharedStringTable::new();
        let mut string_refs = 0;
        let mut cell_count = 0;
        let mut rows = Vec::with_capacity(grid.len());

        for (r, row) in grid.iter().enumerate() {
            // row limit applies to empty rows as well
            CellAddress::from_position(r, 0)?;

            let mut cells = Vec::with_capacity(row.len());
            for (c, cell) in row.iter().enumerate() {
                let reference = CellAddress::from_position(r, c)?;
                let stored = cell.value.as_ref().map(|value| {
                    let encoded = encode(Some(value), cell.store_as_text);
                    match encoded.storage {
                        StorageType::Text => {
                            string_refs += 1;
                            let index = shared_strings.insert(&encoded.raw);
                            (index.to_string(), StorageType::SharedString)
                        }
                        storage => (encoded.raw, storage),
                    }
                });
                let mut style_id = cell.style_id;
                if style_id != 0 && !stylesheet.catalog().contains(style_id) {
                    log::warn!(
                        "{}: style id {} not in stylesheet ({} styles), using style 0",
                        reference,
                        style_id,
                        stylesheet.catalog().len()
                    );
                    style_id = 0;
                }
                cells.push(StoredCell {
                    reference,
                    style_id,
                    stored,
                });
                cell_count += 1;
            }
            rows.push(cells);
        }

        Ok(EncodedSheet {
            rows,
            shared_strings,
            string_refs,
            cell_count,
        })
    }

    fn write_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;
        Self::write_part(zip, "[Content_Types].xml", content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;
        Self::write_part(zip, "_rels/.rels", content)
    }

    fn write_doc_props<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let app = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>gridcodec</Application>
</Properties>"#;
        Self::write_part(zip, "docProps/app.xml", app)?;

        let created = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let core = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>
</cp:coreProperties>"#
        );
        Self::write_part(zip, "docProps/core.xml", &core)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_name: &str,
    ) -> XlsxResult<()> {
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
            escape_xml(sheet_name)
        );
        Self::write_part(zip, "xl/workbook.xml", &content)
    }

    fn write_workbook_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;
        Self::write_part(zip, "xl/_rels/workbook.xml.rels", content)
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        columns: &[ColumnWidth],
        sheet: &EncodedSheet,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        content.push_str(&format!(
            "\n    <dimension ref=\"{}\"/>",
            dimension(&sheet.rows)
        ));

        if !columns.is_empty() {
            content.push_str("\n    <cols>");
            for col in columns {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\"{}/>",
                    col.min,
                    col.max,
                    col.width,
                    if col.custom_width { " customWidth=\"1\"" } else { "" }
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");
        for (r, row) in sheet.rows.iter().enumerate() {
            if row.is_empty() {
                content.push_str(&format!("\n        <row r=\"{}\"/>", r + 1));
                continue;
            }

            content.push_str(&format!("\n        <row r=\"{}\">", r + 1));
            for cell in row {
                let style_attr = if cell.style_id != 0 {
                    format!(" s=\"{}\"", cell.style_id)
                } else {
                    String::new()
                };

                match &cell.stored {
                    None => content.push_str(&format!(
                        "\n            <c r=\"{}\"{}/>",
                        cell.reference, style_attr
                    )),
                    Some((raw, storage)) => {
                        let type_attr = storage
                            .as_xlsx()
                            .map(|t| format!(" t=\"{}\"", t))
                            .unwrap_or_default();
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{}{}><v>{}</v></c>",
                            cell.reference,
                            style_attr,
                            type_attr,
                            escape_xml(raw)
                        ));
                    }
                }
            }
            content.push_str("\n        </row>");
        }
        content.push_str("\n    </sheetData>\n</worksheet>");

        Self::write_part(zip, "xl/worksheets/sheet1.xml", &content)
    }
}

/// The `A1:XN` range covering every stored cell, `A1` for an empty sheet
fn dimension(rows: &[Vec<StoredCell>]) -> String {
    let last_col = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || last_col == 0 {
        return "A1".to_string();
    }
    let start = CellAddress::new(0, 0);
    // positions were checked while encoding
    let end = CellAddress::new((rows.len() - 1) as u32, (last_col - 1) as u16);
    start.range_to(end)
}

/// Check a sheet name against the container's rules: 1 to 31 characters,
/// none of `[ ] : * ? / \`, no leading or trailing apostrophe
pub fn validate_sheet_name(name: &str) -> XlsxResult<()> {
    let invalid = |reason| Err(XlsxError::InvalidSheetName(name.to_string(), reason));

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return invalid("name is longer than 31 characters");
    }
    if name.contains(&INVALID_SHEET_NAME_CHARS[..]) {
        return invalid("name contains one of [ ] : * ? / \\");
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return invalid("name starts or ends with an apostrophe");
    }
    Ok(())
}
