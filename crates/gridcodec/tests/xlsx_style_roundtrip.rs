//! End-to-end tests for styles (build stylesheet -> save -> read -> verify typed values)

use gridcodec::prelude::*;
use gridcodec::Fallback;
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};

struct Styles {
    sheet: Stylesheet,
    date: u32,
    datetime: u32,
    integer: u32,
    money: u32,
    text: u32,
    header: u32,
}

fn styles() -> Styles {
    let mut b = Stylesheet::builder()
        .default_font(Font::new("Calibri", 12.0))
        .reserve_defaults();
    let bold = b.add_font(Font::new("Calibri", 12.0).with_bold(true));
    let blue = b.add_fill(Fill::solid(Color::rgb(0x99, 0xCC, 0xFF)));
    let thin = b.add_border(Border::all(BorderLineStyle::Thin, Color::Auto));
    let money_fmt = b.add_number_format("#,##0.00");

    let date = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT));
    let datetime = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATETIME));
    let integer = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_INTEGER));
    let money = b.append(StyleDefinition::new().with_number_format(money_fmt));
    let text = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_TEXT));
    let header = b.append(
        StyleDefinition::new()
            .with_font(bold)
            .with_fill(blue)
            .with_border(thin),
    );

    Styles {
        sheet: b.build(),
        date,
        datetime,
        integer,
        money,
        text,
        header,
    }
}

fn round_trip(stylesheet: &Stylesheet, grid: &Grid) -> (SheetRead, Vec<u8>) {
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&mut buf, "Styled", stylesheet, &[], grid).unwrap();
    let bytes = buf.into_inner();
    let read = XlsxReader::read_with(Cursor::new(bytes.clone()), &ReadOptions::default()).unwrap();
    (read, bytes)
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_style_ids_survive_round_trip() {
    let s = styles();
    let grid = Grid::from(vec![vec![
        GenericCell::new("Header").with_style(s.header),
        GenericCell::new(Decimal::new(123456, 2)).with_style(s.money),
        GenericCell::new("plain"),
    ]]);

    let (read, bytes) = round_trip(&s.sheet, &grid);
    let ids: Vec<u32> = read.grid.row(0).unwrap().iter().map(|c| c.style_id).collect();
    assert_eq!(ids, vec![s.header, s.money, 0]);
    assert_eq!(
        read.grid.cell(0, 1).unwrap().value,
        Some(Scalar::Decimal(Decimal::new(123456, 2)))
    );

    let styles_xml = part(&bytes, "xl/styles.xml");
    assert!(styles_xml.contains("formatCode=\"#,##0.00\""));
    assert!(styles_xml.contains("<b/>"));
    assert!(styles_xml.contains("<left style=\"thin\">"));
    assert!(styles_xml.contains(&format!("<cellXfs count=\"{}\">", s.sheet.catalog().len())));
}

#[test]
fn test_serial_number_inferred_from_style() {
    let s = styles();
    // a raw serial written as a number: the style decides what it means
    let grid = Grid::from(vec![vec![
        GenericCell::new(44197).with_style(s.date),
        GenericCell::new(44197).with_style(s.integer),
        GenericCell::new(44197),
        GenericCell::new("44197.5").with_style(s.datetime),
    ]]);

    let (read, _) = round_trip(&s.sheet, &grid);
    let expected_date = NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let values: Vec<Option<Scalar>> = read
        .grid
        .row(0)
        .unwrap()
        .iter()
        .map(|c| c.value.clone())
        .collect();
    assert_eq!(
        values,
        vec![
            Some(Scalar::DateTime(expected_date)),
            Some(Scalar::Integer(44197)),
            Some(Scalar::Integer(44197)),
            Some(Scalar::DateTime(
                NaiveDate::from_ymd_opt(2021, 1, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            )),
        ]
    );
    assert!(read.report.fallbacks.is_empty());
}

#[test]
fn test_text_style_keeps_digits_as_text() {
    let s = styles();
    let grid = Grid::from(vec![vec![
        GenericCell::new("000123").with_style(s.text).as_text(),
        GenericCell::new("000123").with_style(s.text),
    ]]);

    let (read, _) = round_trip(&s.sheet, &grid);
    let first = read.grid.cell(0, 0).unwrap();
    assert_eq!(first.value, Some(Scalar::text("000123")));
    assert!(first.store_as_text);
    assert_eq!(first.style_id, s.text);
    // without the flag the digits are classified as a number
    assert_eq!(read.grid.cell(0, 1).unwrap().value, Some(Scalar::Integer(123)));
}

#[test]
fn test_dates_written_as_iso_ignore_style() {
    let s = styles();
    let when = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_opt(13, 45, 30)
        .unwrap();
    let grid = Grid::from(vec![vec![
        GenericCell::new(when).with_style(s.datetime),
        GenericCell::new(when).with_style(s.integer),
    ]]);

    let (read, bytes) = round_trip(&s.sheet, &grid);
    assert_eq!(read.grid.cell(0, 0).unwrap().value, Some(Scalar::DateTime(when)));
    assert_eq!(read.grid.cell(0, 1).unwrap().value, Some(Scalar::DateTime(when)));
    assert!(part(&bytes, "xl/worksheets/sheet1.xml").contains("<v>2024-02-29T13:45:30</v>"));
}

#[test]
fn test_unknown_style_is_replaced_by_default() {
    let s = styles();
    let grid = Grid::from(vec![vec![GenericCell::new(5).with_style(99)]]);

    let (read, bytes) = round_trip(&s.sheet, &grid);
    // replaced on write, so the reader has nothing to fall back on
    assert!(part(&bytes, "xl/worksheets/sheet1.xml").contains("<c r=\"A1\"><v>5</v></c>"));
    let cell = read.grid.cell(0, 0).unwrap();
    assert_eq!(cell.style_id, 0);
    assert_eq!(cell.value, Some(Scalar::Integer(5)));
    assert_eq!(read.report.fallbacks.get(Fallback::StyleIndex), 0);
    assert!(read.report.fallbacks.is_empty());
}
