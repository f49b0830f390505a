//! The sample sheet: a three-row header block followed by one row per
//! [`SampleRow`].
//!
//! This is the application side of the codec. It owns the stylesheet, the
//! column widths and the shape rule a sheet must satisfy to be read back as
//! sample rows; the codec itself knows nothing about any of them.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use gridcodec::prelude::*;

/// Rows before the first data row
pub const HEADER_ROWS: usize = 3;

/// Cells in a data row
pub const COLUMN_COUNT: usize = 7;

const CAPTIONS: [&str; COLUMN_COUNT] = [
    "True or False",
    "Date",
    "Decimal",
    "Double",
    "Integer",
    "Number as Text",
    "Text",
];

/// One data row of the sample sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub flag: bool,
    pub when: Option<NaiveDateTime>,
    pub amount: Option<Decimal>,
    pub ratio: f64,
    pub count: i32,
    /// Digits that must stay text, e.g. `000123`
    pub code: String,
    pub note: String,
}

impl SampleRow {
    fn to_cells(&self, styles: &SampleStyles) -> Vec<GenericCell> {
        vec![
            GenericCell::new(self.flag),
            GenericCell::from_option(self.when).with_style(styles.date),
            GenericCell::from_option(self.amount).with_style(styles.decimal),
            GenericCell::new(self.ratio).with_style(styles.decimal),
            GenericCell::new(self.count).with_style(styles.integer),
            GenericCell::new(self.code.as_str())
                .with_style(styles.text)
                .as_text(),
            GenericCell::new(self.note.as_str()),
        ]
    }

    /// Convert a data row back. Cells that do not hold the expected type
    /// give the field's default rather than an error.
    fn from_cells(cells: &[GenericCell]) -> Self {
        let value = |i: usize| cells.get(i).and_then(|c| c.value.as_ref());
        let text = |i: usize| value(i).map(Scalar::to_string).unwrap_or_default();

        Self {
            flag: value(0)
                .and_then(|v| v.as_bool().or_else(|| v.as_str().and_then(parse_bool)))
                .unwrap_or(false),
            when: value(1).and_then(Scalar::as_datetime),
            amount: value(2).and_then(|v| {
                v.as_decimal()
                    .or_else(|| v.as_str().and_then(|s| Decimal::from_str(s.trim()).ok()))
            }),
            ratio: value(3)
                .and_then(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())))
                .unwrap_or(0.0),
            count: value(4)
                .and_then(Scalar::as_i64)
                .and_then(|i| i32::try_from(i).ok())
                .unwrap_or(0),
            code: text(5),
            note: text(6),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        t if t.eq_ignore_ascii_case("true") => Some(true),
        t if t.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

impl fmt::Display for SampleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self
            .when
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let amount = self.amount.map(|d| d.to_string()).unwrap_or_default();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.flag, when, amount, self.ratio, self.count, self.code, self.note
        )
    }
}

/// The sample stylesheet and the style ids its cells use
pub struct SampleStyles {
    pub stylesheet: Stylesheet,
    run: u32,
    caption: u32,
    date: u32,
    integer: u32,
    decimal: u32,
    text: u32,
}

impl SampleStyles {
    pub fn new() -> Self {
        let mut b = Stylesheet::builder()
            .default_font(Font::new("Calibri", 12.0))
            .reserve_defaults();

        let bold = b.add_font(Font::new("Calibri", 12.0).with_bold(true));
        let yellow = b.add_fill(Fill::solid(Color::rgb(0xFF, 0xFF, 0x99)));
        let blue = b.add_fill(Fill::solid(Color::rgb(0x99, 0xCC, 0xFF)));

        let run = b.append(StyleDefinition::new().with_font(bold).with_fill(yellow));
        let caption = b.append(StyleDefinition::new().with_font(bold).with_fill(blue));
        let date = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT));
        let integer = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_INTEGER));
        let decimal =
            b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_DECIMAL_2_SEP));
        let text = b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_TEXT));

        Self {
            stylesheet: b.build(),
            run,
            caption,
            date,
            integer,
            decimal,
            text,
        }
    }
}

impl Default for SampleStyles {
    fn default() -> Self {
        Self::new()
    }
}

/// Column widths: A-B 20, C-D 15, E 10, F-G 25
pub fn column_widths() -> Vec<ColumnWidth> {
    vec![
        ColumnWidth::new(1, 2, 20.0),
        ColumnWidth::new(3, 4, 15.0),
        ColumnWidth::single(5, 10.0),
        ColumnWidth::new(6, 7, 25.0),
    ]
}

/// e.g. `TEST January 2024`
pub fn sheet_name(now: NaiveDateTime) -> String {
    format!("TEST {}", now.format("%B %Y"))
}

fn header_rows(styles: &SampleStyles, now: NaiveDateTime) -> Vec<Vec<GenericCell>> {
    vec![
        vec![GenericCell::new("Test Excel")],
        vec![GenericCell::new(format!("Run {}", now.format("%B %Y"))).with_style(styles.run)],
        CAPTIONS
            .iter()
            .map(|c| GenericCell::new(*c).with_style(styles.caption))
            .collect(),
    ]
}

/// The whole sheet: header block, then one row per sample row
pub fn build_grid(styles: &SampleStyles, rows: &[SampleRow], now: NaiveDateTime) -> Grid {
    let mut grid = Grid::with_capacity(HEADER_ROWS + rows.len());
    for row in header_rows(styles, now) {
        grid.push_row(row);
    }
    for row in rows {
        grid.push_row(row.to_cells(styles));
    }
    grid
}

/// `count` rows alternating between two templates, one day apart.
/// Every third row has no amount.
pub fn sample_rows(count: usize, now: NaiveDateTime) -> Vec<SampleRow> {
    (0..count)
        .map(|i| {
            let first = i % 2 == 0;
            SampleRow {
                flag: first,
                when: now.checked_add_signed(Duration::days(i as i64)),
                amount: (i % 3 != 2).then(|| {
                    if first {
                        Decimal::new(123_456, 3)
                    } else {
                        Decimal::new(654_321, 3)
                    }
                }),
                ratio: if first { 345.75 } else { 765.25 },
                count: if first { 9 } else { 7 },
                code: format!("{:06}", 123 + 333 * i),
                note: if first { "Hello world" } else { "Goodbye cruel world" }.to_string(),
            }
        })
        .collect()
}

/// Apply the shape rule and convert the data rows.
///
/// `None` when the sheet has no more than the header block. Rows after the
/// header that do not have exactly [`COLUMN_COUNT`] cells are skipped.
pub fn read_rows(grid: &Grid) -> Option<Vec<SampleRow>> {
    if grid.len() <= HEADER_ROWS {
        return None;
    }
    Some(
        grid.iter()
            .skip(HEADER_ROWS)
            .filter(|row| row.len() == COLUMN_COUNT)
            .map(|row| SampleRow::from_cells(row))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcodec::{build_document, open_document};
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(sheet_name(now()), "TEST January 2024");
        assert!(gridcodec::validate_sheet_name(&sheet_name(now())).is_ok());
    }

    #[test]
    fn test_grid_shape() {
        let styles = SampleStyles::new();
        let grid = build_grid(&styles, &sample_rows(4, now()), now());

        let lengths: Vec<usize> = grid.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![1, 1, 7, 7, 7, 7, 7]);
        assert_eq!(grid.cell(1, 0).unwrap().value, Some(Scalar::text("Run January 2024")));
        assert_eq!(grid.cell(2, 0).unwrap().style_id, styles.caption);
        assert!(grid.cell(3, 5).unwrap().store_as_text);
        // third data row has no amount
        assert!(grid.cell(5, 2).unwrap().is_empty());
    }

    #[test]
    fn test_sample_codes_keep_leading_zeros() {
        let codes: Vec<String> = sample_rows(3, now()).into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["000123", "000456", "000789"]);
    }

    #[test]
    fn test_round_trip_through_document() {
        let styles = SampleStyles::new();
        let rows = sample_rows(5, now());
        let grid = build_grid(&styles, &rows, now());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.xlsx");
        build_document(&path, &sheet_name(now()), &styles.stylesheet, &column_widths(), &grid)
            .unwrap();

        let read = open_document(&path).unwrap();
        assert_eq!(read.columns, column_widths());
        assert_eq!(read_rows(&read.grid), Some(rows));
    }

    #[test]
    fn test_too_few_rows_is_not_in_format() {
        let styles = SampleStyles::new();
        let grid = build_grid(&styles, &[], now());
        assert_eq!(read_rows(&grid), None);
    }

    #[test]
    fn test_rows_of_wrong_width_are_skipped() {
        let grid = Grid::from(vec![
            vec![GenericCell::new("title")],
            vec![],
            vec![],
            vec![GenericCell::new("short row")],
            vec![
                GenericCell::new("TRUE"),
                GenericCell::empty(),
                GenericCell::new("12.5"),
                GenericCell::new("not a number"),
                GenericCell::new(Decimal::new(42, 0)),
                GenericCell::new(7),
                GenericCell::new("note"),
            ],
        ]);

        assert_eq!(
            read_rows(&grid),
            Some(vec![SampleRow {
                flag: true,
                when: None,
                amount: Some(Decimal::new(125, 1)),
                ratio: 0.0,
                count: 42,
                code: "7".into(),
                note: "note".into(),
            }])
        );
    }
}
