//! # gridcodec
//!
//! Typed cell grids to and from single-sheet XLSX documents.
//!
//! A [`Grid`] is an ordered list of rows of [`GenericCell`]s. Writing
//! classifies each value by its text and stores it as a boolean, date,
//! number or shared string; reading infers the value back from the stored
//! type and the number format of the cell's style.
//!
//! ## Example
//!
//! ```rust
//! use gridcodec::prelude::*;
//!
//! let mut builder = Stylesheet::builder().reserve_defaults();
//! let date = builder.append(
//!     StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT),
//! );
//! let stylesheet = builder.build();
//!
//! let grid = Grid::from(vec![
//!     vec![GenericCell::new("Name"), GenericCell::new("Joined")],
//!     vec![
//!         GenericCell::new("Ada"),
//!         GenericCell::new(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).with_style(date),
//!     ],
//! ]);
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("people.xlsx");
//! gridcodec::build_document(&path, "People", &stylesheet, &[], &grid).unwrap();
//!
//! let read = gridcodec::open_document(&path).unwrap();
//! assert_eq!(read.grid.cell(1, 0).unwrap().value, Some(Scalar::text("Ada")));
//! assert_eq!(read.report.summary(), "2 rows read from sheet 'People'");
//! ```

pub mod prelude;

pub use gridcodec_core::{
    Border, BorderEdge, BorderLineStyle, CellAddress, Color, ColumnWidth, DateSystem, Decimal,
    Error, Fill, Font, GenericCell, Grid, NaiveDate, NaiveDateTime, NumberFormatCode,
    NumberFormatDef, PatternType, Reserved, Result, Scalar, StyleCatalog, StyleDefinition,
    Stylesheet, StylesheetBuilder, Unreserved, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

pub use gridcodec_xlsx::{
    codec, decode, encode, validate_sheet_name, DecodeContext, Decoded, Encoded, Fallback,
    FallbackCounts, ReadOptions, ReadReport, SharedStringTable, SheetRead, SheetSelector,
    StorageType, XlsxError, XlsxReader, XlsxResult, XlsxWriter,
};

use std::path::Path;

/// Write `grid` as the only sheet of the document at `path`.
///
/// The file at `path` is replaced only once the whole document has been
/// written; if anything fails it is left as it was.
pub fn build_document<P: AsRef<Path>>(
    path: P,
    sheet_name: &str,
    stylesheet: &Stylesheet,
    columns: &[ColumnWidth],
    grid: &Grid,
) -> XlsxResult<()> {
    XlsxWriter::write_file(path, sheet_name, stylesheet, columns, grid)
}

/// Read the first sheet of the document at `path`
pub fn open_document<P: AsRef<Path>>(path: P) -> XlsxResult<SheetRead> {
    open_document_with(path, &ReadOptions::default())
}

/// Read the sheet chosen by `options` from the document at `path`
pub fn open_document_with<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> XlsxResult<SheetRead> {
    XlsxReader::read_file_with(path, options)
}
