//! # gridcodec-core
//!
//! Core data structures for the gridcodec spreadsheet codec.
//!
//! This crate provides the types shared by every layer of gridcodec:
//! - [`Scalar`] - A typed cell value (boolean, number, date-time, text)
//! - [`GenericCell`] and [`Grid`] - The loosely-typed cell grid exchanged with callers
//! - [`CellAddress`] - A1-style cell addressing
//! - [`Stylesheet`] and [`StyleCatalog`] - Fonts, fills, borders, number formats and
//!   the cell formats addressed by style id
//! - [`DateSystem`] - Serial day numbers <-> date-times
//!
//! ## Example
//!
//! ```rust
//! use gridcodec_core::{GenericCell, Grid, NumberFormatDef, StyleDefinition, Stylesheet};
//!
//! let mut builder = Stylesheet::builder().reserve_defaults();
//! let date_style = builder.append(
//!     StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT),
//! );
//! let stylesheet = builder.build();
//!
//! let mut grid = Grid::new();
//! grid.push_row(vec![
//!     GenericCell::new("Hello"),
//!     GenericCell::new(42).with_style(date_style),
//!     GenericCell::new("000123").as_text(),
//! ]);
//!
//! assert_eq!(stylesheet.catalog().len(), 2);
//! assert_eq!(grid.cell_count(), 3);
//! ```

pub mod cell;
pub mod column;
pub mod date;
pub mod error;
pub mod grid;
pub mod style;

// Re-exports for convenience
pub use cell::{CellAddress, GenericCell, Scalar};
pub use column::ColumnWidth;
pub use date::DateSystem;
pub use error::{Error, Result};
pub use grid::Grid;

// Re-export all style types for convenience
pub use style::{
    Border, BorderEdge, BorderLineStyle, Color, Fill, Font, NumberFormatCode, NumberFormatDef,
    PatternType, Reserved, StyleCatalog, StyleDefinition, Stylesheet, StylesheetBuilder,
    Unreserved,
};

// Re-export the numeric/date types that appear in `Scalar`
pub use chrono::{NaiveDate, NaiveDateTime};
pub use rust_decimal::Decimal;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
