//! Prelude module - common imports for gridcodec users
//!
//! ```rust
//! use gridcodec::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    GenericCell,
    Grid,
    NaiveDate,
    NaiveDateTime,
    Decimal,
    Scalar,

    // Style types
    Border,
    BorderEdge,
    BorderLineStyle,
    Color,
    ColumnWidth,
    Fill,
    Font,
    NumberFormatDef,
    StyleDefinition,
    Stylesheet,

    // I/O types
    ReadOptions,
    ReadReport,
    SheetRead,
    XlsxError,
    XlsxReader,
    XlsxResult,
    XlsxWriter,
};
