//! # gridcodec-xlsx
//!
//! Reads and writes a single-sheet XLSX document as a [`Grid`] of typed cells.
//!
//! The [`codec`] module holds the per-cell rules: [`encode`] decides how a
//! value is stored, [`decode`] infers a typed value from stored text and the
//! cell's number format. [`XlsxWriter`] and [`XlsxReader`] apply them to a
//! whole sheet and handle the package parts around it.
//!
//! [`Grid`]: gridcodec_core::Grid

pub mod codec;
pub mod error;
pub mod options;
pub mod reader;
pub mod report;
pub mod shared_strings;
pub mod writer;

mod atomic;
mod escape;
mod styles;

pub use codec::{decode, encode, DecodeContext, Decoded, Encoded, Fallback, StorageType};
pub use error::{XlsxError, XlsxResult};
pub use options::{ReadOptions, SheetSelector};
pub use reader::{SheetRead, XlsxReader};
pub use report::{FallbackCounts, ReadReport};
pub use shared_strings::SharedStringTable;
pub use writer::{validate_sheet_name, XlsxWriter};
