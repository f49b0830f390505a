//! Stylesheet model
//!
//! This module contains the tables of a document's styles part:
//! - [`Font`], [`Fill`], [`Border`] - Formatting building blocks
//! - [`NumberFormatDef`] / [`NumberFormatCode`] - Number formats and their class
//! - [`StyleCatalog`] - Cell formats addressed by style id
//! - [`Stylesheet`] - All of the above, built with [`StylesheetBuilder`]

mod border;
mod catalog;
mod color;
mod fill;
mod font;
mod number_format;
mod stylesheet;

pub use border::{Border, BorderEdge, BorderLineStyle};
pub use catalog::{StyleCatalog, StyleDefinition};
pub use color::Color;
pub use fill::{Fill, PatternType};
pub use font::Font;
pub use number_format::{NumberFormatCode, NumberFormatDef};
pub use stylesheet::{Reserved, Stylesheet, StylesheetBuilder, Unreserved};
