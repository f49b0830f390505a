//! Cell-related types
//!
//! This module contains:
//! - [`Scalar`] - The typed value stored in a cell
//! - [`GenericCell`] - A value plus its style id and "store as text" hint
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod generic;
mod value;

pub use address::CellAddress;
pub use generic::GenericCell;
pub use value::Scalar;
