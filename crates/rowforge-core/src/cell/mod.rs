//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A value plus an optional style reference, and its encoding
//! - [`CellValue`] - The value written into a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A range of cells (e.g., "A1:B10")

mod address;
mod data;
mod value;

pub use address::{CellAddress, CellRange};
pub use data::{truncate_utf16, Cell};
pub use value::{serial_date, CachedValue, CellValue};
