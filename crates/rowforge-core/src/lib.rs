//! # rowforge-core
//!
//! Core building blocks for the rowforge streaming spreadsheet writer.
//!
//! This crate provides the format-level pieces every writer needs:
//! - [`ByteBuffer`] - Fixed-capacity buffer all XML passes through
//! - [`Style`] and [`StyleRegistry`] - Cell formatting and its deduplicated tables
//! - [`Cell`] and [`CellValue`] - Typed cell values and their XML encoding
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`CancellationToken`] - Cooperative cancellation of a write
//!
//! ## Example
//!
//! ```rust
//! use rowforge_core::{ByteBuffer, Cell, Style, StyleRegistry};
//!
//! let mut registry = StyleRegistry::default();
//! let bold = registry.register(&Style::new().bold(true)).unwrap();
//!
//! let mut buffer = ByteBuffer::with_capacity(1024).unwrap();
//! let mut out = Vec::new();
//! Cell::styled("Total", bold).encode(&mut buffer, &mut out).unwrap();
//! buffer.flush(&mut out).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"<c s="2" t="inlineStr"><is><t>Total</t></is></c>"#
//! );
//! ```

pub mod buffer;
pub mod cancel;
pub mod cell;
pub mod error;
pub mod style;

// Re-exports for convenience
pub use buffer::{is_xml_char, ByteBuffer};
pub use cancel::CancellationToken;
pub use cell::{CachedValue, Cell, CellAddress, CellRange, CellValue};
pub use error::{Error, Result};

// Re-export all style types for convenience
pub use style::{
    BorderEdge, BorderLineStyle, BorderStyle, Color, DiagonalDirection, FillStyle, FontStyle,
    MetadataTables, NumberFormat, PatternType, Style, StyleId, StyleRegistry, Underline, XfEntry,
};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
