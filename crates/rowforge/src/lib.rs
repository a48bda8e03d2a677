//! # rowforge
//!
//! A streaming spreadsheet writer. Rows are encoded into the XLSX archive as
//! they are added, through one fixed-size buffer, so a document of any
//! length is written in constant memory.
//!
//! ## Features
//!
//! - Forward-only worksheets with typed cells (text, numbers, booleans,
//!   dates, formulas)
//! - Deduplicated styles: fonts, fills, borders and number formats
//! - Merged cells, frozen panes, column widths, auto filters
//! - PNG/opaque image embedding
//! - Cooperative cancellation
//!
//! ## Example
//!
//! ```rust
//! use rowforge::prelude::*;
//! use std::io::Cursor;
//!
//! let mut doc = Spreadsheet::new(Cursor::new(Vec::new()), SpreadsheetOptions::default())?;
//! let bold = doc.add_style(&Style::new().bold(true))?;
//!
//! doc.start_worksheet("Sales", WorksheetOptions::new().with_frozen_panes(1, 0))?;
//! doc.add_header_row(&["Region", "Units"], Some(bold))?;
//! doc.add_row(&[Cell::from("North"), Cell::from(1200)])?;
//! doc.add_row(&[Cell::from("South"), Cell::from(875)])?;
//! doc.end_worksheet()?;
//!
//! let bytes = doc.finish()?.into_inner();
//! assert!(!bytes.is_empty());
//! # Ok::<(), rowforge::XlsxError>(())
//! ```

pub mod prelude;

// Re-export core types
pub use rowforge_core::{
    // Buffer and cancellation
    ByteBuffer,
    CancellationToken,

    // Cell types
    CachedValue,
    Cell,
    CellAddress,
    CellRange,
    CellValue,

    // Error types
    Error,
    Result,

    // Style types
    BorderEdge,
    BorderLineStyle,
    BorderStyle,
    Color,
    DiagonalDirection,
    FillStyle,
    FontStyle,
    NumberFormat,
    PatternType,
    Style,
    StyleId,
    StyleRegistry,
    Underline,

    // Constants
    MAX_COLS,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export writer types
pub use rowforge_xlsx::{
    ColumnOptions, CompressionLevel, DocumentProperties, EmbeddedImage, RowOptions,
    SheetVisibility, Spreadsheet, SpreadsheetOptions, WorksheetOptions, XlsxError, XlsxResult,
};

pub use rowforge_core as core;
pub use rowforge_xlsx as xlsx;
