//! Prelude module - common imports for rowforge users
//!
//! ```rust
//! use rowforge::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CachedValue,
    CancellationToken,
    Cell,
    CellRange,
    CellValue,

    // Style types
    BorderLineStyle,
    BorderStyle,
    Color,
    FillStyle,
    FontStyle,
    NumberFormat,
    Style,
    StyleId,

    // Writer types
    ColumnOptions,
    CompressionLevel,
    DocumentProperties,
    RowOptions,
    SheetVisibility,
    Spreadsheet,
    SpreadsheetOptions,
    WorksheetOptions,

    // Error types
    Error,
    XlsxError,
};
