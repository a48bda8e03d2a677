//! # rowforge-xlsx
//!
//! Forward-only XLSX (Office Open XML) writer for rowforge.
//!
//! Rows are encoded straight into the archive as they are added, so memory
//! use does not grow with the size of the document. See [`Spreadsheet`] for
//! the session API.

pub mod archive;
pub mod error;
pub mod image;
pub mod options;
pub mod spreadsheet;
pub mod styles;
pub mod worksheet;

mod package;

pub use archive::{Archive, CompressionLevel};
pub use error::{XlsxError, XlsxResult};
pub use image::{EmbeddedImage, ImageFormat};
pub use options::{
    ColumnOptions, DocumentProperties, RowOptions, SheetVisibility, SpreadsheetOptions,
    WorksheetOptions,
};
pub use spreadsheet::Spreadsheet;
pub use worksheet::{validate_sheet_name, CursorState, WorksheetCursor};
