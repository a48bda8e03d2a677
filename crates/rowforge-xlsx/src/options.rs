//! Session, worksheet and row options

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rowforge_core::style::registry::DEFAULT_DATETIME_FORMAT;
use rowforge_core::{CancellationToken, CellRange, Error, Result, StyleId, MAX_COLS, MAX_ROWS};

use crate::archive::CompressionLevel;
use crate::error::{XlsxError, XlsxResult};

/// Default size of the session byte buffer
pub const DEFAULT_BUFFER_SIZE: usize = 65_536;

/// Smallest accepted session byte buffer
pub const MIN_BUFFER_SIZE: usize = 1_024;

/// Widest column the container format accepts, in characters
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Tallest row the container format accepts, in points
pub const MAX_ROW_HEIGHT: f64 = 409.0;

/// Options for a whole document
#[derive(Debug, Clone)]
pub struct SpreadsheetOptions {
    /// Size of the byte buffer shared by every part
    pub buffer_size: usize,
    /// Compression applied to every part
    pub compression_level: CompressionLevel,
    /// Format code of the implicit date/time style
    pub default_datetime_format: String,
    /// Document properties written to `docProps/core.xml`
    pub properties: DocumentProperties,
    /// Token checked at every flush, every part close and every call
    pub cancellation: Option<CancellationToken>,
}

impl Default for SpreadsheetOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            compression_level: CompressionLevel::default(),
            default_datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            properties: DocumentProperties::default(),
            cancellation: None,
        }
    }
}

impl SpreadsheetOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte buffer size
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the compression level
    pub fn with_compression_level(mut self, level: CompressionLevel) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the format code of the implicit date/time style
    pub fn with_default_datetime_format<S: Into<String>>(mut self, format: S) -> Self {
        self.default_datetime_format = format.into();
        self
    }

    /// Set the document properties
    pub fn with_properties(mut self, properties: DocumentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn validate(&self) -> XlsxResult<()> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(XlsxError::InvalidOptions(format!(
                "buffer size {} is below the minimum of {}",
                self.buffer_size, MIN_BUFFER_SIZE
            )));
        }
        if self.default_datetime_format.is_empty() {
            return Err(XlsxError::InvalidOptions(
                "default date/time format is empty".into(),
            ));
        }
        Ok(())
    }
}

/// Document properties
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    /// Creation timestamp; also written as the modification timestamp
    pub created: DateTime<Utc>,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            title: None,
            subject: None,
            author: None,
            keywords: None,
            description: None,
            created: Utc::now(),
        }
    }
}

impl DocumentProperties {
    /// Create properties stamped with the current time
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: S) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

/// Worksheet visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetVisibility {
    /// Sheet is visible
    #[default]
    Visible,
    /// Sheet is hidden but can be unhidden by the user
    Hidden,
    /// Sheet can only be unhidden programmatically
    VeryHidden,
}

impl SheetVisibility {
    pub(crate) fn state_attr(self) -> Option<&'static str> {
        match self {
            SheetVisibility::Visible => None,
            SheetVisibility::Hidden => Some("hidden"),
            SheetVisibility::VeryHidden => Some("veryHidden"),
        }
    }
}

/// Options for one column
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnOptions {
    /// Width in characters
    pub width: Option<f64>,
    /// Column is hidden
    pub hidden: bool,
    /// Default style of the column's empty cells
    pub style: Option<StyleId>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }
}

/// Options for one worksheet
#[derive(Debug, Clone, Default)]
pub struct WorksheetOptions {
    /// Column settings keyed by 1-based column number
    pub columns: BTreeMap<u16, ColumnOptions>,
    /// Number of rows frozen at the top
    pub frozen_rows: u32,
    /// Number of columns frozen at the left
    pub frozen_columns: u16,
    /// Range the auto filter applies to
    pub auto_filter: Option<CellRange>,
    /// Sheet visibility
    pub visibility: SheetVisibility,
}

impl WorksheetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set options for the 1-based column `column`
    pub fn with_column(mut self, column: u16, options: ColumnOptions) -> Self {
        self.columns.insert(column, options);
        self
    }

    /// Set the width of the 1-based column `column`
    pub fn with_column_width(mut self, column: u16, width: f64) -> Self {
        self.columns.entry(column).or_default().width = Some(width);
        self
    }

    /// Freeze the top `rows` rows and left `columns` columns
    pub fn with_frozen_panes(mut self, rows: u32, columns: u16) -> Self {
        self.frozen_rows = rows;
        self.frozen_columns = columns;
        self
    }

    pub fn with_auto_filter(mut self, range: CellRange) -> Self {
        self.auto_filter = Some(range);
        self
    }

    pub fn with_visibility(mut self, visibility: SheetVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (&column, options) in &self.columns {
            if column == 0 || column > MAX_COLS {
                return Err(Error::invalid_value(format!(
                    "column number {} must be between 1 and {}",
                    column, MAX_COLS
                )));
            }
            if let Some(width) = options.width {
                if !(width > 0.0 && width <= MAX_COLUMN_WIDTH) {
                    return Err(Error::invalid_value(format!(
                        "column width {} must be greater than 0 and at most {}",
                        width, MAX_COLUMN_WIDTH
                    )));
                }
            }
        }
        if self.frozen_rows >= MAX_ROWS {
            return Err(Error::invalid_value(format!(
                "cannot freeze {} rows",
                self.frozen_rows
            )));
        }
        if self.frozen_columns >= MAX_COLS {
            return Err(Error::invalid_value(format!(
                "cannot freeze {} columns",
                self.frozen_columns
            )));
        }
        if let Some(range) = &self.auto_filter {
            range.check_bounds()?;
        }
        Ok(())
    }
}

/// Options for one row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowOptions {
    /// Height in points
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
    /// Default style of the row's empty cells
    pub style: Option<StyleId>,
}

impl RowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(height) = self.height {
            if !(height > 0.0 && height <= MAX_ROW_HEIGHT) {
                return Err(Error::invalid_value(format!(
                    "row height {} must be greater than 0 and at most {}",
                    height, MAX_ROW_HEIGHT
                )));
            }
        }
        Ok(())
    }
}
