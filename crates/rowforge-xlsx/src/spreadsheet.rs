//! Document session
//!
//! A [`Spreadsheet`] owns every piece of write state: the archive, the shared
//! byte buffer, the style registry and the cursor of the open worksheet.
//!
//! ```rust
//! use std::io::Cursor;
//! use rowforge_core::Cell;
//! use rowforge_xlsx::{Spreadsheet, SpreadsheetOptions, WorksheetOptions};
//!
//! let mut sheet = Spreadsheet::new(Cursor::new(Vec::new()), SpreadsheetOptions::default())?;
//! sheet.start_worksheet("Report", WorksheetOptions::default())?;
//! sheet.add_row(&[Cell::from("A"), Cell::from("B")])?;
//! sheet.add_row(&[Cell::from(1), Cell::from(2.5)])?;
//! sheet.end_worksheet()?;
//! let bytes = sheet.finish()?.into_inner();
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), rowforge_xlsx::XlsxError>(())
//! ```

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use rowforge_core::{
    ByteBuffer, CancellationToken, Cell, CellRange, Error, Style, StyleId, StyleRegistry,
};

use crate::archive::{Archive, CompressionLevel, CONTENT_TYPES_PART, STYLES_PART, WORKBOOK_PART};
use crate::error::{XlsxError, XlsxResult};
use crate::image::{media_part_name, EmbeddedImage, ImageFormat, ImageHeader};
use crate::options::{DocumentProperties, RowOptions, SpreadsheetOptions, WorksheetOptions};
use crate::package::{self, SheetEntry};
use crate::styles::write_styles;
use crate::worksheet::{validate_sheet_name, WorksheetCursor};

const ROOT_RELS_PART: &str = "_rels/.rels";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";
const APP_PROPERTIES_PART: &str = "docProps/app.xml";

/// Streaming XLSX document
///
/// Worksheets are written one at a time, top to bottom. Validation errors
/// reject a single call; any other error aborts the session and every later
/// call fails with [`XlsxError::SessionAborted`].
pub struct Spreadsheet<W: Write + Seek> {
    archive: Archive<W>,
    buffer: ByteBuffer,
    registry: StyleRegistry,
    compression: CompressionLevel,
    properties: DocumentProperties,
    sheets: Vec<SheetEntry>,
    cursor: Option<WorksheetCursor>,
    media: Vec<ImageFormat>,
    image_count: usize,
    poisoned: bool,
    cancel: Option<CancellationToken>,
}

impl Spreadsheet<File> {
    /// Create a document backed by a new file at `path`
    pub fn create_file<P: AsRef<Path>>(path: P, options: SpreadsheetOptions) -> XlsxResult<Self> {
        options.validate()?;
        let file = File::create(path)?;
        Self::new(file, options)
    }
}

impl<W: Write + Seek> Spreadsheet<W> {
    /// Start a document on `writer`
    pub fn new(writer: W, options: SpreadsheetOptions) -> XlsxResult<Self> {
        options.validate()?;
        let SpreadsheetOptions {
            buffer_size,
            compression_level,
            default_datetime_format,
            properties,
            cancellation,
        } = options;

        let registry = StyleRegistry::new(default_datetime_format)
            .map_err(|e| XlsxError::InvalidOptions(e.to_string()))?;
        let mut buffer = ByteBuffer::with_capacity(buffer_size)?;
        let mut archive = Archive::new(writer);
        if let Some(token) = &cancellation {
            buffer = buffer.with_cancellation(token.clone());
            archive = archive.with_cancellation(token.clone());
        }

        Ok(Self {
            archive,
            buffer,
            registry,
            compression: compression_level,
            properties,
            sheets: Vec::new(),
            cursor: None,
            media: Vec::new(),
            image_count: 0,
            poisoned: false,
            cancel: cancellation,
        })
    }

    /// Number of worksheets started so far
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether any worksheet started so far is visible
    ///
    /// [`finish`](Self::finish) fails unless this is true.
    pub fn has_visible_worksheet(&self) -> bool {
        self.sheets.iter().any(SheetEntry::is_visible)
    }

    /// Name of the open worksheet, if any
    pub fn current_worksheet(&self) -> Option<&str> {
        self.cursor
            .as_ref()
            .and_then(|c| self.sheets.get(c.index() - 1))
            .map(|s| s.name.as_str())
    }

    /// Whether an earlier error aborted the session
    pub fn is_aborted(&self) -> bool {
        self.poisoned
    }

    fn enter(&self) -> XlsxResult<()> {
        if let Some(token) = &self.cancel {
            token.check()?;
        }
        if self.poisoned {
            return Err(XlsxError::SessionAborted);
        }
        Ok(())
    }

    fn settle<T>(&mut self, result: XlsxResult<T>) -> XlsxResult<T> {
        if let Err(e) = &result {
            if !e.is_validation() && !self.poisoned {
                log::warn!("session aborted: {}", e);
                self.poisoned = true;
            }
        }
        result
    }

    /// Register a style for use in cells, rows and columns
    pub fn add_style(&mut self, style: &Style) -> XlsxResult<StyleId> {
        self.enter()?;
        let result = self.registry.register(style).map_err(XlsxError::from);
        self.settle(result)
    }

    /// Open a new worksheet called `name`
    pub fn start_worksheet(&mut self, name: &str, options: WorksheetOptions) -> XlsxResult<()> {
        self.enter()?;
        let result = self.open_worksheet(name, options);
        self.settle(result)
    }

    fn open_worksheet(&mut self, name: &str, options: WorksheetOptions) -> XlsxResult<()> {
        if let Some(cursor) = &self.cursor {
            return Err(Error::out_of_order(format!(
                "worksheet {} is still open",
                cursor.index()
            ))
            .into());
        }
        validate_sheet_name(name)?;
        let lowered = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name.to_lowercase() == lowered) {
            return Err(Error::DuplicateSheetName(name.to_string()).into());
        }
        options.validate()?;
        for column in options.columns.values() {
            if let Some(style) = column.style {
                if !self.registry.contains(style) {
                    return Err(Error::invalid_value(format!(
                        "column style {} is not registered with this document",
                        style
                    ))
                    .into());
                }
            }
        }

        let index = self.sheets.len() + 1;
        self.sheets.push(SheetEntry {
            name: name.to_string(),
            visibility: options.visibility,
            auto_filter: options.auto_filter,
        });
        self.archive
            .create_part(&package::worksheet_part_name(index), self.compression)?;

        let mut cursor = WorksheetCursor::new(index, options);
        cursor.begin(&mut self.buffer, &mut self.archive)?;
        self.cursor = Some(cursor);
        Ok(())
    }

    /// Append a row to the open worksheet
    pub fn add_row(&mut self, cells: &[Cell<'_>]) -> XlsxResult<()> {
        self.enter()?;
        let result = self.write_row(cells, None);
        self.settle(result)
    }

    /// Append a row with height, visibility or a row style
    pub fn add_row_with_options(
        &mut self,
        cells: &[Cell<'_>],
        options: &RowOptions,
    ) -> XlsxResult<()> {
        self.enter()?;
        let result = self.write_row(cells, Some(options));
        self.settle(result)
    }

    /// Append a row of text cells sharing one optional style
    pub fn add_header_row(&mut self, titles: &[&str], style: Option<StyleId>) -> XlsxResult<()> {
        let cells: Vec<Cell<'_>> = titles
            .iter()
            .map(|&title| Cell {
                style,
                ..Cell::from(title)
            })
            .collect();
        self.add_row(&cells)
    }

    fn write_row(&mut self, cells: &[Cell<'_>], options: Option<&RowOptions>) -> XlsxResult<()> {
        let cursor = self.cursor.as_mut().ok_or_else(|| no_open_worksheet("row written"))?;
        cursor.write_row(
            cells,
            options,
            &self.registry,
            &mut self.buffer,
            &mut self.archive,
        )?;
        Ok(())
    }

    /// Merge `range` in the open worksheet
    pub fn merge_cells(&mut self, range: CellRange) -> XlsxResult<()> {
        self.enter()?;
        let result = match self.cursor.as_mut() {
            Some(cursor) => cursor.merge(range).map_err(XlsxError::from),
            None => Err(no_open_worksheet("cells merged")),
        };
        self.settle(result)
    }

    /// Close the open worksheet
    pub fn end_worksheet(&mut self) -> XlsxResult<()> {
        self.enter()?;
        let result = self.close_worksheet();
        self.settle(result)
    }

    fn close_worksheet(&mut self) -> XlsxResult<()> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| no_open_worksheet("worksheet closed"))?;
        cursor.end(&mut self.buffer, &mut self.archive)?;
        self.archive.close_part()?;
        self.cursor = None;
        Ok(())
    }

    /// Copy an image stream into the package
    ///
    /// Only allowed while no worksheet is open. PNG dimensions are read from
    /// the header; other formats are stored as-is and reported as 0×0.
    pub fn embed_image<R: Read>(&mut self, mut reader: R) -> XlsxResult<EmbeddedImage> {
        self.enter()?;
        let result = self.store_image(&mut reader);
        self.settle(result)
    }

    fn store_image(&mut self, reader: &mut dyn Read) -> XlsxResult<EmbeddedImage> {
        if let Some(cursor) = &self.cursor {
            return Err(Error::out_of_order(format!(
                "image embedded while worksheet {} is open",
                cursor.index()
            ))
            .into());
        }
        let header = ImageHeader::read(reader)?;
        let part_name = media_part_name(self.image_count + 1, header.format);
        self.archive.create_part(&part_name, self.compression)?;
        let size = header.copy_with(reader, &mut self.archive)?;
        self.archive.close_part()?;

        self.image_count += 1;
        if !self.media.contains(&header.format) {
            self.media.push(header.format);
        }
        log::debug!(
            "embedded {} ({} bytes, {}x{})",
            part_name,
            size,
            header.width,
            header.height
        );
        Ok(EmbeddedImage {
            width: header.width,
            height: header.height,
            part_name,
        })
    }

    /// Write the package metadata and close the archive
    ///
    /// Returns the underlying writer positioned after the central directory.
    ///
    /// # Errors
    ///
    /// The session is consumed, so every error here is terminal, including
    /// the validation errors for an open worksheet, an empty document or a
    /// document whose worksheets are all hidden. Check
    /// [`current_worksheet`](Self::current_worksheet),
    /// [`sheet_count`](Self::sheet_count) and
    /// [`has_visible_worksheet`](Self::has_visible_worksheet) beforehand to
    /// keep the session recoverable.
    pub fn finish(mut self) -> XlsxResult<W> {
        self.enter()?;
        let result = self.write_package();
        self.settle(result)
    }

    fn write_package(&mut self) -> XlsxResult<W> {
        if let Some(cursor) = &self.cursor {
            return Err(Error::out_of_order(format!(
                "worksheet {} is still open",
                cursor.index()
            ))
            .into());
        }
        if self.sheets.is_empty() {
            return Err(XlsxError::IncompleteDocument(
                "no worksheet was written".into(),
            ));
        }
        if !self.has_visible_worksheet() {
            return Err(XlsxError::InvalidOptions(
                "at least one worksheet must be visible".into(),
            ));
        }

        let tables = self.registry.finalize()?;
        let level = self.compression;
        let sheet_count = self.sheets.len();
        let (archive, buffer) = (&mut self.archive, &mut self.buffer);

        write_part(archive, buffer, STYLES_PART, level, |b, s| {
            write_styles(&tables, b, s)
        })?;
        write_part(archive, buffer, WORKBOOK_PART, level, |b, s| {
            package::write_workbook(&self.sheets, b, s)
        })?;
        write_part(archive, buffer, WORKBOOK_RELS_PART, level, |b, s| {
            package::write_workbook_rels(sheet_count, b, s)
        })?;
        write_part(archive, buffer, ROOT_RELS_PART, level, |b, s| {
            package::write_root_rels(b, s)
        })?;
        write_part(archive, buffer, CORE_PROPERTIES_PART, level, |b, s| {
            package::write_core_properties(&self.properties, b, s)
        })?;
        write_part(archive, buffer, APP_PROPERTIES_PART, level, |b, s| {
            package::write_app_properties(&self.sheets, b, s)
        })?;
        write_part(archive, buffer, CONTENT_TYPES_PART, level, |b, s| {
            package::write_content_types(sheet_count, &self.media, b, s)
        })?;

        let writer = archive.finish()?;
        log::debug!(
            "finished document with {} worksheets and {} images",
            sheet_count,
            self.image_count
        );
        Ok(writer)
    }
}

impl<W: Write + Seek> std::fmt::Debug for Spreadsheet<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("archive", &self.archive)
            .field("sheets", &self.sheets.len())
            .field("open_worksheet", &self.cursor.as_ref().map(|c| c.index()))
            .field("styles", &self.registry.len())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

fn no_open_worksheet(operation: &str) -> XlsxError {
    Error::out_of_order(format!("{} with no open worksheet", operation)).into()
}

/// Render one whole part through the buffer and flush it
fn write_part<W, F>(
    archive: &mut Archive<W>,
    buffer: &mut ByteBuffer,
    name: &str,
    level: CompressionLevel,
    render: F,
) -> XlsxResult<()>
where
    W: Write + Seek,
    F: FnOnce(&mut ByteBuffer, &mut Archive<W>) -> rowforge_core::Result<()>,
{
    archive.create_part(name, level)?;
    render(buffer, archive)?;
    buffer.flush(archive)?;
    Ok(())
}
