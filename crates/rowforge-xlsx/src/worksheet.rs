//! Forward-only worksheet writer
//!
//! A [`WorksheetCursor`] moves through `Empty -> Open -> Closed` exactly once.
//! Rows are numbered from 1 in the order they are written and can never be
//! revisited, so at most one row of cells is held in memory at a time.

use std::collections::BTreeMap;
use std::io::Write;

use rowforge_core::{
    is_xml_char, ByteBuffer, Cell, CellAddress, CellRange, Error, Result, StyleId,
    StyleRegistry, MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

use crate::options::{RowOptions, WorksheetOptions};

const WORKSHEET_PROLOGUE: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
);

/// Characters a worksheet name may not contain
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Check a worksheet name against the container format's rules
///
/// Length is counted in UTF-16 code units.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("name is empty".into()));
    }
    if name.encode_utf16().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "'{}' is longer than {} characters",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| c.is_control() || !is_xml_char(*c)) {
        return Err(Error::InvalidSheetName(format!(
            "{:?} contains control character U+{:04X}",
            name, c as u32
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "'{}' contains '{}'",
            name, c
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(Error::InvalidSheetName(format!(
            "'{}' starts or ends with an apostrophe",
            name
        )));
    }
    Ok(())
}

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Created, prologue not yet written
    Empty,
    /// Accepting rows
    Open,
    /// Closing tags written; no further writes
    Closed,
}

/// Per-worksheet write state
#[derive(Debug)]
pub struct WorksheetCursor {
    index: usize,
    next_row: u32,
    state: CursorState,
    merges: Vec<CellRange>,
    // merged ranges keyed by top-left corner, for overlap lookups
    merge_index: BTreeMap<(u32, u16), CellRange>,
    tallest_merge: u32,
    options: WorksheetOptions,
}

impl WorksheetCursor {
    /// Create a cursor for the 1-based worksheet `index`
    pub fn new(index: usize, options: WorksheetOptions) -> Self {
        Self {
            index,
            next_row: 1,
            state: CursorState::Empty,
            merges: Vec::new(),
            merge_index: BTreeMap::new(),
            tallest_merge: 0,
            options,
        }
    }

    /// 1-based worksheet index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Number the next row will get
    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    /// Merged ranges recorded so far
    pub fn merged_ranges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Write the worksheet prologue and start accepting rows
    pub fn begin<W: Write + ?Sized>(&mut self, buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
        if self.state != CursorState::Empty {
            return Err(Error::out_of_order(format!(
                "worksheet {} was already started",
                self.index
            )));
        }
        log::debug!("starting worksheet {}", self.index);

        buffer.write_str(WORKSHEET_PROLOGUE, sink)?;
        self.write_sheet_views(buffer, sink)?;
        buffer.write_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#, sink)?;
        self.write_columns(buffer, sink)?;
        buffer.write_str("<sheetData>", sink)?;

        self.state = CursorState::Open;
        self.next_row = 1;
        Ok(())
    }

    fn write_sheet_views<W: Write + ?Sized>(
        &self,
        buffer: &mut ByteBuffer,
        sink: &mut W,
    ) -> Result<()> {
        let rows = self.options.frozen_rows;
        let cols = self.options.frozen_columns;
        if rows == 0 && cols == 0 {
            return buffer.write_str(
                r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#,
                sink,
            );
        }

        let active_pane = match (rows > 0, cols > 0) {
            (true, true) => "bottomRight",
            (true, false) => "bottomLeft",
            _ => "topRight",
        };
        let top_left = CellAddress::new(rows, cols).to_a1_string();

        buffer.write_str(r#"<sheetViews><sheetView workbookViewId="0"><pane"#, sink)?;
        if cols > 0 {
            buffer.write_str(r#" xSplit=""#, sink)?;
            buffer.write_u32(cols as u32, sink)?;
            buffer.write_str("\"", sink)?;
        }
        if rows > 0 {
            buffer.write_str(r#" ySplit=""#, sink)?;
            buffer.write_u32(rows, sink)?;
            buffer.write_str("\"", sink)?;
        }
        buffer.write_str(r#" topLeftCell=""#, sink)?;
        buffer.write_str(&top_left, sink)?;
        buffer.write_str(r#"" activePane=""#, sink)?;
        buffer.write_str(active_pane, sink)?;
        buffer.write_str(r#"" state="frozen"/><selection pane=""#, sink)?;
        buffer.write_str(active_pane, sink)?;
        buffer.write_str(r#""/></sheetView></sheetViews>"#, sink)
    }

    fn write_columns<W: Write + ?Sized>(&self, buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
        if self.options.columns.is_empty() {
            return Ok(());
        }
        buffer.write_str("<cols>", sink)?;
        for (&column, options) in &self.options.columns {
            buffer.write_str(r#"<col min=""#, sink)?;
            buffer.write_u32(column as u32, sink)?;
            buffer.write_str(r#"" max=""#, sink)?;
            buffer.write_u32(column as u32, sink)?;
            buffer.write_str("\"", sink)?;
            if let Some(width) = options.width {
                buffer.write_str(r#" width=""#, sink)?;
                buffer.write_f64(width, sink)?;
                buffer.write_str(r#"" customWidth="1""#, sink)?;
            }
            if let Some(style) = options.style {
                buffer.write_str(r#" style=""#, sink)?;
                buffer.write_u32(style.index(), sink)?;
                buffer.write_str("\"", sink)?;
            }
            if options.hidden {
                buffer.write_str(r#" hidden="1""#, sink)?;
            }
            buffer.write_str("/>", sink)?;
        }
        buffer.write_str("</cols>", sink)
    }

    fn check_open(&self, operation: &str) -> Result<()> {
        match self.state {
            CursorState::Open => Ok(()),
            CursorState::Empty => Err(Error::out_of_order(format!(
                "{} before worksheet {} was started",
                operation, self.index
            ))),
            CursorState::Closed => Err(Error::out_of_order(format!(
                "{} after worksheet {} was closed",
                operation, self.index
            ))),
        }
    }

    /// Write the next row
    ///
    /// Every cell and option is validated before anything is written, so a
    /// rejected row leaves the worksheet exactly as it was.
    pub fn write_row<W: Write + ?Sized>(
        &mut self,
        cells: &[Cell<'_>],
        options: Option<&RowOptions>,
        registry: &StyleRegistry,
        buffer: &mut ByteBuffer,
        sink: &mut W,
    ) -> Result<()> {
        self.check_open("row written")?;
        if self.next_row > MAX_ROWS {
            return Err(Error::out_of_order(format!(
                "worksheet {} already holds {} rows",
                self.index, MAX_ROWS
            )));
        }
        if cells.len() > MAX_COLS as usize {
            return Err(Error::invalid_value(format!(
                "row has {} cells; at most {} are allowed",
                cells.len(),
                MAX_COLS
            )));
        }
        for cell in cells {
            cell.validate()?;
            if let Some(style) = cell.style {
                check_style(registry, style)?;
            }
        }
        if let Some(options) = options {
            options.validate()?;
            if let Some(style) = options.style {
                check_style(registry, style)?;
            }
        }

        buffer.write_str(r#"<row r=""#, sink)?;
        buffer.write_u32(self.next_row, sink)?;
        buffer.write_str("\"", sink)?;
        if let Some(options) = options {
            if let Some(style) = options.style {
                buffer.write_str(r#" s=""#, sink)?;
                buffer.write_u32(style.index(), sink)?;
                buffer.write_str(r#"" customFormat="1""#, sink)?;
            }
            if let Some(height) = options.height {
                buffer.write_str(r#" ht=""#, sink)?;
                buffer.write_f64(height, sink)?;
                buffer.write_str(r#"" customHeight="1""#, sink)?;
            }
            if options.hidden {
                buffer.write_str(r#" hidden="1""#, sink)?;
            }
        }
        if cells.is_empty() {
            buffer.write_str("/>", sink)?;
        } else {
            buffer.write_str(">", sink)?;
            for cell in cells {
                cell.encode(buffer, sink)?;
            }
            buffer.write_str("</row>", sink)?;
        }

        self.next_row += 1;
        Ok(())
    }

    /// Record a merged range, written when the worksheet is closed
    pub fn merge(&mut self, range: CellRange) -> Result<()> {
        self.check_open("cells merged")?;
        if range.is_single_cell() {
            return Err(Error::InvalidRange(format!(
                "{} covers a single cell",
                range
            )));
        }
        range.check_bounds()?;
        if let Some(existing) = self.overlapping_merge(&range) {
            return Err(Error::InvalidRange(format!(
                "{} overlaps merged range {}",
                range, existing
            )));
        }
        self.merge_index.insert((range.start.row, range.start.col), range);
        self.tallest_merge = self.tallest_merge.max(range.row_count());
        self.merges.push(range);
        Ok(())
    }

    fn overlapping_merge(&self, range: &CellRange) -> Option<&CellRange> {
        if self.tallest_merge == 0 {
            return None;
        }
        // an overlapping merge starts at most `tallest_merge - 1` rows above `range`
        let first_row = range.start.row.saturating_sub(self.tallest_merge - 1);
        self.merge_index
            .range((first_row, 0)..=(range.end.row, u16::MAX))
            .map(|(_, m)| m)
            .find(|m| m.overlaps(range))
    }

    /// Write the closing elements and flush the buffer
    pub fn end<W: Write + ?Sized>(&mut self, buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
        self.check_open("worksheet closed")?;

        buffer.write_str("</sheetData>", sink)?;
        if let Some(range) = &self.options.auto_filter {
            buffer.write_str(r#"<autoFilter ref=""#, sink)?;
            buffer.write_str(&range.to_a1_string(), sink)?;
            buffer.write_str(r#""/>"#, sink)?;
        }
        if !self.merges.is_empty() {
            buffer.write_str(r#"<mergeCells count=""#, sink)?;
            buffer.write_u32(self.merges.len() as u32, sink)?;
            buffer.write_str(r#"">"#, sink)?;
            for range in &self.merges {
                buffer.write_str(r#"<mergeCell ref=""#, sink)?;
                buffer.write_str(&range.to_a1_string(), sink)?;
                buffer.write_str(r#""/>"#, sink)?;
            }
            buffer.write_str("</mergeCells>", sink)?;
        }
        buffer.write_str("</worksheet>", sink)?;
        buffer.flush(sink)?;

        self.state = CursorState::Closed;
        log::debug!(
            "closed worksheet {} after {} rows",
            self.index,
            self.next_row - 1
        );
        Ok(())
    }
}

fn check_style(registry: &StyleRegistry, style: StyleId) -> Result<()> {
    if registry.contains(style) {
        Ok(())
    } else {
        Err(Error::invalid_value(format!(
            "style {} is not registered with this document",
            style
        )))
    }
}
