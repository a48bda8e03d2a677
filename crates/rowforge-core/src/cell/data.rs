//! A cell ready to be written, and its XML encoding

use std::borrow::Cow;
use std::io::Write;

use super::value::{formula_body, serial_date, CachedValue, CellValue};
use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::style::StyleId;

/// A cell value plus an optional style reference
///
/// Cells carry no column position; a row's cells are written left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell<'a> {
    /// The cell value
    pub value: CellValue<'a>,
    /// Style reference; `None` leaves the cell on the default style
    pub style: Option<StyleId>,
}

impl<'a> Cell<'a> {
    /// Create an unstyled cell
    pub fn new<V: Into<CellValue<'a>>>(value: V) -> Self {
        Self {
            value: value.into(),
            style: None,
        }
    }

    /// Create a styled cell
    pub fn styled<V: Into<CellValue<'a>>>(value: V, style: StyleId) -> Self {
        Self {
            value: value.into(),
            style: Some(style),
        }
    }

    /// Create an empty cell, keeping its column position
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a formula cell
    pub fn formula<S: Into<Cow<'a, str>>>(text: S) -> Self {
        Self::new(CellValue::formula(text))
    }

    /// Create a formula cell with a cached result
    pub fn formula_with_cached<S: Into<Cow<'a, str>>>(text: S, cached: CachedValue<'a>) -> Self {
        Self::new(CellValue::Formula {
            text: text.into(),
            cached: Some(cached),
        })
    }

    /// Create a string cell holding at most `max_len` UTF-16 code units of `text`
    ///
    /// A surrogate pair is never split: a character that would straddle the
    /// limit is dropped entirely.
    pub fn truncated_string(text: &'a str, max_len: usize) -> Result<Self> {
        Ok(Self::new(CellValue::String(Cow::Borrowed(truncate_utf16(
            text, max_len,
        )?))))
    }

    /// Attach a style
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }

    /// Check that the cell can be encoded
    pub fn validate(&self) -> Result<()> {
        self.value.validate()
    }

    /// Style written into the `s` attribute
    ///
    /// Unstyled date/time cells use the implicit default date/time style.
    pub fn effective_style(&self) -> Option<StyleId> {
        match (self.style, &self.value) {
            (Some(style), _) => Some(style),
            (None, CellValue::DateTime(_)) => Some(StyleId::DATETIME),
            (None, _) => None,
        }
    }

    /// Write the `<c>` element for this cell
    ///
    /// The value is validated first, so nothing is written for a cell that
    /// fails validation.
    pub fn encode<W: Write + ?Sized>(&self, buffer: &mut ByteBuffer, sink: &mut W) -> Result<()> {
        self.validate()?;

        let type_attr = match &self.value {
            CellValue::String(_) => Some("inlineStr"),
            CellValue::Boolean(_) => Some("b"),
            CellValue::Formula {
                cached: Some(CachedValue::String(_)),
                ..
            } => Some("str"),
            CellValue::Formula {
                cached: Some(CachedValue::Boolean(_)),
                ..
            } => Some("b"),
            _ => None,
        };

        buffer.write_str("<c", sink)?;
        if let Some(style) = self.effective_style() {
            buffer.write_str(" s=\"", sink)?;
            buffer.write_u32(style.index(), sink)?;
            buffer.write_str("\"", sink)?;
        }
        if let Some(t) = type_attr {
            buffer.write_str(" t=\"", sink)?;
            buffer.write_str(t, sink)?;
            buffer.write_str("\"", sink)?;
        }

        match &self.value {
            CellValue::Empty => buffer.write_str("/>", sink),
            CellValue::String(text) => {
                if needs_space_preserve(text) {
                    buffer.write_str("><is><t xml:space=\"preserve\">", sink)?;
                } else {
                    buffer.write_str("><is><t>", sink)?;
                }
                buffer.write_escaped(text, sink)?;
                buffer.write_str("</t></is></c>", sink)
            }
            CellValue::Number(n) => {
                buffer.write_str("><v>", sink)?;
                buffer.write_f64(*n, sink)?;
                buffer.write_str("</v></c>", sink)
            }
            CellValue::Integer(i) => {
                buffer.write_str("><v>", sink)?;
                buffer.write_i64(*i, sink)?;
                buffer.write_str("</v></c>", sink)
            }
            CellValue::Boolean(b) => {
                buffer.write_str(if *b { "><v>1</v></c>" } else { "><v>0</v></c>" }, sink)
            }
            CellValue::DateTime(dt) => {
                buffer.write_str("><v>", sink)?;
                buffer.write_f64(serial_date(dt)?, sink)?;
                buffer.write_str("</v></c>", sink)
            }
            CellValue::Formula { text, cached } => {
                buffer.write_str("><f>", sink)?;
                buffer.write_escaped(formula_body(text), sink)?;
                buffer.write_str("</f>", sink)?;
                match cached {
                    Some(CachedValue::Number(n)) => {
                        buffer.write_str("<v>", sink)?;
                        buffer.write_f64(*n, sink)?;
                        buffer.write_str("</v>", sink)?;
                    }
                    Some(CachedValue::String(s)) => {
                        buffer.write_str("<v>", sink)?;
                        buffer.write_escaped(s, sink)?;
                        buffer.write_str("</v>", sink)?;
                    }
                    Some(CachedValue::Boolean(b)) => {
                        buffer.write_str(if *b { "<v>1</v>" } else { "<v>0</v>" }, sink)?;
                    }
                    None => {}
                }
                buffer.write_str("</c>", sink)
            }
        }
    }
}

macro_rules! cell_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl<'a> From<$t> for Cell<'a> {
                fn from(value: $t) -> Self {
                    Cell::new(value)
                }
            }
        )*
    };
}

cell_from!(
    CellValue<'a>,
    &'a str,
    String,
    Cow<'a, str>,
    f64,
    f32,
    i64,
    i32,
    u32,
    bool,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
);

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn needs_space_preserve(text: &str) -> bool {
    text.starts_with(is_xml_space) || text.ends_with(is_xml_space)
}

/// Longest prefix of `text` that fits in `max_len` UTF-16 code units
pub fn truncate_utf16(text: &str, max_len: usize) -> Result<&str> {
    if max_len == 0 {
        return Err(Error::invalid_value("truncation length must be at least 1"));
    }
    let mut units = 0;
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max_len {
            return Ok(&text[..idx]);
        }
    }
    Ok(text)
}
