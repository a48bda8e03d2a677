//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - Complete cell style
//! - [`FontStyle`] - Font settings
//! - [`FillStyle`] - Background fill
//! - [`BorderStyle`] - Cell borders
//! - [`NumberFormat`] - Number display format
//! - [`Color`] - Color representation
//!
//! Styles are registered with a [`StyleRegistry`], which hands back a
//! [`StyleId`] for cells to reference.

mod border;
mod color;
mod fill;
mod font;
mod number_format;
pub mod registry;

pub use border::{BorderEdge, BorderLineStyle, BorderStyle, DiagonalDirection};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontStyle, Underline, MAX_FONT_NAME_LEN, MAX_FONT_SIZE};
pub use number_format::{builtin_format_code, NumberFormat};
pub use registry::{CustomNumberFormat, MetadataTables, StyleRegistry, XfEntry};

use crate::error::Result;

/// Complete cell style
///
/// Two styles are the same style when all four parts are equal, so
/// registering an equal style twice yields the same [`StyleId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Border settings
    pub border: BorderStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Font settings
    pub font: FontStyle,
    /// Number format
    pub number_format: NumberFormat,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font.name = name.into();
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Replace the font
    pub fn with_font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Replace the fill
    pub fn with_fill(mut self, fill: FillStyle) -> Self {
        self.fill = fill;
        self
    }

    /// Replace the border
    pub fn with_border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set number format string
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = NumberFormat::Custom(format.into());
        self
    }

    /// Replace the number format
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.font.validate()?;
        self.number_format.validate()
    }
}

/// Handle to a registered style
///
/// Only a [`StyleRegistry`] hands these out; the value is the style's index in
/// the composite style table and stays fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub(crate) u32);

impl StyleId {
    /// The implicit default style (slot 0)
    pub const DEFAULT: StyleId = StyleId(0);

    /// The implicit default date/time style (slot 1)
    pub const DATETIME: StyleId = StyleId(1);

    /// Index in the composite style table
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
