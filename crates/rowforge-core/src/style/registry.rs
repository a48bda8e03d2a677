//! Style registry for deduplication and index assignment
//!
//! Spreadsheets typically have many cells sharing the same style. The registry
//! stores each distinct style once and hands out a [`StyleId`] that cells use
//! to reference it. Fonts, fills, borders and number formats are deduplicated
//! into their own sub-tables as styles are registered, so the indices written
//! into the style part are known the moment a style is registered.

use std::hash::Hash;

use ahash::AHashMap;

use super::{BorderStyle, FillStyle, FontStyle, NumberFormat, Style, StyleId};
use crate::error::{Error, Result};

/// Number format id reserved for the session's default date/time format
pub const RESERVED_DATETIME_NUM_FMT_ID: u32 = 164;

/// First id handed to a caller-supplied custom number format
pub const FIRST_CUSTOM_NUM_FMT_ID: u32 = 165;

/// Default date/time format code (sortable, locale independent)
pub const DEFAULT_DATETIME_FORMAT: &str = "yyyy\\-mm\\-dd\\ hh:mm:ss";

/// One deduplicated sub-table (fonts, fills or borders)
#[derive(Debug)]
struct SubTable<T> {
    items: Vec<T>,
    index_map: AHashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> SubTable<T> {
    fn new() -> Self {
        Self {
            items: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
        }
    }

    fn get_or_insert(&mut self, item: &T) -> u32 {
        if let Some(&idx) = self.index_map.get(item) {
            return idx;
        }
        let idx = self.items.len() as u32;
        self.index_map.insert(item.clone(), idx);
        self.items.push(item.clone());
        idx
    }

    fn take(&mut self) -> Vec<T> {
        self.index_map.clear();
        std::mem::take(&mut self.items)
    }
}

/// A custom number format and the id it was assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomNumberFormat {
    /// `numFmtId`
    pub id: u32,
    /// Format code
    pub code: String,
}

/// One entry of the composite style table (`cellXfs`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XfEntry {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
}

impl XfEntry {
    /// Whether `applyNumberFormat` is set
    pub fn apply_number_format(&self) -> bool {
        self.num_fmt_id > 0
    }

    /// Whether `applyFont` is set
    pub fn apply_font(&self) -> bool {
        self.font_id > 0
    }

    /// Whether `applyFill` is set. Fills 0 and 1 are the reserved placeholders.
    pub fn apply_fill(&self) -> bool {
        self.fill_id > 1
    }

    /// Whether `applyBorder` is set
    pub fn apply_border(&self) -> bool {
        self.border_id > 0
    }
}

/// Finalized tables, ready to be rendered into the style part
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTables {
    /// Non-predefined number formats, ascending by id
    pub number_formats: Vec<CustomNumberFormat>,
    /// Fonts; index 0 is the default font
    pub fonts: Vec<FontStyle>,
    /// Fills; index 0 is "none", index 1 is "gray125"
    pub fills: Vec<FillStyle>,
    /// Borders; index 0 is the empty border
    pub borders: Vec<BorderStyle>,
    /// Composite styles, indexed by [`StyleId`]
    pub cell_xfs: Vec<XfEntry>,
}

/// Registry of every style used by a document
#[derive(Debug)]
pub struct StyleRegistry {
    styles: AHashMap<Style, StyleId>,
    cell_xfs: Vec<XfEntry>,
    fonts: SubTable<FontStyle>,
    fills: SubTable<FillStyle>,
    borders: SubTable<BorderStyle>,
    custom_formats: AHashMap<String, u32>,
    number_formats: Vec<CustomNumberFormat>,
    next_num_fmt_id: u32,
    frozen: bool,
}

impl StyleRegistry {
    /// Create a registry whose default date/time style uses `datetime_format`
    pub fn new<S: Into<String>>(datetime_format: S) -> Result<Self> {
        let datetime_format = datetime_format.into();
        if datetime_format.is_empty() {
            return Err(Error::InvalidStyle(
                "default date/time format code is empty".into(),
            ));
        }
        Ok(Self::with_datetime_format(datetime_format))
    }

    fn with_datetime_format(datetime_format: String) -> Self {
        let mut registry = Self {
            styles: AHashMap::with_capacity(64),
            cell_xfs: Vec::with_capacity(64),
            fonts: SubTable::new(),
            fills: SubTable::new(),
            borders: SubTable::new(),
            custom_formats: AHashMap::new(),
            number_formats: Vec::new(),
            next_num_fmt_id: FIRST_CUSTOM_NUM_FMT_ID,
            frozen: false,
        };

        let default_style = Style::default();
        registry.fonts.get_or_insert(&default_style.font);
        registry.fills.get_or_insert(&FillStyle::None);
        registry.fills.get_or_insert(&FillStyle::gray125());
        registry.borders.get_or_insert(&default_style.border);

        registry
            .custom_formats
            .insert(datetime_format.clone(), RESERVED_DATETIME_NUM_FMT_ID);
        registry.number_formats.push(CustomNumberFormat {
            id: RESERVED_DATETIME_NUM_FMT_ID,
            code: datetime_format.clone(),
        });

        registry.cell_xfs.push(XfEntry::default());
        registry.cell_xfs.push(XfEntry {
            num_fmt_id: RESERVED_DATETIME_NUM_FMT_ID,
            ..XfEntry::default()
        });
        let datetime_style = default_style
            .clone()
            .with_number_format(NumberFormat::Custom(datetime_format));
        registry.styles.insert(default_style, StyleId::DEFAULT);
        registry.styles.insert(datetime_style, StyleId::DATETIME);
        registry
    }

    /// Register a style, returning its id
    ///
    /// Registering a style equal to one registered before returns the same id.
    pub fn register(&mut self, style: &Style) -> Result<StyleId> {
        if self.frozen {
            return Err(Error::RegistryFrozen);
        }
        if let Some(&id) = self.styles.get(style) {
            return Ok(id);
        }
        style.validate()?;

        let entry = XfEntry {
            num_fmt_id: self.number_format_id(&style.number_format),
            font_id: self.fonts.get_or_insert(&style.font),
            fill_id: self.fills.get_or_insert(&style.fill),
            border_id: self.borders.get_or_insert(&style.border),
        };
        let id = StyleId(self.cell_xfs.len() as u32);
        self.cell_xfs.push(entry);
        self.styles.insert(style.clone(), id);
        Ok(id)
    }

    fn number_format_id(&mut self, format: &NumberFormat) -> u32 {
        match format {
            NumberFormat::General => NumberFormat::ID_GENERAL,
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom(code) => {
                if let Some(&id) = self.custom_formats.get(code) {
                    return id;
                }
                let id = self.next_num_fmt_id;
                self.next_num_fmt_id += 1;
                self.custom_formats.insert(code.clone(), id);
                self.number_formats.push(CustomNumberFormat {
                    id,
                    code: code.clone(),
                });
                id
            }
        }
    }

    /// Whether `id` names a style in this registry
    pub fn contains(&self, id: StyleId) -> bool {
        (id.0 as usize) < self.cell_xfs.len()
    }

    /// Composite entry for a style
    pub fn entry(&self, id: StyleId) -> Option<&XfEntry> {
        self.cell_xfs.get(id.0 as usize)
    }

    /// Number of composite styles, including the two reserved slots
    pub fn len(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Always false; the reserved slots are present from construction
    pub fn is_empty(&self) -> bool {
        self.cell_xfs.is_empty()
    }

    /// Whether [`finalize`](Self::finalize) has been called
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze the registry and hand over its tables
    ///
    /// May be called once; afterwards both `finalize` and `register` fail
    /// with [`Error::RegistryFrozen`].
    pub fn finalize(&mut self) -> Result<MetadataTables> {
        if self.frozen {
            return Err(Error::RegistryFrozen);
        }
        self.frozen = true;

        let tables = MetadataTables {
            number_formats: std::mem::take(&mut self.number_formats),
            fonts: self.fonts.take(),
            fills: self.fills.take(),
            borders: self.borders.take(),
            cell_xfs: self.cell_xfs.clone(),
        };
        self.custom_formats.clear();
        log::debug!(
            "style registry finalized: {} styles, {} fonts, {} fills, {} borders, {} number formats",
            tables.cell_xfs.len(),
            tables.fonts.len(),
            tables.fills.len(),
            tables.borders.len(),
            tables.number_formats.len()
        );
        Ok(tables)
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::with_datetime_format(DEFAULT_DATETIME_FORMAT.to_string())
    }
}
