//! The stylesheet and its two-phase builder
//!
//! A document's style tables must start with entries the container reserves:
//! font 0, fill 0 (`none`), fill 1 (`gray125`), border 0 and cell format 0.
//! [`StylesheetBuilder`] makes that ordering a type-level requirement: the
//! `add_*`/`append` operations only exist after [`reserve_defaults`].
//!
//! ```
//! use gridcodec_core::{Color, Fill, Font, Stylesheet, StyleDefinition};
//!
//! let mut builder = Stylesheet::builder()
//!     .default_font(Font::new("Calibri", 12.0))
//!     .reserve_defaults();
//! let bold = builder.add_font(Font::new("Calibri", 12.0).with_bold(true));
//! let yellow = builder.add_fill(Fill::solid(Color::rgb(0xFF, 0xFF, 0x99)));
//! let header = builder.append(StyleDefinition::new().with_font(bold).with_fill(yellow));
//! let sheet = builder.build();
//!
//! assert_eq!(header, 1);
//! assert_eq!(sheet.fills().len(), 3);
//! ```
//!
//! [`reserve_defaults`]: StylesheetBuilder::reserve_defaults

use std::marker::PhantomData;

use super::{Border, Fill, Font, NumberFormatCode, NumberFormatDef, StyleCatalog, StyleDefinition};

/// Everything serialised into the styles part: fonts, fills, borders,
/// custom number formats and the cell formats addressed by style id.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stylesheet {
    fonts: Vec<Font>,
    fills: Vec<Fill>,
    borders: Vec<Border>,
    number_formats: Vec<NumberFormatDef>,
    catalog: StyleCatalog,
}

impl Default for Stylesheet {
    /// Only the reserved entries
    fn default() -> Self {
        Self::builder().reserve_defaults().build()
    }
}

impl Stylesheet {
    /// Start building a stylesheet
    pub fn builder() -> StylesheetBuilder<Unreserved> {
        StylesheetBuilder {
            default_font: Font::default(),
            sheet: Stylesheet::empty(),
            _state: PhantomData,
        }
    }

    fn empty() -> Self {
        Self {
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            number_formats: Vec::new(),
            catalog: StyleCatalog::new(),
        }
    }

    /// Assemble a stylesheet from tables parsed out of an existing document.
    ///
    /// No reservation is applied; the tables are taken as stored.
    pub fn from_parts(
        fonts: Vec<Font>,
        fills: Vec<Fill>,
        borders: Vec<Border>,
        number_formats: Vec<NumberFormatDef>,
        cell_formats: Vec<StyleDefinition>,
    ) -> Self {
        Self {
            fonts,
            fills,
            borders,
            number_formats,
            catalog: StyleCatalog::from(cell_formats),
        }
    }

    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }

    /// Custom number formats (ids from 164)
    pub fn number_formats(&self) -> &[NumberFormatDef] {
        &self.number_formats
    }

    /// Cell formats addressed by style id
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Format code of a custom number format id
    pub fn custom_format_code(&self, number_format_id: u32) -> Option<&str> {
        self.number_formats
            .iter()
            .find(|f| f.id == number_format_id)
            .map(|f| f.code.as_str())
    }

    /// Number format class of a style id. Out-of-range ids resolve as style 0.
    pub fn number_format_code(&self, style_id: u32) -> NumberFormatCode {
        let id = self.catalog.get_or_default(style_id).number_format_id;
        NumberFormatCode::classify(id, self.custom_format_code(id))
    }
}

/// Builder state before the reserved entries are written
#[derive(Debug)]
pub struct Unreserved;

/// Builder state after the reserved entries are written
#[derive(Debug)]
pub struct Reserved;

/// Two-phase stylesheet builder; see the [module docs](self)
#[derive(Debug)]
pub struct StylesheetBuilder<State> {
    default_font: Font,
    sheet: Stylesheet,
    _state: PhantomData<State>,
}

impl StylesheetBuilder<Unreserved> {
    /// Font written at index 0 (Calibri 11 unless set)
    pub fn default_font(mut self, font: Font) -> Self {
        self.default_font = font;
        self
    }

    /// Write the reserved entries and unlock the rest of the builder
    pub fn reserve_defaults(self) -> StylesheetBuilder<Reserved> {
        let mut sheet = self.sheet;
        sheet.fonts.push(self.default_font.clone());
        sheet.fills.push(Fill::None);
        sheet.fills.push(Fill::Gray125);
        sheet.borders.push(Border::default());
        sheet.catalog.push(StyleDefinition::new());

        StylesheetBuilder {
            default_font: self.default_font,
            sheet,
            _state: PhantomData,
        }
    }
}

impl StylesheetBuilder<Reserved> {
    /// Add a font, returning its font id
    pub fn add_font(&mut self, font: Font) -> u32 {
        self.sheet.fonts.push(font);
        (self.sheet.fonts.len() - 1) as u32
    }

    /// Add a fill, returning its fill id
    pub fn add_fill(&mut self, fill: Fill) -> u32 {
        self.sheet.fills.push(fill);
        (self.sheet.fills.len() - 1) as u32
    }

    /// Add a border, returning its border id
    pub fn add_border(&mut self, border: Border) -> u32 {
        self.sheet.borders.push(border);
        (self.sheet.borders.len() - 1) as u32
    }

    /// Register a custom number format code, returning its id.
    /// Registering the same code twice returns the first id.
    pub fn add_number_format<S: Into<String>>(&mut self, code: S) -> u32 {
        let code = code.into();
        if let Some(existing) = self.sheet.number_formats.iter().find(|f| f.code == code) {
            return existing.id;
        }
        let id = self
            .sheet
            .number_formats
            .iter()
            .map(|f| f.id + 1)
            .max()
            .unwrap_or(NumberFormatDef::FIRST_CUSTOM_ID);
        self.sheet.number_formats.push(NumberFormatDef::new(id, code));
        id
    }

    /// Append a cell format, returning its style id (the catalog length before the append)
    pub fn append(&mut self, definition: StyleDefinition) -> u32 {
        self.sheet.catalog.push(definition)
    }

    /// Finish the stylesheet
    pub fn build(self) -> Stylesheet {
        self.sheet
    }
}
