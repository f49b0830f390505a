//! Cell formats addressed by style id

use crate::error::{Error, Result};

/// One cell format (`<xf>` in `cellXfs`). Every field indexes a stylesheet table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleDefinition {
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    pub number_format_id: u32,
}

static EMPTY_DEFINITION: StyleDefinition = StyleDefinition {
    font_id: 0,
    fill_id: 0,
    border_id: 0,
    number_format_id: 0,
};

impl StyleDefinition {
    /// All-zero definition
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font_id: u32) -> Self {
        self.font_id = font_id;
        self
    }

    pub fn with_fill(mut self, fill_id: u32) -> Self {
        self.fill_id = fill_id;
        self
    }

    pub fn with_border(mut self, border_id: u32) -> Self {
        self.border_id = border_id;
        self
    }

    pub fn with_number_format(mut self, number_format_id: u32) -> Self {
        self.number_format_id = number_format_id;
        self
    }
}

/// Ordered, append-only list of cell formats. A cell's `style_id` is an
/// index into it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleCatalog {
    definitions: Vec<StyleDefinition>,
}

impl StyleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition and return its style id
    pub(crate) fn push(&mut self, definition: StyleDefinition) -> u32 {
        let id = self.definitions.len() as u32;
        self.definitions.push(definition);
        id
    }

    /// Look up a style id
    pub fn get(&self, id: u32) -> Result<&StyleDefinition> {
        self.definitions
            .get(id as usize)
            .ok_or(Error::StyleOutOfRange {
                id,
                len: self.definitions.len(),
            })
    }

    /// Look up a style id, falling back to style 0 (or an all-zero
    /// definition when the catalog is empty)
    pub fn get_or_default(&self, id: u32) -> &StyleDefinition {
        self.definitions
            .get(id as usize)
            .or_else(|| self.definitions.first())
            .unwrap_or(&EMPTY_DEFINITION)
    }

    pub fn contains(&self, id: u32) -> bool {
        (id as usize) < self.definitions.len()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleDefinition> {
        self.definitions.iter()
    }
}

impl From<Vec<StyleDefinition>> for StyleCatalog {
    fn from(definitions: Vec<StyleDefinition>) -> Self {
        Self { definitions }
    }
}
