//! Read options

/// Which worksheet to read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelector {
    /// First sheet in workbook order
    #[default]
    First,
    /// Sheet at a 0-based position in workbook order
    Index(usize),
    /// Sheet with this name (exact match)
    Name(String),
}

/// Options for reading a document
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub sheet: SheetSelector,
}

impl ReadOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the sheet at `index`
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet = SheetSelector::Index(index);
        self
    }

    /// Read the sheet named `name`
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet = SheetSelector::Name(name.into());
        self
    }
}
