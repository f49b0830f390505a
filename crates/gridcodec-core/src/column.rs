//! Column width hints

/// Width applied to a span of columns, written as a `<col>` element.
///
/// `min` and `max` are 1-based and inclusive, as in the file format.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnWidth {
    /// First column (1-based)
    pub min: u16,
    /// Last column (1-based, inclusive)
    pub max: u16,
    /// Width in characters of the default font
    pub width: f64,
    /// Width was set explicitly rather than computed
    pub custom_width: bool,
}

impl ColumnWidth {
    /// Width for the columns `min..=max`, marked custom
    pub fn new(min: u16, max: u16, width: f64) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            width,
            custom_width: true,
        }
    }

    /// Width for a single column
    pub fn single(col: u16, width: f64) -> Self {
        Self::new(col, col, width)
    }

    /// Check whether the span covers the 1-based column `col`
    pub fn contains(&self, col: u16) -> bool {
        (self.min..=self.max).contains(&col)
    }
}
