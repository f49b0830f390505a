//! Ordered rows of cells

use crate::cell::GenericCell;

/// A grid of cells: ordered rows of ordered cells.
///
/// Rows may have different lengths. The grid keeps rows exactly as they were
/// pushed or read; nothing is padded or reshaped.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Grid(Vec<Vec<GenericCell>>);

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty grid with room for `rows` rows
    pub fn with_capacity(rows: usize) -> Self {
        Self(Vec::with_capacity(rows))
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<GenericCell>) {
        self.0.push(row);
    }

    /// All rows, in order
    pub fn rows(&self) -> &[Vec<GenericCell>] {
        &self.0
    }

    /// Get a row by 0-based index
    pub fn row(&self, index: usize) -> Option<&[GenericCell]> {
        self.0.get(index).map(Vec::as_slice)
    }

    /// Get a cell by 0-based row and column index
    pub fn cell(&self, row: usize, col: usize) -> Option<&GenericCell> {
        self.0.get(row).and_then(|r| r.get(col))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of cells across all rows
    pub fn cell_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<GenericCell>> {
        self.0.iter()
    }

    /// Consume the grid, returning its rows
    pub fn into_rows(self) -> Vec<Vec<GenericCell>> {
        self.0
    }
}

impl From<Vec<Vec<GenericCell>>> for Grid {
    fn from(rows: Vec<Vec<GenericCell>>) -> Self {
        Self(rows)
    }
}

impl FromIterator<Vec<GenericCell>> for Grid {
    fn from_iter<I: IntoIterator<Item = Vec<GenericCell>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Vec<GenericCell>;
    type IntoIter = std::slice::Iter<'a, Vec<GenericCell>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Grid {
    type Item = Vec<GenericCell>;
    type IntoIter = std::vec::IntoIter<Vec<GenericCell>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
