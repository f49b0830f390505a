//! The loosely-typed cell exchanged with callers

use super::Scalar;

/// A single cell of a [`Grid`](crate::Grid).
///
/// `style_id` indexes the stylesheet's cell formats and is carried through
/// the codec untouched. `store_as_text` forces the write path to store the
/// value's rendering as text, so that e.g. `"000123"` keeps its zeros.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericCell {
    /// Cell value; `None` for a cell with no content
    pub value: Option<Scalar>,
    /// Index into the style catalog
    pub style_id: u32,
    /// Write the value as text regardless of its content
    pub store_as_text: bool,
}

impl GenericCell {
    /// Create a cell holding `value` with the default style
    pub fn new<V: Into<Scalar>>(value: V) -> Self {
        Self {
            value: Some(value.into()),
            style_id: 0,
            store_as_text: false,
        }
    }

    /// Create a cell with no value
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a cell from an optional value
    pub fn from_option<V: Into<Scalar>>(value: Option<V>) -> Self {
        Self {
            value: value.map(Into::into),
            ..Self::default()
        }
    }

    /// Set the style id
    pub fn with_style(mut self, style_id: u32) -> Self {
        self.style_id = style_id;
        self
    }

    /// Mark the cell to be stored as text
    pub fn as_text(mut self) -> Self {
        self.store_as_text = true;
        self
    }

    /// Check if the cell has no value
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builders() {
        let cell = GenericCell::new("000123").with_style(7).as_text();
        assert_eq!(cell.value, Some(Scalar::text("000123")));
        assert_eq!(cell.style_id, 7);
        assert!(cell.store_as_text);

        let empty = GenericCell::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.style_id, 0);
        assert!(!empty.store_as_text);

        assert!(GenericCell::from_option::<i64>(None).is_empty());
        assert_eq!(
            GenericCell::from_option(Some(5)).value,
            Some(Scalar::Integer(5))
        );
    }
}
