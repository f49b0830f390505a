//! Cell background fills

use super::Color;

/// A `<fill>` entry of the stylesheet.
///
/// Index 0 must be [`Fill::None`] and index 1 [`Fill::Gray125`]; the
/// stylesheet builder reserves both.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fill {
    /// No fill (`patternType="none"`)
    #[default]
    None,

    /// The 12.5% gray pattern reserved at index 1
    Gray125,

    /// Solid fill with a foreground color
    Solid { color: Color },

    /// Any other pattern, kept so documents read back unchanged
    Pattern {
        pattern: PatternType,
        foreground: Color,
        background: Color,
    },
}

impl Fill {
    /// Create a solid fill
    pub fn solid(color: Color) -> Self {
        Fill::Solid { color }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Fill::None)
    }

    /// The `patternType` attribute value
    pub fn pattern_type(&self) -> PatternType {
        match self {
            Fill::None => PatternType::None,
            Fill::Gray125 => PatternType::Gray125,
            Fill::Solid { .. } => PatternType::Solid,
            Fill::Pattern { pattern, .. } => *pattern,
        }
    }

    /// Build a fill from a parsed `<patternFill>`
    pub fn from_pattern(pattern: PatternType, foreground: Color, background: Color) -> Self {
        match pattern {
            PatternType::None => Fill::None,
            PatternType::Gray125 if foreground.is_auto() && background.is_auto() => Fill::Gray125,
            PatternType::Solid if background.is_auto() => Fill::Solid { color: foreground },
            _ => Fill::Pattern {
                pattern,
                foreground,
                background,
            },
        }
    }
}

/// Pattern fill types of `<patternFill patternType="…">`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternType {
    #[default]
    None,
    Solid,
    Gray125,
    Gray0625,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
}

impl PatternType {
    /// XML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::None => "none",
            PatternType::Solid => "solid",
            PatternType::Gray125 => "gray125",
            PatternType::Gray0625 => "gray0625",
            PatternType::MediumGray => "mediumGray",
            PatternType::DarkGray => "darkGray",
            PatternType::LightGray => "lightGray",
            PatternType::DarkHorizontal => "darkHorizontal",
            PatternType::DarkVertical => "darkVertical",
            PatternType::DarkDown => "darkDown",
            PatternType::DarkUp => "darkUp",
            PatternType::DarkGrid => "darkGrid",
            PatternType::DarkTrellis => "darkTrellis",
            PatternType::LightHorizontal => "lightHorizontal",
            PatternType::LightVertical => "lightVertical",
            PatternType::LightDown => "lightDown",
            PatternType::LightUp => "lightUp",
            PatternType::LightGrid => "lightGrid",
            PatternType::LightTrellis => "lightTrellis",
        }
    }

    /// Parse the XML attribute value; unknown values map to `None`
    pub fn from_xlsx(s: &str) -> Self {
        match s {
            "solid" => PatternType::Solid,
            "gray125" => PatternType::Gray125,
            "gray0625" => PatternType::Gray0625,
            "mediumGray" => PatternType::MediumGray,
            "darkGray" => PatternType::DarkGray,
            "lightGray" => PatternType::LightGray,
            "darkHorizontal" => PatternType::DarkHorizontal,
            "darkVertical" => PatternType::DarkVertical,
            "darkDown" => PatternType::DarkDown,
            "darkUp" => PatternType::DarkUp,
            "darkGrid" => PatternType::DarkGrid,
            "darkTrellis" => PatternType::DarkTrellis,
            "lightHorizontal" => PatternType::LightHorizontal,
            "lightVertical" => PatternType::LightVertical,
            "lightDown" => PatternType::LightDown,
            "lightUp" => PatternType::LightUp,
            "lightGrid" => PatternType::LightGrid,
            "lightTrellis" => PatternType::LightTrellis,
            _ => PatternType::None,
        }
    }
}
