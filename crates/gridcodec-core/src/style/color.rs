//! Color representation

/// Color as stored in styles.xml `<color>` and `<fgColor>`/`<bgColor>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Automatic/default color (no attribute written)
    #[default]
    Auto,

    /// ARGB color (`rgb="FFFFFF99"`)
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color index (`theme="1"`)
    Theme(u32),

    /// Legacy palette index (`indexed="64"`)
    Indexed(u32),
}

impl Color {
    /// Create an opaque RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a: 0xFF, r, g, b }
    }

    /// Create from a hex string: `RRGGBB` or `AARRGGBB`, optional `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// The 8-character ARGB hex used by the `rgb` attribute, if this is an ARGB color
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Argb { a, r, g, b } => Some(format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b)),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    /// Render the color's attribute (`rgb="…"`, `theme="…"`, `indexed="…"`),
    /// or `None` for [`Color::Auto`]
    pub fn to_xml_attr(&self) -> Option<String> {
        match self {
            Color::Auto => None,
            Color::Argb { .. } => self.to_argb_hex().map(|hex| format!("rgb=\"{}\"", hex)),
            Color::Theme(i) => Some(format!("theme=\"{}\"", i)),
            Color::Indexed(i) => Some(format!("indexed=\"{}\"", i)),
        }
    }
}
