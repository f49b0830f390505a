//! Number formats and their classification
//!
//! The read path needs to know whether a bare number in a cell is a date.
//! That is decided by the number format of the cell's style: built-in ids
//! have fixed meanings, custom formats (ids from 164) are classified by the
//! tokens in their format code.

/// A custom `<numFmt numFmtId="…" formatCode="…"/>` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberFormatDef {
    pub id: u32,
    pub code: String,
}

impl NumberFormatDef {
    /// 0 - General
    pub const ID_GENERAL: u32 = 0;
    /// 1 - 0
    pub const ID_INTEGER: u32 = 1;
    /// 2 - 0.00
    pub const ID_DECIMAL_2: u32 = 2;
    /// 3 - #,##0
    pub const ID_INTEGER_SEP: u32 = 3;
    /// 4 - #,##0.00
    pub const ID_DECIMAL_2_SEP: u32 = 4;
    /// 14 - mm-dd-yy
    pub const ID_DATE_SHORT: u32 = 14;
    /// 22 - m/d/yy h:mm
    pub const ID_DATETIME: u32 = 22;
    /// 49 - @
    pub const ID_TEXT: u32 = 49;
    /// First id available to custom formats
    pub const FIRST_CUSTOM_ID: u32 = 164;

    pub fn new<S: Into<String>>(id: u32, code: S) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}

/// What kind of value a number format displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormatCode {
    #[default]
    General,
    Integer,
    Decimal,
    DateShort,
    DateLong,
    Time,
    TextLiteral,
}

impl NumberFormatCode {
    /// Class of a built-in format id. Ids without a fixed meaning are `General`.
    pub fn from_builtin_id(id: u32) -> Self {
        match id {
            1 | 3 => NumberFormatCode::Integer,
            2 | 4 | 9..=13 | 37..=40 | 44 | 48 => NumberFormatCode::Decimal,
            14 => NumberFormatCode::DateShort,
            15..=17 | 22 | 27..=36 | 50..=58 => NumberFormatCode::DateLong,
            18..=21 | 45..=47 => NumberFormatCode::Time,
            49 => NumberFormatCode::TextLiteral,
            _ => NumberFormatCode::General,
        }
    }

    /// Class of format `id`, given its custom format code if the stylesheet has one.
    ///
    /// Ids 165 and 166 without a code are taken as date and time formats,
    /// matching what older writers of this layout emitted.
    pub fn classify(id: u32, custom_code: Option<&str>) -> Self {
        if id < NumberFormatDef::FIRST_CUSTOM_ID {
            return Self::from_builtin_id(id);
        }
        match custom_code {
            Some(code) => Self::from_format_code(code),
            None => match id {
                165 => NumberFormatCode::DateLong,
                166 => NumberFormatCode::Time,
                _ => NumberFormatCode::General,
            },
        }
    }

    /// Classify a format code string by its tokens
    pub fn from_format_code(code: &str) -> Self {
        let tokens = significant_chars(code);
        let trimmed = code.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("general") {
            return NumberFormatCode::General;
        }
        if tokens.contains('@') {
            return NumberFormatCode::TextLiteral;
        }

        let has = |c: char| tokens.contains(c);
        if has('y') || has('d') {
            NumberFormatCode::DateLong
        } else if has('h') || has('s') {
            // any `m` here is minutes
            NumberFormatCode::Time
        } else if has('m') {
            NumberFormatCode::DateLong
        } else {
            NumberFormatCode::Decimal
        }
    }

    /// Check if values with this format are serial dates or times
    pub fn is_date_like(&self) -> bool {
        matches!(
            self,
            NumberFormatCode::DateShort | NumberFormatCode::DateLong | NumberFormatCode::Time
        )
    }
}

/// Lowercased format characters, without quoted literals, escaped characters,
/// padding/fill directives and `[..]` sections other than elapsed-time ones
fn significant_chars(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '[' => {
                let section: String = chars.by_ref().take_while(|q| *q != ']').collect();
                // elapsed time: [h], [mm], [ss]
                if !section.is_empty()
                    && section
                        .chars()
                        .all(|q| matches!(q.to_ascii_lowercase(), 'h' | 'm' | 's'))
                {
                    out.push_str(&section.to_ascii_lowercase());
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            _ => out.push(c.to_ascii_lowercase()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids() {
        assert_eq!(NumberFormatCode::from_builtin_id(0), NumberFormatCode::General);
        assert_eq!(NumberFormatCode::from_builtin_id(1), NumberFormatCode::Integer);
        assert_eq!(NumberFormatCode::from_builtin_id(4), NumberFormatCode::Decimal);
        assert_eq!(NumberFormatCode::from_builtin_id(14), NumberFormatCode::DateShort);
        assert_eq!(NumberFormatCode::from_builtin_id(22), NumberFormatCode::DateLong);
        assert_eq!(NumberFormatCode::from_builtin_id(21), NumberFormatCode::Time);
        assert_eq!(NumberFormatCode::from_builtin_id(47), NumberFormatCode::Time);
        assert_eq!(NumberFormatCode::from_builtin_id(49), NumberFormatCode::TextLiteral);
        assert_eq!(NumberFormatCode::from_builtin_id(5), NumberFormatCode::General);
    }

    #[test]
    fn test_custom_codes() {
        let c = |code| NumberFormatCode::classify(170, Some(code));
        assert_eq!(c("yyyy-mm-dd"), NumberFormatCode::DateLong);
        assert_eq!(c("mmm yy"), NumberFormatCode::DateLong);
        assert_eq!(c("hh:mm:ss"), NumberFormatCode::Time);
        assert_eq!(c("[h]:mm"), NumberFormatCode::Time);
        assert_eq!(c("@"), NumberFormatCode::TextLiteral);
        assert_eq!(c("#,##0.00"), NumberFormatCode::Decimal);
        assert_eq!(c("0.00E+00"), NumberFormatCode::Decimal);
        assert_eq!(c("General"), NumberFormatCode::General);
    }

    #[test]
    fn test_literals_do_not_look_like_dates() {
        let c = |code| NumberFormatCode::classify(170, Some(code));
        assert_eq!(c("0.00\" days\""), NumberFormatCode::Decimal);
        assert_eq!(c("[Red]#,##0"), NumberFormatCode::Decimal);
        assert_eq!(c("0\\d"), NumberFormatCode::Decimal);
        assert_eq!(c("[$-409]d-mmm-yy"), NumberFormatCode::DateLong);
    }

    #[test]
    fn test_custom_ids_without_code() {
        assert_eq!(NumberFormatCode::classify(165, None), NumberFormatCode::DateLong);
        assert_eq!(NumberFormatCode::classify(166, None), NumberFormatCode::Time);
        assert_eq!(NumberFormatCode::classify(200, None), NumberFormatCode::General);
        // built-in ids ignore any code
        assert_eq!(NumberFormatCode::classify(14, Some("0.00")), NumberFormatCode::DateShort);
    }

    #[test]
    fn test_is_date_like() {
        assert!(NumberFormatCode::DateShort.is_date_like());
        assert!(NumberFormatCode::Time.is_date_like());
        assert!(!NumberFormatCode::Integer.is_date_like());
        assert!(!NumberFormatCode::TextLiteral.is_date_like());
    }
}
