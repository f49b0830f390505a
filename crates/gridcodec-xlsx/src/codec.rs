//! The cell codec: typed values to stored cells and back
//!
//! Writing classifies a value by its textual rendering rather than by its
//! [`Scalar`] variant, so the stored type always matches what the text looks
//! like. Reading starts from the stored type; when a cell has none, the
//! number format of its style decides between a date and a number.
//!
//! Neither direction fails. A read that cannot produce the expected type
//! degrades to a fallback value and names the degradation in
//! [`Decoded::fallbacks`].

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gridcodec_core::{DateSystem, Decimal, Scalar, Stylesheet};

use crate::shared_strings::SharedStringTable;

/// How a cell's raw text is to be interpreted (the `t` attribute of `<c>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// `t="b"`: `1` or `0`
    Boolean,
    /// `t="n"` or no `t`: a number, possibly a serial date
    Number,
    /// `t="d"`: ISO-8601 date-time text
    Date,
    /// `t="str"`: literal text
    Text,
    /// `t="s"`: index into the shared string table
    SharedString,
    /// `t="inlineStr"`: text held in the cell's `<is>` element
    InlineString,
    /// `t="e"`: error literal such as `#N/A`
    Error,
}

impl StorageType {
    /// Parse the `t` attribute
    pub fn from_xlsx(t: &str) -> Option<Self> {
        Some(match t {
            "b" => StorageType::Boolean,
            "n" => StorageType::Number,
            "d" => StorageType::Date,
            "str" => StorageType::Text,
            "s" => StorageType::SharedString,
            "inlineStr" => StorageType::InlineString,
            "e" => StorageType::Error,
            _ => return None,
        })
    }

    /// The `t` attribute to write; `None` for [`StorageType::Number`], which is the default
    pub fn as_xlsx(&self) -> Option<&'static str> {
        match self {
            StorageType::Boolean => Some("b"),
            StorageType::Number => None,
            StorageType::Date => Some("d"),
            StorageType::Text => Some("str"),
            StorageType::SharedString => Some("s"),
            StorageType::InlineString => Some("inlineStr"),
            StorageType::Error => Some("e"),
        }
    }
}

/// Result of [`encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Text stored in the cell (for `Text`, the string itself; the writer
    /// moves it into the shared string table)
    pub raw: String,
    pub storage: StorageType,
}

impl Encoded {
    fn new<S: Into<String>>(raw: S, storage: StorageType) -> Self {
        Self {
            raw: raw.into(),
            storage,
        }
    }
}

/// Decide how to store a value.
///
/// With `store_as_text` the rendering is stored as text unchanged. Otherwise
/// the rendering is classified, first match wins: boolean literal, ISO date
/// or date-time, exact decimal, finite float, text. An absent value is
/// stored as empty text.
pub fn encode(value: Option<&Scalar>, store_as_text: bool) -> Encoded {
    let rendering = value.map(Scalar::to_string).unwrap_or_default();
    if store_as_text || value.is_none() {
        return Encoded::new(rendering, StorageType::Text);
    }

    let trimmed = rendering.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Encoded::new("1", StorageType::Boolean);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Encoded::new("0", StorageType::Boolean);
    }

    if let Some(dt) = parse_iso_datetime(trimmed) {
        return Encoded::new(format_iso_datetime(dt), StorageType::Date);
    }

    if let Some(d) = parse_plain_decimal(trimmed) {
        return Encoded::new(d.to_string(), StorageType::Number);
    }

    if let Some(f) = parse_finite_float(trimmed) {
        return Encoded::new(format!("{:?}", f), StorageType::Number);
    }

    Encoded::new(rendering, StorageType::Text)
}

/// A degradation applied while decoding a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// Shared string index unparsable or past the end of the table; read as empty text
    SharedStringIndex,
    /// Style id past the end of the catalog; style 0 used instead
    StyleIndex,
    /// Date-formatted cell held no valid serial date; read as the epoch
    DateSerial,
    /// Number cell held no number; read as text
    NumberText,
    /// `t="d"` cell held no ISO date; read as text
    DateText,
}

impl Fallback {
    pub const ALL: [Fallback; 5] = [
        Fallback::SharedStringIndex,
        Fallback::StyleIndex,
        Fallback::DateSerial,
        Fallback::NumberText,
        Fallback::DateText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fallback::SharedStringIndex => "shared string index out of range",
            Fallback::StyleIndex => "style id out of range",
            Fallback::DateSerial => "invalid serial date",
            Fallback::NumberText => "unparsable number",
            Fallback::DateText => "unparsable ISO date",
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level state [`decode`] reads from
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub stylesheet: &'a Stylesheet,
    pub shared_strings: &'a SharedStringTable,
    pub date_system: DateSystem,
}

/// Result of [`decode`]
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Scalar,
    /// Degradations applied, in the order they happened; empty for a clean decode
    pub fallbacks: Vec<Fallback>,
}

impl Decoded {
    fn clean(value: Scalar) -> Self {
        Self {
            value,
            fallbacks: Vec::new(),
        }
    }

    fn degraded(value: Scalar, fallback: Fallback) -> Self {
        Self {
            value,
            fallbacks: vec![fallback],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Infer a typed value from a stored cell.
pub fn decode(
    raw: &str,
    storage: Option<StorageType>,
    style_id: u32,
    ctx: &DecodeContext<'_>,
) -> Decoded {
    match storage {
        Some(StorageType::Boolean) => {
            let t = raw.trim();
            Decoded::clean(Scalar::Boolean(t == "1" || t.eq_ignore_ascii_case("true")))
        }
        Some(StorageType::SharedString) => {
            match raw.trim().parse::<u32>().ok().and_then(|i| ctx.shared_strings.get(i)) {
                Some(s) => Decoded::clean(Scalar::text(s)),
                None => Decoded::degraded(Scalar::text(""), Fallback::SharedStringIndex),
            }
        }
        Some(StorageType::Date) => match parse_iso_datetime(raw.trim()) {
            Some(dt) => Decoded::clean(Scalar::DateTime(dt)),
            None => Decoded::degraded(Scalar::text(raw), Fallback::DateText),
        },
        Some(StorageType::Number) | None => decode_number(raw, style_id, ctx),
        Some(StorageType::Text) | Some(StorageType::InlineString) | Some(StorageType::Error) => {
            Decoded::clean(Scalar::text(raw))
        }
    }
}

fn decode_number(raw: &str, style_id: u32, ctx: &DecodeContext<'_>) -> Decoded {
    let mut fallbacks = Vec::new();
    // style 0 is always usable, even when a document's catalog is empty
    if style_id != 0 && !ctx.stylesheet.catalog().contains(style_id) {
        fallbacks.push(Fallback::StyleIndex);
    }

    let trimmed = raw.trim();
    let value = if ctx.stylesheet.number_format_code(style_id).is_date_like() {
        match trimmed
            .parse::<f64>()
            .ok()
            .and_then(|serial| ctx.date_system.from_serial(serial))
        {
            Some(dt) => Scalar::DateTime(dt),
            None => {
                fallbacks.push(Fallback::DateSerial);
                Scalar::DateTime(ctx.date_system.epoch())
            }
        }
    } else if let Some(n) = parse_number(trimmed) {
        n
    } else {
        fallbacks.push(Fallback::NumberText);
        Scalar::text(raw)
    };

    Decoded { value, fallbacks }
}

/// Integer, then exact decimal (plain or scientific), then finite float
fn parse_number(s: &str) -> Option<Scalar> {
    if is_plain_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Some(Scalar::Integer(i));
        }
    }
    if let Some(d) = parse_plain_decimal(s) {
        return Some(Scalar::Decimal(d));
    }
    if s.contains(&['e', 'E'][..]) {
        if let Ok(d) = Decimal::from_scientific(s) {
            return Some(Scalar::Decimal(d));
        }
    }
    parse_finite_float(s).map(Scalar::Float)
}

fn is_plain_integer(s: &str) -> bool {
    let digits = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Decimal in plain positional notation, only when it holds every digit of
/// `s`. `rust_decimal` alone would also accept `_` separators and round
/// away digits past its 28-place precision.
fn parse_plain_decimal(s: &str) -> Option<Decimal> {
    let body = s.strip_prefix(&['-', '+'][..]).unwrap_or(s);
    let well_formed = body.bytes().any(|b| b.is_ascii_digit())
        && body.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && body.bytes().filter(|b| *b == b'.').count() <= 1;
    if !well_formed {
        return None;
    }
    let fraction_digits = body.split_once('.').map_or(0, |(_, frac)| frac.len());
    Decimal::from_str(s)
        .ok()
        .filter(|d| fraction_digits <= d.scale() as usize)
}

fn parse_finite_float(s: &str) -> Option<f64> {
    // only digit-based forms; `inf` and `NaN` are text
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `YYYY-MM-DD[(T| )HH:MM[:SS[.fff]]]` or `YYYY/MM/DD`
pub(crate) fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    // chrono's %Y takes any digit count; insist on four
    let b = s.as_bytes();
    if b.len() < 10 || !b[..4].iter().all(u8::is_ascii_digit) || !matches!(b[4], b'-' | b'/') {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

pub(crate) fn format_iso_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcodec_core::{NumberFormatDef, StyleDefinition};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// style 0 General, 1 date (14), 2 integer (1), 3 custom `yyyy-mm-dd hh:mm`
    fn stylesheet() -> Stylesheet {
        let mut b = Stylesheet::builder().reserve_defaults();
        b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT));
        b.append(StyleDefinition::new().with_number_format(NumberFormatDef::ID_INTEGER));
        let custom = b.add_number_format("yyyy-mm-dd hh:mm");
        b.append(StyleDefinition::new().with_number_format(custom));
        b.build()
    }

    fn decode_with(raw: &str, storage: Option<StorageType>, style_id: u32) -> Decoded {
        let sheet = stylesheet();
        let mut sst = SharedStringTable::new();
        sst.insert("Hello");
        let ctx = DecodeContext {
            stylesheet: &sheet,
            shared_strings: &sst,
            date_system: DateSystem::Excel1900,
        };
        decode(raw, storage, style_id, &ctx)
    }

    #[test]
    fn test_storage_type_attr() {
        for t in ["b", "d", "str", "s", "inlineStr", "e"] {
            assert_eq!(StorageType::from_xlsx(t).and_then(|s| s.as_xlsx()), Some(t));
        }
        assert_eq!(StorageType::from_xlsx("n"), Some(StorageType::Number));
        assert_eq!(StorageType::Number.as_xlsx(), None);
        assert_eq!(StorageType::from_xlsx("x"), None);
    }

    #[test]
    fn test_encode_booleans() {
        assert_eq!(
            encode(Some(&Scalar::text("true")), false),
            Encoded::new("1", StorageType::Boolean)
        );
        assert_eq!(
            encode(Some(&Scalar::text(" FALSE ")), false),
            Encoded::new("0", StorageType::Boolean)
        );
        assert_eq!(
            encode(Some(&Scalar::Boolean(true)), false),
            Encoded::new("1", StorageType::Boolean)
        );
    }

    #[test]
    fn test_encode_store_as_text() {
        assert_eq!(
            encode(Some(&Scalar::text("000123")), true),
            Encoded::new("000123", StorageType::Text)
        );
        assert_eq!(
            encode(Some(&Scalar::Boolean(true)), true),
            Encoded::new("true", StorageType::Text)
        );
    }

    #[test]
    fn test_encode_dates() {
        assert_eq!(
            encode(Some(&Scalar::DateTime(date(2021, 1, 1))), false),
            Encoded::new("2021-01-01T00:00:00", StorageType::Date)
        );
        assert_eq!(
            encode(Some(&Scalar::text("2021/03/04")), false),
            Encoded::new("2021-03-04T00:00:00", StorageType::Date)
        );
        assert_eq!(
            encode(Some(&Scalar::text("2021-03-04 10:30")), false),
            Encoded::new("2021-03-04T10:30:00", StorageType::Date)
        );
        // not a real date
        assert_eq!(
            encode(Some(&Scalar::text("2021-02-30")), false).storage,
            StorageType::Text
        );
        assert_eq!(encode(Some(&Scalar::text("1-2-3")), false).storage, StorageType::Text);
    }

    #[test]
    fn test_encode_numbers() {
        assert_eq!(
            encode(Some(&Scalar::Integer(-42)), false),
            Encoded::new("-42", StorageType::Number)
        );
        assert_eq!(
            encode(Some(&Scalar::Decimal(dec("1234.50"))), false),
            Encoded::new("1234.50", StorageType::Number)
        );
        assert_eq!(
            encode(Some(&Scalar::text("000123")), false),
            Encoded::new("123", StorageType::Number)
        );
        assert_eq!(
            encode(Some(&Scalar::Float(1e300)), false),
            Encoded::new("1e300", StorageType::Number)
        );
        assert_eq!(encode(Some(&Scalar::text("1_000")), false).storage, StorageType::Text);
        assert_eq!(encode(Some(&Scalar::text("NaN")), false).storage, StorageType::Text);
        assert_eq!(encode(Some(&Scalar::text("inf")), false).storage, StorageType::Text);
    }

    #[test]
    fn test_encode_text_and_absent() {
        assert_eq!(
            encode(Some(&Scalar::text("Hello")), false),
            Encoded::new("Hello", StorageType::Text)
        );
        assert_eq!(encode(None, false), Encoded::new("", StorageType::Text));
        assert_eq!(encode(None, true), Encoded::new("", StorageType::Text));
    }

    #[test]
    fn test_decode_typed_storage() {
        assert_eq!(
            decode_with("1", Some(StorageType::Boolean), 0).value,
            Scalar::Boolean(true)
        );
        assert_eq!(
            decode_with("TRUE", Some(StorageType::Boolean), 0).value,
            Scalar::Boolean(true)
        );
        assert_eq!(
            decode_with("0", Some(StorageType::Boolean), 0).value,
            Scalar::Boolean(false)
        );
        assert_eq!(
            decode_with("0", Some(StorageType::SharedString), 0),
            Decoded::clean(Scalar::text("Hello"))
        );
        assert_eq!(
            decode_with("2021-01-01T12:00:00", Some(StorageType::Date), 0).value,
            Scalar::DateTime(date(2021, 1, 1) + chrono::Duration::hours(12))
        );
        assert_eq!(
            decode_with("#N/A", Some(StorageType::Error), 0).value,
            Scalar::text("#N/A")
        );
        assert_eq!(
            decode_with("42", Some(StorageType::InlineString), 1).value,
            Scalar::text("42")
        );
    }

    #[test]
    fn test_decode_shared_string_out_of_range() {
        assert_eq!(
            decode_with("7", Some(StorageType::SharedString), 0),
            Decoded::degraded(Scalar::text(""), Fallback::SharedStringIndex)
        );
        assert_eq!(
            decode_with("x", Some(StorageType::SharedString), 0),
            Decoded::degraded(Scalar::text(""), Fallback::SharedStringIndex)
        );
    }

    #[test]
    fn test_decode_bad_iso_date() {
        assert_eq!(
            decode_with("yesterday", Some(StorageType::Date), 0),
            Decoded::degraded(Scalar::text("yesterday"), Fallback::DateText)
        );
    }

    #[test]
    fn test_decode_serial_date_by_style() {
        assert_eq!(
            decode_with("44197", None, 1),
            Decoded::clean(Scalar::DateTime(date(2021, 1, 1)))
        );
        assert_eq!(
            decode_with("44197.75", None, 3).value,
            Scalar::DateTime(date(2021, 1, 1) + chrono::Duration::hours(18))
        );
        // explicit t="n" behaves like no type
        assert_eq!(
            decode_with("44197", Some(StorageType::Number), 1).value,
            Scalar::DateTime(date(2021, 1, 1))
        );
    }

    #[test]
    fn test_decode_serial_without_date_style_is_a_number() {
        assert_eq!(decode_with("44197", None, 2), Decoded::clean(Scalar::Integer(44197)));
        assert_eq!(decode_with("44197", None, 0), Decoded::clean(Scalar::Integer(44197)));
        assert_eq!(
            decode_with("1234.50", None, 0).value,
            Scalar::Decimal(dec("1234.50"))
        );
        assert_eq!(
            decode_with("1.5E-3", None, 0).value,
            Scalar::Decimal(dec("0.0015"))
        );
        assert_eq!(decode_with("1e300", None, 0).value, Scalar::Float(1e300));
    }

    #[test]
    fn test_decode_degradations() {
        assert_eq!(
            decode_with("abc", None, 0),
            Decoded::degraded(Scalar::text("abc"), Fallback::NumberText)
        );
        assert_eq!(
            decode_with("abc", None, 1),
            Decoded::degraded(
                Scalar::DateTime(DateSystem::Excel1900.epoch()),
                Fallback::DateSerial
            )
        );
        assert_eq!(
            decode_with("1e9", None, 1),
            Decoded::degraded(
                Scalar::DateTime(DateSystem::Excel1900.epoch()),
                Fallback::DateSerial
            )
        );
    }

    #[test]
    fn test_decode_out_of_range_style_uses_style_zero() {
        assert_eq!(
            decode_with("44197", None, 99),
            Decoded::degraded(Scalar::Integer(44197), Fallback::StyleIndex)
        );
        let both = decode_with("abc", None, 99);
        assert_eq!(both.fallbacks, vec![Fallback::StyleIndex, Fallback::NumberText]);
    }

    #[test]
    fn test_decode_uses_date_system() {
        let sheet = stylesheet();
        let sst = SharedStringTable::new();
        let ctx = DecodeContext {
            stylesheet: &sheet,
            shared_strings: &sst,
            date_system: DateSystem::Excel1904,
        };
        assert_eq!(decode("0", None, 1, &ctx).value, Scalar::DateTime(date(1904, 1, 1)));
    }

    mod round_trip {
        use super::*;
        use pretty_assertions::assert_eq;
        use proptest::prelude::*;

        fn round_trip(value: &Scalar, as_text: bool) -> Scalar {
            let encoded = encode(Some(value), as_text);
            let mut sst = SharedStringTable::new();
            let (raw, storage) = match encoded.storage {
                StorageType::Text => (
                    sst.insert(&encoded.raw).to_string(),
                    StorageType::SharedString,
                ),
                other => (encoded.raw, other),
            };
            let sheet = Stylesheet::default();
            let ctx = DecodeContext {
                stylesheet: &sheet,
                shared_strings: &sst,
                date_system: DateSystem::Excel1900,
            };
            let decoded = decode(&raw, Some(storage), 0, &ctx);
            assert!(decoded.is_clean());
            decoded.value
        }

        proptest! {
            #[test]
            fn integers_round_trip(i in any::<i64>()) {
                prop_assert_eq!(round_trip(&Scalar::Integer(i), false), Scalar::Integer(i));
            }

            #[test]
            fn decimals_round_trip(mantissa in any::<i64>(), scale in 1u32..10) {
                let d = Decimal::new(mantissa, scale);
                let back = round_trip(&Scalar::Decimal(d), false);
                prop_assert_eq!(back.as_decimal(), Some(d));
            }

            #[test]
            fn floats_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
                let back = round_trip(&Scalar::Float(f), false);
                prop_assert_eq!(back.as_f64(), Some(f));
            }

            #[test]
            fn datetimes_round_trip(days in 0i64..2_900_000, ms in 0i64..86_400_000) {
                let dt = date(1900, 1, 1)
                    + chrono::Duration::days(days)
                    + chrono::Duration::milliseconds(ms);
                prop_assert_eq!(round_trip(&Scalar::DateTime(dt), false), Scalar::DateTime(dt));
            }

            #[test]
            fn booleans_round_trip(b in any::<bool>()) {
                prop_assert_eq!(round_trip(&Scalar::Boolean(b), false), Scalar::Boolean(b));
            }

            #[test]
            fn text_stored_as_text_round_trips(s in "\\PC*") {
                prop_assert_eq!(round_trip(&Scalar::text(s.clone()), true), Scalar::text(s));
            }

            #[test]
            fn words_round_trip(s in "[a-zA-Z ]*[a-zA-Z][a-zA-Z ]*") {
                prop_assume!(!s.trim().eq_ignore_ascii_case("true"));
                prop_assume!(!s.trim().eq_ignore_ascii_case("false"));
                prop_assume!(!s.trim().eq_ignore_ascii_case("inf"));
                prop_assume!(!s.trim().eq_ignore_ascii_case("infinity"));
                prop_assume!(!s.trim().eq_ignore_ascii_case("nan"));
                prop_assert_eq!(round_trip(&Scalar::text(s.clone()), false), Scalar::text(s));
            }
        }

        #[test]
        fn test_floats_past_decimal_precision_keep_every_digit() {
            for f in [1e-30, 5e-324, 1.234567e-25, 1.2345678901234567e-15, 8e28, -1e300] {
                assert_eq!(encode(Some(&Scalar::Float(f)), false).raw, format!("{:?}", f));
                let back = round_trip(&Scalar::Float(f), false);
                assert_eq!(back.as_f64(), Some(f), "{:?} read back as {:?}", f, back);
            }
        }

        #[test]
        fn test_long_decimal_text_is_not_rounded() {
            let pi = "3.14159265358979323846264338327950288";
            let encoded = encode(Some(&Scalar::text(pi)), false);
            assert_eq!(encoded.storage, StorageType::Number);
            assert_eq!(encoded.raw, "3.141592653589793");
            let back = round_trip(&Scalar::text(pi), false);
            assert_eq!(back.as_f64(), Some(std::f64::consts::PI));
        }

        #[test]
        fn test_datetimes_round_trip() {
            let noonish = date(1999, 12, 31) + chrono::Duration::milliseconds(45_296_789);
            for dt in [date(2021, 1, 1), noonish, date(1900, 1, 1)] {
                assert_eq!(round_trip(&Scalar::DateTime(dt), false), Scalar::DateTime(dt));
            }
        }
    }
}
