//! Text escaping for XML parts
//!
//! Besides the five XML entities, spreadsheet text uses `_xHHHH_` to carry
//! characters XML cannot hold (control characters) or would normalise away
//! (carriage returns). A literal `_xHHHH_` in the text has its underscore
//! escaped as `_x005F_` so it survives the round trip.

/// Escape the five XML special characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn is_escape_at(s: &str, i: usize) -> bool {
    let b = s.as_bytes();
    b.len() >= i + 7
        && b[i] == b'_'
        && b[i + 1] == b'x'
        && b[i + 2..i + 6].iter().all(u8::is_ascii_hexdigit)
        && b[i + 6] == b'_'
}

/// Encode characters that need `_xHHHH_` form
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '_' if is_escape_at(s, i) => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{7F}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Decode `_xHHHH_` sequences. Incomplete or invalid sequences are kept as-is.
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = if is_escape_at(tail, 0) {
            u32::from_str_radix(&tail[2..6], 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}
