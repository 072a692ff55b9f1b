//! String-literal escaping.
//!
//! Escaping is one-way: the output is only meaningful between the chosen
//! delimiters, and escaping already-escaped text doubles every backslash.

/// Delimiter of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// Escape `raw` for use inside a literal delimited by `quote`.
///
/// Backslash, the active delimiter and every code point in U+0000..=U+001F are
/// escaped (`\n \r \t \b \f` by name, the rest as `\u00XX`). The other quote
/// character and all non-control code points pass through unchanged.
pub fn escape_string_literal(raw: &str, quote: Quote) -> String {
    let delimiter = quote.as_char();
    let mut out = String::with_capacity(raw.len() + 2);
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c < '\u{0020}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
