//! String literal escaping in both directions.

use std::fmt::Write as _;

/// Decodes a single escape sequence as written in source (including the
/// leading backslash).
pub(crate) fn decode_escape(sequence: &str) -> String {
    let Some(body) = sequence.strip_prefix('\\') else {
        return sequence.to_owned();
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    match first {
        'n' => "\n".to_owned(),
        't' => "\t".to_owned(),
        'r' => "\r".to_owned(),
        'b' => "\u{8}".to_owned(),
        'f' => "\u{c}".to_owned(),
        'v' => "\u{b}".to_owned(),
        '0'..='7' => u32::from_str_radix(body, 8)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| body.to_owned(), String::from),
        // Line continuation.
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => String::new(),
        'x' => decode_code_point(rest).unwrap_or_else(|| body.to_owned()),
        'u' => {
            let digits = rest
                .strip_prefix('{')
                .and_then(|inner| inner.strip_suffix('}'))
                .unwrap_or(rest);
            decode_code_point(digits).unwrap_or_else(|| body.to_owned())
        }
        other => {
            let mut decoded = String::from(other);
            decoded.push_str(rest);
            decoded
        }
    }
}

fn decode_code_point(hex: &str) -> Option<String> {
    let value = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(value).map(String::from)
}

/// Quotes `value` as a double-quoted JavaScript string literal.
#[must_use]
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len().saturating_add(2));
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\\n", "\n")]
    #[case("\\\"", "\"")]
    #[case("\\'", "'")]
    #[case("\\\\", "\\")]
    #[case("\\x41", "A")]
    #[case("\\u0041", "A")]
    #[case("\\u{1F600}", "\u{1F600}")]
    #[case("\\\n", "")]
    #[case("\\q", "q")]
    fn decodes_escape_sequences(#[case] sequence: &str, #[case] expected: &str) {
        assert_eq!(decode_escape(sequence), expected);
    }

    #[rstest]
    #[case("clock", "\"clock\"")]
    #[case("C:\\modules\\clock.js", "\"C:\\\\modules\\\\clock.js\"")]
    #[case("say \"hi\"\n", "\"say \\\"hi\\\"\\n\"")]
    fn quotes_values(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(quote(value), expected);
    }
}
