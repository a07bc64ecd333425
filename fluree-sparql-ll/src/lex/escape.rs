//! Unicode escape preprocessing.
//!
//! SPARQL allows `\uXXXX` and `\UXXXXXXXX` anywhere in a query. They are
//! decoded over the whole buffer before tokenization, so a lexer rule never
//! sees them.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UNICODE_ESCAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\u([0-9A-Fa-f]{4})|\\U([0-9A-Fa-f]{8})").expect("valid regex")
});

/// Replace every `\uXXXX` / `\UXXXXXXXX` escape with its code point.
///
/// Input without escapes is returned borrowed. An escape that does not name a
/// Unicode scalar value (a surrogate, or above `U+10FFFF`) is left in place
/// so the lexer reports it.
pub fn decode_unicode_escapes(input: &str) -> Cow<'_, str> {
    if !input.contains("\\u") && !input.contains("\\U") {
        return Cow::Borrowed(input);
    }

    UNICODE_ESCAPE_RE.replace_all(input, |caps: &Captures<'_>| {
        let hex = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `\u<hex>` without writing the escape literally.
    fn esc(hex: &str) -> String {
        let marker = if hex.len() == 8 { 'U' } else { 'u' };
        format!("\\{marker}{hex}")
    }

    #[test]
    fn test_no_escapes_is_borrowed() {
        let out = decode_unicode_escapes("SELECT ?x WHERE { ?x ?p \"a\\nb\" }");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_short_and_long_forms() {
        let input = format!("{}{}{}", esc("0041"), esc("0042"), esc("0043"));
        assert_eq!(decode_unicode_escapes(&input), "ABC");

        let input = format!("x{}y", esc("0001F600"));
        assert_eq!(decode_unicode_escapes(&input), "x\u{1F600}y");

        let input = format!("{}{}", esc("00e9"), esc("00E9"));
        assert_eq!(decode_unicode_escapes(&input), "\u{e9}\u{e9}");
    }

    #[test]
    fn test_each_escape_decoded_once() {
        // An escaped backslash must not start a second escape
        let input = format!("{}u0041", esc("005C"));
        assert_eq!(decode_unicode_escapes(&input), format!("{}u0041", '\\'));
    }

    #[test]
    fn test_idempotent_on_decoded_output() {
        let input = format!("?x <http://ex/{}>", esc("00FC"));
        let once = decode_unicode_escapes(&input).into_owned();
        assert_eq!(once, "?x <http://ex/\u{fc}>");
        assert_eq!(decode_unicode_escapes(&once), once);
    }

    #[test]
    fn test_invalid_scalar_left_in_place() {
        assert_eq!(decode_unicode_escapes(&esc("D800")), esc("D800"));
        assert_eq!(decode_unicode_escapes(&esc("00110000")), esc("00110000"));
        let short = format!("{}u12", '\\');
        assert_eq!(decode_unicode_escapes(&short), short);
    }
}
