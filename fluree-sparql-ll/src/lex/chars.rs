//! SPARQL character classes.
//!
//! The grammar's identifier productions are spelled out as static range
//! tables so the full multilingual range (including the supplementary
//! planes) is covered exactly:
//!
//! ```text
//! PN_CHARS_BASE ::= [A-Z] | [a-z] | [#x00C0-#x00D6] | [#x00D8-#x00F6]
//!                 | [#x00F8-#x02FF] | [#x0370-#x037D] | [#x037F-#x1FFF]
//!                 | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF]
//!                 | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD]
//!                 | [#x10000-#xEFFFF]
//! PN_CHARS_U    ::= PN_CHARS_BASE | '_'
//! VARNAME       ::= (PN_CHARS_U | [0-9])
//!                   (PN_CHARS_U | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040])*
//! PN_CHARS      ::= PN_CHARS_U | '-' | [0-9] | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
//! ```

/// Ranges making up PN_CHARS_BASE.
const PN_CHARS_BASE: &[(char, char)] = &[
    ('A', 'Z'),
    ('a', 'z'),
    ('\u{00C0}', '\u{00D6}'),
    ('\u{00D8}', '\u{00F6}'),
    ('\u{00F8}', '\u{02FF}'),
    ('\u{0370}', '\u{037D}'),
    ('\u{037F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
    ('\u{10000}', '\u{EFFFF}'),
];

/// Combining marks and joiners allowed after the first character of a name.
const NAME_EXTENDERS: &[(char, char)] = &[
    ('\u{00B7}', '\u{00B7}'),
    ('\u{0300}', '\u{036F}'),
    ('\u{203F}', '\u{2040}'),
];

/// Characters that may follow a backslash in a local name (PN_LOCAL_ESC).
pub const LOCAL_ESCAPABLE: &str = "_~.-!$&'()*+,;=/?#@%";

fn in_ranges(ranges: &[(char, char)], c: char) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

pub fn is_pn_chars_base(c: char) -> bool {
    in_ranges(PN_CHARS_BASE, c)
}

pub fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c) || c == '-' || c.is_ascii_digit() || in_ranges(NAME_EXTENDERS, c)
}

/// First character of a variable name (after `?` or `$`).
pub fn is_varname_start(c: char) -> bool {
    is_pn_chars_u(c) || c.is_ascii_digit()
}

/// Any subsequent character of a variable name.
pub fn is_varname_char(c: char) -> bool {
    is_varname_start(c) || in_ranges(NAME_EXTENDERS, c)
}

/// First character of a local name, excluding the `%` / `\` escape forms.
pub fn is_pn_local_start(c: char) -> bool {
    is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
}

/// Whether `c` may appear unescaped inside `<...>`.
///
/// ```text
/// IRIREF ::= '<' ([^<>"{}|^`\]-[#x00-#x20])* '>'
/// ```
pub fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

/// SPARQL whitespace: space, tab, CR, LF.
pub fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Whether a word ending just before `next` is complete.
///
/// Keywords, booleans and names must not run into further name characters.
pub fn ends_word(next: Option<char>) -> bool {
    !next.is_some_and(|c| is_pn_chars(c) || c == ':')
}
