//! SPARQL lexer implementation using winnow.
//!
//! The lexer is a lazy, single-pass iterator over the query text. Patterns
//! are tried in a fixed priority order because several of them overlap
//! (a bare word may be a keyword or the start of a prefixed name, `<` may
//! open an IRI or be an operator, `1.` is a decimal before it is a dot).
//! The first lexical error ends the stream.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::escape::decode_unicode_escapes;
use super::keywords::lookup_keyword;
use super::token::{Token, TokenKind, Value, ANON_BLANK_PREFIX};
use crate::error::LexError;
use crate::span::{LineCol, LineIndex, SourceSpan};

/// Input type for the lexer - tracks position for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

type Lexeme = (TokenKind, Value);

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Lexer for SPARQL queries.
///
/// Iterating yields `Ok(token)` until the input is exhausted, or a single
/// `Err` after which the iterator is finished.
pub struct Lexer<'a> {
    source: Cow<'a, str>,
    offset: usize,
    anon_ids: u32,
    finished: bool,
    trace: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer, decoding `\u` / `\U` escapes in the whole input first.
    pub fn new(input: &'a str) -> Self {
        Self {
            source: decode_unicode_escapes(input),
            offset: 0,
            anon_ids: 0,
            finished: false,
            trace: false,
        }
    }

    /// Log every produced token at `TRACE` level.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// The escape-decoded text the lexer is scanning.
    ///
    /// Token spans index into this text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tokenize the remaining input.
    ///
    /// Returns an error on the first invalid token; no partial token list is
    /// returned.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    fn make_error(&self, position: usize) -> LexError {
        let source: &str = &self.source;
        let remainder = source.get(position..).unwrap_or("");
        let bad_char = remainder.chars().next().unwrap_or('?');

        let index = LineIndex::new(source);
        let LineCol { line, col: column } = index.locate(position);
        let line_content = index.line_text(line);

        let pointer = " ".repeat(column.saturating_sub(1) as usize);
        let what = match bad_char {
            '"' | '\'' => "unterminated or invalid string literal".to_string(),
            '<' => "invalid or unterminated IRI".to_string(),
            '\\' => "invalid escape sequence".to_string(),
            c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                "numeric literal out of range".to_string()
            }
            c if !c.is_ascii() => format!("unexpected character '{}' (U+{:04X})", c, c as u32),
            c => format!("unexpected character '{}'", c),
        };
        let message = format!(
            "{} at line {}, column {}\n  |\n{} | {}\n  | {}^",
            what, line, column, line, line_content, pointer
        );

        LexError {
            position,
            line,
            column,
            remainder: remainder.to_string(),
            message,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut input = Input::new(&*self.source);
        input.next_slice(self.offset);
        skip_ws_and_comments(&mut input);

        if input.is_empty() {
            self.finished = true;
            return None;
        }

        let start = input.current_token_start();
        match next_token(&mut input, &mut self.anon_ids) {
            Ok((kind, value)) => {
                let end = input.current_token_start();
                self.offset = end;
                let token = Token::new(kind, value, SourceSpan::new(start, end));
                if self.trace {
                    tracing::trace!(kind = %token.kind, token = %token, start, end, "lexed token");
                }
                Some(Ok(token))
            }
            Err(_) => {
                self.finished = true;
                let err = self.make_error(start);
                tracing::debug!(
                    line = err.line,
                    column = err.column,
                    remainder = err.remainder_preview(),
                    "lexing failed"
                );
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Skip whitespace and `#` comments.
fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);

        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c: char| c == '\n' || c == '\r').parse_next(input);
        } else {
            break;
        }
    }
}

/// Match the next token in priority order.
fn next_token(input: &mut Input<'_>, anon_ids: &mut u32) -> ModalResult<Lexeme> {
    alt((
        alt((
            parse_variable,
            parse_iri_ref,
            parse_prefixed_name_with_local,
            parse_prefixed_name_namespace,
            parse_string_literal,
            parse_lang_tag,
            parse_number,
            parse_boolean,
        )),
        alt((
            |i: &mut Input<'_>| parse_blank_node(i, anon_ids),
            parse_nil,
            parse_keyword,
            parse_delimiter,
            parse_operator,
        )),
    ))
    .parse_next(input)
}

/// Succeeds without consuming when the next character cannot extend a word.
fn word_boundary(input: &mut Input<'_>) -> ModalResult<()> {
    if ends_word(input.chars().next()) {
        Ok(())
    } else {
        backtrack()
    }
}

// =============================================================================
// Variables and IRIs
// =============================================================================

/// `?name` or `$name`
fn parse_variable(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    preceded(
        one_of(['?', '$']),
        (
            take_while(1, is_varname_start),
            take_while(0.., is_varname_char),
        )
            .take(),
    )
    .map(|name: &str| (TokenKind::Variable, Value::text(name)))
    .parse_next(input)
}

/// `<...>`; the empty IRI is a valid relative reference.
fn parse_iri_ref(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    delimited('<', take_while(0.., is_iri_char), '>')
        .map(|iri: &str| (TokenKind::IriRef, Value::iri(iri)))
        .parse_next(input)
}

// =============================================================================
// Prefixed Names
// =============================================================================

/// `PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?`
fn parse_pn_prefix<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (take_while(1, is_pn_chars_base), dotted_tail(is_pn_chars))
        .take()
        .parse_next(input)
}

/// Zero or more `accept` characters, allowing interior (never trailing) dots.
fn dotted_tail<'a>(accept: fn(char) -> bool) -> impl Parser<Input<'a>, (), ErrMode<ContextError>> {
    move |input: &mut Input<'a>| {
        loop {
            let _: &str = take_while(0.., accept).parse_next(input)?;
            if !input.starts_with('.') {
                return Ok(());
            }
            let after_dots = input.trim_start_matches('.');
            if !after_dots.chars().next().is_some_and(accept) {
                return Ok(());
            }
            let _: &str = take_while(1.., '.').parse_next(input)?;
        }
    }
}

/// Parse a local name (after the colon in a prefixed name).
///
/// `%XX` sequences are kept verbatim; `\`-escaped characters are unescaped.
fn parse_pn_local(input: &mut Input<'_>) -> ModalResult<String> {
    let first = input.chars().next();
    if !first.is_some_and(|c| is_pn_local_start(c) || c == '%' || c == '\\') {
        return backtrack();
    }

    let local_char = |c: char| is_pn_chars(c) || c == ':';
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., local_char).parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('%') {
            let hex: &str = preceded('%', take_while(2, AsChar::is_hex_digit)).parse_next(input)?;
            result.push('%');
            result.push_str(hex);
        } else if input.starts_with('\\') {
            let escaped: char = preceded('\\', any).parse_next(input)?;
            if !LOCAL_ESCAPABLE.contains(escaped) {
                return backtrack();
            }
            result.push(escaped);
        } else if input.starts_with('.') {
            let after_dots = input.trim_start_matches('.');
            let continues = after_dots
                .chars()
                .next()
                .is_some_and(|c| local_char(c) || c == '%' || c == '\\');
            if !continues {
                break;
            }
            let dots: &str = take_while(1.., '.').parse_next(input)?;
            result.push_str(dots);
        } else {
            break;
        }
    }

    Ok(result)
}

/// `PNAME_LN ::= PNAME_NS PN_LOCAL`
fn parse_prefixed_name_with_local(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    (opt(parse_pn_prefix), ':', parse_pn_local)
        .map(|(prefix, _, local)| {
            (
                TokenKind::PrefixedNameWithLocal,
                Value::prefixed(prefix.unwrap_or(""), &local),
            )
        })
        .parse_next(input)
}

/// `PNAME_NS ::= PN_PREFIX? ':'`
fn parse_prefixed_name_namespace(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    (opt(parse_pn_prefix), ':')
        .map(|(prefix, _)| {
            (
                TokenKind::PrefixedNameNamespace,
                Value::prefixed(prefix.unwrap_or(""), ""),
            )
        })
        .parse_next(input)
}

// =============================================================================
// String Literals and Language Tags
// =============================================================================

/// Parse a string literal; the long forms are tried before the short ones.
fn parse_string_literal(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    alt((
        |i: &mut Input<'_>| parse_long_string(i, '"'),
        |i: &mut Input<'_>| parse_long_string(i, '\''),
        |i: &mut Input<'_>| parse_short_string(i, '"'),
        |i: &mut Input<'_>| parse_short_string(i, '\''),
    ))
    .map(|s: String| (TokenKind::StringLiteral, Value::string(s)))
    .parse_next(input)
}

/// `'...'` / `"..."`: no raw line breaks, no unescaped delimiter.
fn parse_short_string(input: &mut Input<'_>, mut quote: char) -> ModalResult<String> {
    quote.parse_next(input)?;
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| c != quote && c != '\\' && c != '\n' && c != '\r')
            .parse_next(input)?;
        result.push_str(chunk);

        if input.starts_with('\\') {
            result.push(parse_echar(input)?);
        } else {
            break;
        }
    }

    quote.parse_next(input)?;
    Ok(result)
}

/// `'''...'''` / `"""..."""`: quotes allowed inside unless three in a row.
fn parse_long_string(input: &mut Input<'_>, quote: char) -> ModalResult<String> {
    let fence: String = std::iter::repeat(quote).take(3).collect();
    fence.as_str().parse_next(input)?;
    let mut result = String::new();

    loop {
        let chunk: &str = take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
        result.push_str(chunk);

        if input.is_empty() || input.starts_with(fence.as_str()) {
            break;
        }

        if input.starts_with('\\') {
            result.push(parse_echar(input)?);
        } else {
            let c: char = any.parse_next(input)?;
            result.push(c);
        }
    }

    fence.as_str().parse_next(input)?;
    Ok(result)
}

/// `ECHAR ::= '\' [tbnrf\"']`
fn parse_echar(input: &mut Input<'_>) -> ModalResult<char> {
    preceded('\\', any)
        .verify_map(|c| match c {
            't' => Some('\t'),
            'b' => Some('\x08'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\x0C'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '\\' => Some('\\'),
            _ => None,
        })
        .parse_next(input)
}

/// `LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`
fn parse_lang_tag(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    preceded(
        '@',
        (
            take_while(1.., AsChar::is_alpha),
            repeat::<_, _, (), _, _>(
                0..,
                ('-', take_while(1.., AsChar::is_alphanum)),
            ),
        )
            .take(),
    )
    .map(|tag: &str| (TokenKind::LangTag, Value::text(tag)))
    .parse_next(input)
}

// =============================================================================
// Numbers
// =============================================================================

/// Double before decimal before integer, so the longest form wins.
fn parse_number(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    alt((parse_double, parse_decimal, parse_integer))
        .map(|value| (TokenKind::NumericLiteral, value))
        .parse_next(input)
}

fn sign<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    opt(one_of(['+', '-'])).take().parse_next(input)
}

/// `[+-]? (digits '.' digits? | '.' digits | digits) [eE] [+-]? digits`
fn parse_double(input: &mut Input<'_>) -> ModalResult<Value> {
    let text: &str = (
        sign,
        alt((
            (digit1, '.', digit0).take(),
            ('.', digit1).take(),
            digit1,
        )),
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        digit1,
    )
        .take()
        .parse_next(input)?;

    // Out-of-range exponents fail the token rather than becoming infinity
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Double(n)),
        _ => Err(ErrMode::Cut(ContextError::new())),
    }
}

/// `[+-]? (digits '.' digits? | '.' digits)`
fn parse_decimal(input: &mut Input<'_>) -> ModalResult<Value> {
    let (sign, (whole, frac)) = (
        sign,
        alt((
            (digit1, preceded('.', digit0)),
            preceded('.', digit1).map(|frac| ("", frac)),
        )),
    )
        .parse_next(input)?;

    let whole = if whole.is_empty() { "0" } else { whole };
    let frac = if frac.is_empty() { "0" } else { frac };
    let sign = if sign == "-" { "-" } else { "" };

    match BigDecimal::from_str(&format!("{}{}.{}", sign, whole, frac)) {
        Ok(d) => Ok(Value::Decimal(d)),
        Err(_) => backtrack(),
    }
}

/// `[+-]? digits`
fn parse_integer(input: &mut Input<'_>) -> ModalResult<Value> {
    let (sign, digits) = (sign, digit1).parse_next(input)?;
    let sign = if sign == "-" { "-" } else { "" };

    match BigInt::from_str(&format!("{}{}", sign, digits)) {
        Ok(n) => Ok(Value::Integer(n)),
        Err(_) => backtrack(),
    }
}

// =============================================================================
// Booleans, Blank Nodes, NIL
// =============================================================================

fn parse_boolean(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    alt(("true".value(true), "false".value(false)))
        .map(|b| (TokenKind::BooleanLiteral, Value::Boolean(b)))
        .parse_next(input)
        .and_then(|lexeme| word_boundary(input).map(|_| lexeme))
}

/// `_:label`, or `[ ]` which gets a fresh identifier.
fn parse_blank_node(input: &mut Input<'_>, anon_ids: &mut u32) -> ModalResult<Lexeme> {
    if input.starts_with("_:") {
        let label: &str = preceded(
            "_:",
            (
                take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
                dotted_tail(is_pn_chars),
            )
                .take(),
        )
        .parse_next(input)?;
        return Ok((TokenKind::BlankNode, Value::BlankNode(Arc::from(label))));
    }

    ('[', take_while(0.., is_ws), ']').parse_next(input)?;
    let id = format!("{}{}", ANON_BLANK_PREFIX, *anon_ids);
    *anon_ids += 1;
    Ok((TokenKind::BlankNode, Value::BlankNode(Arc::from(id))))
}

/// `( )`, with optional whitespace inside.
fn parse_nil(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    ('(', take_while(0.., is_ws), ')')
        .map(|_| (TokenKind::Nil, Value::text("()")))
        .parse_next(input)
}

// =============================================================================
// Keywords, Delimiters, Operators
// =============================================================================

/// Case-insensitive keyword or built-in function name, emitted lowercased.
fn parse_keyword(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    let word: &str =
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    word_boundary(input)?;

    match lookup_keyword(word) {
        Some(kw) => Ok((TokenKind::Keyword, Value::text(kw))),
        None => backtrack(),
    }
}

/// Multi-character delimiters are tried before single characters.
fn parse_delimiter(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    alt((
        "^^",
        one_of(['{', '}', '(', ')', '[', ']', ';', ',', '.']).take(),
    ))
    .map(|sym: &str| (TokenKind::Delimiter, Value::text(sym)))
    .parse_next(input)
}

/// Multi-character operators are tried before single characters.
fn parse_operator(input: &mut Input<'_>) -> ModalResult<Lexeme> {
    alt((
        alt(("||", "&&", "!=", "<=", ">=")),
        one_of(['=', '<', '>', '+', '-', '*', '/', '!', '^', '|', '?']).take(),
    ))
    .map(|sym: &str| (TokenKind::Operator, Value::text(sym)))
    .parse_next(input)
}

/// Tokenize a SPARQL query string.
///
/// Returns an error immediately on the first invalid token, with line/column
/// information and source context.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
