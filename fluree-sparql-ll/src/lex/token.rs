//! SPARQL token types.
//!
//! A token pairs a [`TokenKind`] with a decoded [`Value`]. Which value
//! variant a kind carries is fixed, so consumers can match on both without
//! re-checking. Every token also knows its *representation*: the key used to
//! index the grammar table.

use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

use crate::span::SourceSpan;

/// Prefix of identifiers generated for `[]`.
///
/// No `_:` label can start with `[`, so generated ids never collide with
/// labelled blank nodes.
pub const ANON_BLANK_PREFIX: &str = "[]";

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token kind
    pub kind: TokenKind,
    /// The decoded value
    pub value: Value,
    /// Source location, in bytes of the escape-decoded input
    pub span: SourceSpan,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, value: Value, span: SourceSpan) -> Self {
        Self { kind, value, span }
    }

    /// The grammar-table key for this token.
    ///
    /// Typed tokens are keyed by their kind tag; keywords, delimiters and
    /// operators by their literal text.
    pub fn representation(&self) -> &str {
        match self.kind.tag() {
            Some(tag) => tag,
            None => match &self.value {
                Value::Text(s) => &**s,
                // Untyped kinds always carry text; fall back to the kind name
                _ => self.kind.name(),
            },
        }
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, key: &str) -> bool {
        self.representation() == key
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, key: &&str) -> bool {
        self.representation() == *key
    }
}

impl fmt::Display for Token {
    /// Renders the token back to SPARQL surface syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Variable, Value::Text(name)) => write!(f, "?{}", name),
            (TokenKind::LangTag, Value::Text(tag)) => write!(f, "@{}", tag),
            _ => write!(f, "{}", self.value),
        }
    }
}

/// Token kinds for SPARQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `?name` or `$name`
    Variable,
    /// `<http://example.org/>`
    IriRef,
    /// `prefix:local` or `:local`
    PrefixedNameWithLocal,
    /// `prefix:` or `:`
    PrefixedNameNamespace,
    /// Any of the four quoted string forms
    StringLiteral,
    /// `@en-US`
    LangTag,
    /// Integer, decimal or double
    NumericLiteral,
    /// `true` / `false`
    BooleanLiteral,
    /// `_:label` or `[]`
    BlankNode,
    /// `()`
    Nil,
    /// Keyword or built-in function name
    Keyword,
    /// Punctuation: `{ } ( ) [ ] ; , . ^^`
    Delimiter,
    /// `|| && != <= >= = < > + - * / ! ^ | ?`
    Operator,
}

impl TokenKind {
    /// The grammar-table key for typed kinds, `None` for untyped ones.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            TokenKind::Keyword | TokenKind::Delimiter | TokenKind::Operator => None,
            typed => Some(typed.name()),
        }
    }

    /// Stable name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Variable => "Variable",
            TokenKind::IriRef => "IriRef",
            TokenKind::PrefixedNameWithLocal => "PrefixedNameWithLocal",
            TokenKind::PrefixedNameNamespace => "PrefixedNameNamespace",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::LangTag => "LangTag",
            TokenKind::NumericLiteral => "NumericLiteral",
            TokenKind::BooleanLiteral => "BooleanLiteral",
            TokenKind::BlankNode => "BlankNode",
            TokenKind::Nil => "Nil",
            TokenKind::Keyword => "Keyword",
            TokenKind::Delimiter => "Delimiter",
            TokenKind::Operator => "Operator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded token values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Symbol text: keywords (lowercased), punctuation, variable names,
    /// language tags and the NIL marker
    Text(Arc<str>),
    /// String literal content with escapes decoded
    String(Arc<str>),
    /// Arbitrary-precision integer
    Integer(BigInt),
    /// Exact decimal
    Decimal(BigDecimal),
    /// Double-precision float
    Double(f64),
    /// `true` / `false`
    Boolean(bool),
    /// IRI reference content (between the angle brackets)
    Iri(Arc<str>),
    /// Blank node identifier (label, or generated for `[]`)
    BlankNode(Arc<str>),
    /// Prefixed name; an absent prefix is the default namespace and an absent
    /// local name means a namespace-only token
    PrefixedName {
        prefix: Option<Arc<str>>,
        local: Option<Arc<str>>,
    },
}

impl Value {
    /// Text value from anything string-like.
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Arc::from(s.as_ref()))
    }

    /// Decoded string literal value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// IRI value.
    pub fn iri(s: impl AsRef<str>) -> Self {
        Value::Iri(Arc::from(s.as_ref()))
    }

    /// Prefixed-name value; empty prefix or local parts become `None`.
    pub fn prefixed(prefix: &str, local: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| Arc::from(s));
        Value::PrefixedName {
            prefix: non_empty(prefix),
            local: non_empty(local),
        }
    }

    /// Whether this is a blank node generated for `[]` rather than labelled.
    pub fn is_anonymous_blank(&self) -> bool {
        matches!(self, Value::BlankNode(id) if id.starts_with(ANON_BLANK_PREFIX))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(BigInt::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    /// SPARQL surface form of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::String(s) => write_quoted(f, s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => write_decimal(f, d),
            Value::Double(n) => write_double(f, *n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Iri(s) => write!(f, "<{}>", s),
            Value::BlankNode(_) if self.is_anonymous_blank() => f.write_str("[]"),
            Value::BlankNode(s) => write!(f, "_:{}", s),
            Value::PrefixedName { prefix, local } => write!(
                f,
                "{}:{}",
                prefix.as_deref().unwrap_or(""),
                local.as_deref().unwrap_or("")
            ),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\x08' => f.write_str("\\b")?,
            '\x0C' => f.write_str("\\f")?,
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Decimals are written positionally and always carry a point, so they
/// re-lex as decimals with the same scale.
fn write_decimal(f: &mut fmt::Formatter<'_>, d: &BigDecimal) -> fmt::Result {
    let (digits, scale) = d.as_bigint_and_exponent();
    let sign = if digits.sign() == Sign::Minus { "-" } else { "" };
    let magnitude = digits.magnitude().to_string();

    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return write!(f, "{}{}{}.0", sign, magnitude, zeros);
    }

    let scale = scale as usize;
    let padded = if magnitude.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - magnitude.len()), magnitude)
    } else {
        magnitude
    };
    let (whole, frac) = padded.split_at(padded.len() - scale);
    write!(f, "{}{}.{}", sign, whole, frac)
}

/// Doubles always carry an exponent so they re-lex as doubles.
fn write_double(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("\"NaN\"")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "\"INF\"" } else { "\"-INF\"" })
    } else {
        write!(f, "{:e}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn token(kind: TokenKind, value: Value) -> Token {
        Token::new(kind, value, SourceSpan::default())
    }

    #[test]
    fn test_representation_typed_kinds_use_tag() {
        let var = token(TokenKind::Variable, Value::text("x"));
        assert_eq!(var.representation(), "Variable");
        let num = token(TokenKind::NumericLiteral, Value::from(10));
        assert_eq!(num.representation(), "NumericLiteral");
        let pname = token(TokenKind::PrefixedNameWithLocal, Value::prefixed("dc", "title"));
        assert_eq!(pname.representation(), "PrefixedNameWithLocal");
    }

    #[test]
    fn test_representation_untyped_kinds_use_text() {
        let kw = token(TokenKind::Keyword, Value::text("select"));
        assert_eq!(kw.representation(), "select");
        assert!(kw == "select");
        assert!(kw != "SELECT");
        let op = token(TokenKind::Operator, Value::text("<="));
        assert!(op == "<=");
    }

    #[test]
    fn test_prefixed_value_absent_parts() {
        assert_eq!(
            Value::prefixed("", "title"),
            Value::PrefixedName {
                prefix: None,
                local: Some(Arc::from("title")),
            }
        );
        assert_eq!(
            Value::prefixed("dc", ""),
            Value::PrefixedName {
                prefix: Some(Arc::from("dc")),
                local: None,
            }
        );
    }

    #[test]
    fn test_display_surface_forms() {
        assert_eq!(token(TokenKind::Variable, Value::text("x")).to_string(), "?x");
        assert_eq!(token(TokenKind::LangTag, Value::text("en")).to_string(), "@en");
        assert_eq!(Value::iri("http://ex/").to_string(), "<http://ex/>");
        assert_eq!(Value::prefixed("", "t").to_string(), ":t");
        assert_eq!(Value::string("a\"b\n").to_string(), "\"a\\\"b\\n\"");
        assert_eq!(Value::BlankNode(Arc::from("b0")).to_string(), "_:b0");
        let anon = Value::BlankNode(Arc::from(format!("{}0", ANON_BLANK_PREFIX)));
        assert!(anon.is_anonymous_blank());
        assert_eq!(anon.to_string(), "[]");
        assert!(!Value::BlankNode(Arc::from("b0")).is_anonymous_blank());
    }

    #[test]
    fn test_display_numeric_forms_keep_their_class() {
        let dec = BigDecimal::from_str("42").unwrap();
        assert_eq!(Value::Decimal(dec).to_string(), "42.0");
        let dec = BigDecimal::from_str("-0.50").unwrap();
        assert_eq!(Value::Decimal(dec).to_string(), "-0.50");
        let dec = BigDecimal::from_str("0.0000000001").unwrap();
        assert_eq!(Value::Decimal(dec).to_string(), "0.0000000001");
        assert_eq!(Value::Double(1500.0).to_string(), "1.5e3");
        assert_eq!(Value::from(-7).to_string(), "-7");
    }
}
