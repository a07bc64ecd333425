//! Error types for SPARQL lexing and table-driven parsing.

use crate::lex::Token;

/// Maximum number of characters of unmatched input echoed in messages.
const REMAINDER_PREVIEW: usize = 24;

/// Lexical error: no token pattern matches at the current position.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error: {message}")]
pub struct LexError {
    /// Byte offset of the failure in the (escape-decoded) input
    pub position: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in characters)
    pub column: u32,
    /// The unmatched remainder of the input
    pub remainder: String,
    /// Human readable description, including a source pointer
    pub message: String,
}

impl LexError {
    /// A short preview of the unmatched input, for log lines.
    pub fn remainder_preview(&self) -> &str {
        match self.remainder.char_indices().nth(REMAINDER_PREVIEW) {
            Some((idx, _)) => &self.remainder[..idx],
            None => &self.remainder,
        }
    }
}

/// Parse error raised by the table-driven driver.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The grammar table has no entry at all for the production
    #[error("no expansion defined for production {production}")]
    NoExpansion { production: String },

    /// The lookahead key has no expansion for the current production
    #[error(
        "unexpected {} for production {production}, expected one of: {}",
        describe(.found.as_ref()),
        .expected.join(", ")
    )]
    UnexpectedToken {
        production: String,
        found: Option<Token>,
        expected: Vec<String>,
    },

    /// A terminal term did not match the next token
    #[error("expected {expected} in production {production}, found {}", describe(.found.as_ref()))]
    ExpectedTerm {
        production: String,
        expected: String,
        found: Option<Token>,
    },

    /// The start production closed before the token stream was exhausted
    #[error("trailing input after production {production}: '{found}' ({})", .found.kind)]
    TrailingInput { production: String, found: Token },
}

impl ParseError {
    /// The production the error was raised in.
    pub fn production(&self) -> &str {
        match self {
            ParseError::NoExpansion { production }
            | ParseError::UnexpectedToken { production, .. }
            | ParseError::ExpectedTerm { production, .. }
            | ParseError::TrailingInput { production, .. } => production,
        }
    }

    /// The offending token, or `None` for end of input.
    pub fn found(&self) -> Option<&Token> {
        match self {
            ParseError::NoExpansion { .. } => None,
            ParseError::UnexpectedToken { found, .. } | ParseError::ExpectedTerm { found, .. } => {
                found.as_ref()
            }
            ParseError::TrailingInput { found, .. } => Some(found),
        }
    }

    /// Whether the error was caused by running out of tokens.
    pub fn is_end_of_input(&self) -> bool {
        matches!(
            self,
            ParseError::UnexpectedToken { found: None, .. }
                | ParseError::ExpectedTerm { found: None, .. }
        )
    }

    /// Byte offset of the offending token, when there is one.
    pub fn position(&self) -> Option<usize> {
        self.found().map(|t| t.span.start)
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(t) => format!("'{}' ({})", t, t.kind),
        None => "end of input".to_string(),
    }
}

/// Error type for the crate's entry points.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SparqlError {
    /// Tokenization failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Table-driven parsing failed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SparqlError {
    /// Returns the parse error, if this is one.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            SparqlError::Parse(e) => Some(e),
            SparqlError::Lex(_) => None,
        }
    }

    /// Returns the lexical error, if this is one.
    pub fn as_lex(&self) -> Option<&LexError> {
        match self {
            SparqlError::Lex(e) => Some(e),
            SparqlError::Parse(_) => None,
        }
    }
}

/// Result type for SPARQL lexing and parsing
pub type Result<T> = std::result::Result<T, SparqlError>;
