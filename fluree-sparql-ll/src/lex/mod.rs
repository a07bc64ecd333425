//! SPARQL lexer module.
//!
//! Tokenizes SPARQL query text using winnow. Unicode escapes are decoded
//! over the whole input before any token rule runs.

pub mod chars;
pub mod escape;
pub mod keywords;
pub mod lexer;
pub mod token;

pub use escape::decode_unicode_escapes;
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind, Value, ANON_BLANK_PREFIX};
