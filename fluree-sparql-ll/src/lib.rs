//! SPARQL lexer and table-driven LL(1) parser for Fluree DB.
//!
//! This crate turns SPARQL query text into typed tokens, then drives a
//! production table over those tokens and reports what it recognizes as a
//! flat stream of enter / token / exit events. It validates syntax only: no
//! AST or query plan is built.
//!
//! # Example
//!
//! ```
//! use fluree_sparql_ll::{is_valid, parse, ParseEvent, ParseOptions, TokenKind, Value};
//!
//! let events = parse("LIMIT 10", "LimitClause", &ParseOptions::default()).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::enter("LimitClause"),
//!         ParseEvent::token("LimitClause", TokenKind::Keyword, Value::text("limit")),
//!         ParseEvent::token("LimitClause", TokenKind::NumericLiteral, Value::from(10)),
//!         ParseEvent::exit("LimitClause"),
//!     ]
//! );
//!
//! assert!(is_valid("SELECT ?s WHERE { ?s ?p ?o }"));
//! assert!(!is_valid("SELECT WHERE"));
//! ```

pub mod error;
pub mod grammar;
pub mod lex;
pub mod options;
pub mod parse;
pub mod span;

pub use error::{LexError, ParseError, Result, SparqlError};
pub use grammar::{GrammarTable, GrammarTableBuilder, Term};
pub use lex::{tokenize, Lexer, Token, TokenKind, Value};
pub use options::ParseOptions;
pub use parse::{EventCollector, NullSink, ParseEvent, ParseSink, Parser};
pub use span::SourceSpan;

/// Tokenize `input`, logging each token at `TRACE` when `options.trace` is set.
pub fn tokenize_with(
    input: &str,
    options: &ParseOptions,
) -> std::result::Result<Vec<Token>, LexError> {
    Lexer::new(input).with_trace(options.trace).tokenize()
}

/// Parse `input` from production `start` of the bundled SPARQL table.
pub fn parse(input: &str, start: &str, options: &ParseOptions) -> Result<Vec<ParseEvent>> {
    parse_with(GrammarTable::sparql(), input, start, options)
}

/// Parse `input` from production `start` of an arbitrary table.
pub fn parse_with(
    table: &GrammarTable,
    input: &str,
    start: &str,
    options: &ParseOptions,
) -> Result<Vec<ParseEvent>> {
    Parser::new(table)
        .with_options(options.clone())
        .parse(input, start)
}

/// Whether `input` is a complete SPARQL query.
pub fn is_valid(input: &str) -> bool {
    Parser::new(GrammarTable::sparql())
        .parse_into(input, grammar::START, parse::NullSink)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_select() {
        assert!(is_valid("SELECT * WHERE { ?s ?p ?o }"));
        assert!(is_valid("select distinct ?s where { ?s a ?type } limit 5"));
    }

    #[test]
    fn test_is_valid_rejects() {
        assert!(!is_valid(""));
        assert!(!is_valid("SELECT * WHERE { ?s ?p ?o } }"));
        assert!(!is_valid("SELECT * WHERE { ?s ?p ~ }"));
    }

    #[test]
    fn test_tokenize_with_matches_tokenize() {
        let input = "SELECT ?x WHERE { ?x ?p [] }";
        let traced = tokenize_with(input, &ParseOptions::new().with_trace(true)).unwrap();
        assert_eq!(traced, tokenize(input).unwrap());
        assert!(tokenize_with("?x ~", &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_parse_with_custom_table() {
        let table = GrammarTable::builder()
            .rule("Start", "true", [Term::terminal("BooleanLiteral")])
            .rule("Start", "BooleanLiteral", [Term::terminal("BooleanLiteral")])
            .build();
        let events = parse_with(&table, "true", "Start", &ParseOptions::default()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            ParseEvent::token("Start", TokenKind::BooleanLiteral, Value::Boolean(true))
        );
    }

    #[test]
    fn test_error_reports_production() {
        let err = parse("LIMIT", "LimitClause", &ParseOptions::default()).unwrap_err();
        let parse_err = err.as_parse().unwrap();
        assert_eq!(parse_err.production(), "LimitClause");
        assert!(parse_err.is_end_of_input());
    }
}
