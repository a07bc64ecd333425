//! Table-driven LL(1) driver.
//!
//! The driver walks a [`GrammarTable`] with an explicit stack of frames, one
//! per open production, so nesting depth is bounded by heap memory rather
//! than the native call stack.
//!
//! Each frame starts unopened. Opening it emits `Enter` and selects the
//! branch keyed by the lookahead token's representation (or
//! [`END_OF_INPUT`] once the tokens run out). Terminal terms consume one
//! token each; production terms push a new frame. A frame whose terms are
//! exhausted is popped with an `Exit`.

use std::slice;
use std::sync::Arc;

use super::event::{EventCollector, ParseEvent, ParseSink, TraceSink};
use crate::error::{ParseError, Result};
use crate::grammar::{GrammarTable, Term, END_OF_INPUT};
use crate::lex::{Lexer, Token};
use crate::options::ParseOptions;

/// One open production on the parse stack.
struct Frame<'t> {
    production: Arc<str>,
    /// Remaining terms of the selected branch; `None` until opened
    pending: Option<slice::Iter<'t, Term>>,
}

impl Frame<'_> {
    fn unopened(production: Arc<str>) -> Self {
        Self {
            production,
            pending: None,
        }
    }
}

/// Parser over a grammar table.
#[derive(Clone, Debug)]
pub struct Parser<'t> {
    table: &'t GrammarTable,
    options: ParseOptions,
}

impl<'t> Parser<'t> {
    pub fn new(table: &'t GrammarTable) -> Self {
        Self {
            table,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Tokenize and parse `input` from `start`, collecting the events.
    pub fn parse(&self, input: &str, start: &str) -> Result<Vec<ParseEvent>> {
        let mut sink = EventCollector::new();
        self.parse_into(input, start, &mut sink)?;
        Ok(sink.finish())
    }

    /// Tokenize and parse `input` from `start`, reporting events to `sink`.
    pub fn parse_into<S: ParseSink>(&self, input: &str, start: &str, sink: S) -> Result<()> {
        let tokens = Lexer::new(input)
            .with_trace(self.options.trace)
            .tokenize()?;
        self.parse_tokens(&tokens, start, sink)?;
        Ok(())
    }

    /// Parse an already tokenized input.
    pub fn parse_tokens<S: ParseSink>(
        &self,
        tokens: &[Token],
        start: &str,
        sink: S,
    ) -> std::result::Result<(), ParseError> {
        let result = if self.options.trace {
            self.drive(tokens, start, TraceSink::new(sink))
        } else {
            self.drive(tokens, start, sink)
        };

        match &result {
            Ok(()) => tracing::debug!(start, tokens = tokens.len(), "parse succeeded"),
            Err(err) => tracing::debug!(
                start,
                production = err.production(),
                position = ?err.position(),
                error = %err,
                "parse failed"
            ),
        }
        result
    }

    fn drive<S: ParseSink>(
        &self,
        tokens: &[Token],
        start: &str,
        mut sink: S,
    ) -> std::result::Result<(), ParseError> {
        let mut stack: Vec<Frame<'t>> = vec![Frame::unopened(Arc::from(start))];
        let mut cursor = 0;

        'frames: while let Some(top) = stack.last_mut() {
            if top.pending.is_none() {
                sink.on_enter(&top.production);
                let terms = self.select_branch(&top.production, tokens, cursor)?;
                top.pending = Some(terms.iter());
            }

            while let Some(term) = top.pending.as_mut().and_then(Iterator::next) {
                match term {
                    Term::Terminal(expected) => match tokens.get(cursor) {
                        Some(token) if token.representation() == &**expected => {
                            sink.on_token(&top.production, token);
                            cursor += 1;
                        }
                        found => {
                            return Err(ParseError::ExpectedTerm {
                                production: top.production.to_string(),
                                expected: expected.to_string(),
                                found: found.cloned(),
                            });
                        }
                    },
                    Term::Production(name) => {
                        stack.push(Frame::unopened(Arc::clone(name)));
                        continue 'frames;
                    }
                }
            }

            if let Some(done) = stack.pop() {
                sink.on_exit(&done.production);
            }
        }

        match tokens.get(cursor) {
            None => Ok(()),
            Some(found) => Err(ParseError::TrailingInput {
                production: start.to_string(),
                found: found.clone(),
            }),
        }
    }

    /// Pick the branch of `production` for the token at `cursor`.
    fn select_branch(
        &self,
        production: &str,
        tokens: &[Token],
        cursor: usize,
    ) -> std::result::Result<&'t [Term], ParseError> {
        let table = self.table;
        let branches = table
            .branches(production)
            .ok_or_else(|| ParseError::NoExpansion {
                production: production.to_string(),
            })?;

        let found = tokens.get(cursor);
        let key = found.map_or(END_OF_INPUT, Token::representation);
        let terms = (!tokens.is_empty())
            .then(|| branches.get(key))
            .flatten()
            .ok_or_else(|| ParseError::UnexpectedToken {
                production: production.to_string(),
                found: found.cloned(),
                expected: table.alternatives(production),
            })?;
        Ok(terms.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Term;
    use crate::lex::{TokenKind, Value};

    /// `List -> '(' Items ')'`, `Items -> Variable Items | ε`
    fn list_table() -> GrammarTable {
        GrammarTable::builder()
            .rule("List", "(", [Term::terminal("("), Term::production("Items"), Term::terminal(")")])
            .rule("Items", "Variable", [Term::terminal("Variable"), Term::production("Items")])
            .rule("Items", ")", [])
            .build()
    }

    #[test]
    fn test_nested_events() {
        let events = Parser::new(&list_table()).parse("( ?a ?b )", "List").unwrap();
        assert_eq!(
            events,
            vec![
                ParseEvent::enter("List"),
                ParseEvent::token("List", TokenKind::Delimiter, Value::text("(")),
                ParseEvent::enter("Items"),
                ParseEvent::token("Items", TokenKind::Variable, Value::text("a")),
                ParseEvent::enter("Items"),
                ParseEvent::token("Items", TokenKind::Variable, Value::text("b")),
                ParseEvent::enter("Items"),
                ParseEvent::exit("Items"),
                ParseEvent::exit("Items"),
                ParseEvent::exit("Items"),
                ParseEvent::token("List", TokenKind::Delimiter, Value::text(")")),
                ParseEvent::exit("List"),
            ]
        );
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 50_000;
        let input = format!("( {} )", "?v ".repeat(depth));
        let events = Parser::new(&list_table()).parse(&input, "List").unwrap();
        assert_eq!(events.len(), 4 + 3 * depth + 2);
    }

    #[test]
    fn test_unexpected_token_lists_sorted_keys() {
        let err = Parser::new(&list_table()).parse("( 1 )", "List").unwrap_err();
        match err.as_parse() {
            Some(ParseError::UnexpectedToken {
                production,
                found: Some(found),
                expected,
            }) => {
                assert_eq!(production, "Items");
                assert_eq!(found.kind, TokenKind::NumericLiteral);
                assert_eq!(expected, &vec![")".to_string(), "Variable".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_end_of_input_without_end_branch() {
        let err = Parser::new(&list_table()).parse("( ?a", "List").unwrap_err();
        let parse = err.as_parse().unwrap();
        // `Items` has no end-of-input branch in this table
        assert_eq!(parse.production(), "Items");
        assert!(parse.is_end_of_input());
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_terminal_mismatch() {
        let table = GrammarTable::builder()
            .rule("Pair", "(", [Term::terminal("("), Term::terminal("Variable"), Term::terminal(")")])
            .build();
        let err = Parser::new(&table).parse("( ?a ?b", "Pair").unwrap_err();
        match err.as_parse() {
            Some(ParseError::ExpectedTerm {
                production,
                expected,
                found: Some(found),
            }) => {
                assert_eq!(production, "Pair");
                assert_eq!(expected, ")");
                assert_eq!(found.kind, TokenKind::Variable);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let err = Parser::new(&table).parse("( ?a", "Pair").unwrap_err();
        assert!(err.as_parse().unwrap().is_end_of_input());
    }

    #[test]
    fn test_missing_production() {
        let table = GrammarTable::builder()
            .rule("A", "x", [Term::production("B")])
            .build();
        let tokens = vec![Token::new(
            TokenKind::Keyword,
            Value::text("x"),
            crate::span::SourceSpan::new(0, 1),
        )];
        let err = Parser::new(&table)
            .parse_tokens(&tokens, "A", EventCollector::new())
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::NoExpansion {
                production: "B".to_string()
            }
        );
    }

    #[test]
    fn test_trailing_input() {
        let err = Parser::new(&list_table()).parse("( ?a ) )", "List").unwrap_err();
        match err.as_parse() {
            Some(ParseError::TrailingInput { production, found }) => {
                assert_eq!(production, "List");
                assert!(*found == ")");
                assert_eq!(found.span.start, 7);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_fails_even_with_epsilon_branch() {
        let table = GrammarTable::builder().rule("Opt", "$", []).build();
        let err = Parser::new(&table).parse("", "Opt").unwrap_err();
        assert!(err.as_parse().unwrap().is_end_of_input());
        // but the end marker closes it after some input
        let table = GrammarTable::builder()
            .rule("S", "a", [Term::terminal("a"), Term::production("Opt")])
            .rule("Opt", "$", [])
            .build();
        assert!(Parser::new(&table).parse("a", "S").is_ok());
    }

    #[test]
    fn test_lex_error_surfaces() {
        let err = Parser::new(&list_table()).parse("( ~ )", "List").unwrap_err();
        assert!(err.as_lex().is_some());
    }

    #[test]
    fn test_trace_option_keeps_events() {
        let table = list_table();
        let plain = Parser::new(&table).parse("( ?a )", "List").unwrap();
        let traced = Parser::new(&table)
            .with_options(ParseOptions::new().with_trace(true))
            .parse("( ?a )", "List")
            .unwrap();
        assert_eq!(plain, traced);
    }
}
