//! Parse events and the sinks that receive them.
//!
//! The driver never builds a tree. It reports what it does as a flat stream
//! of events, and the caller decides what to keep.
//!
//! # Example
//!
//! ```
//! use fluree_sparql_ll::{EventCollector, GrammarTable, Parser, ParseEvent};
//!
//! let mut sink = EventCollector::new();
//! Parser::new(GrammarTable::sparql())
//!     .parse_into("LIMIT 10", "LimitClause", &mut sink)
//!     .unwrap();
//!
//! let events = sink.finish();
//! assert_eq!(events.first(), Some(&ParseEvent::enter("LimitClause")));
//! assert_eq!(events.last(), Some(&ParseEvent::exit("LimitClause")));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::lex::{Token, TokenKind, Value};

/// Log target used for trace output.
pub const TRACE_TARGET: &str = "fluree_sparql_ll::trace";

/// One step of a parse.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseEvent {
    /// A production was opened
    Enter { production: Arc<str> },
    /// A terminal of `production` consumed a token
    Token {
        production: Arc<str>,
        kind: TokenKind,
        value: Value,
    },
    /// A production's terms were exhausted
    Exit { production: Arc<str> },
}

impl ParseEvent {
    pub fn enter(production: &str) -> Self {
        ParseEvent::Enter {
            production: Arc::from(production),
        }
    }

    pub fn token(production: &str, kind: TokenKind, value: Value) -> Self {
        ParseEvent::Token {
            production: Arc::from(production),
            kind,
            value,
        }
    }

    pub fn exit(production: &str) -> Self {
        ParseEvent::Exit {
            production: Arc::from(production),
        }
    }

    /// The production the event belongs to.
    pub fn production(&self) -> &str {
        match self {
            ParseEvent::Enter { production }
            | ParseEvent::Token { production, .. }
            | ParseEvent::Exit { production } => production,
        }
    }
}

impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseEvent::Enter { production } => write!(f, "enter {}", production),
            ParseEvent::Token { kind, value, .. } => write!(f, "token {} {}", kind, value),
            ParseEvent::Exit { production } => write!(f, "exit {}", production),
        }
    }
}

/// Receiver of driver events.
///
/// Events arrive in document order. Every `on_enter` is matched by exactly one
/// `on_exit` when the parse succeeds; after a failure no further events are
/// delivered.
pub trait ParseSink {
    /// Called when a production is opened
    fn on_enter(&mut self, production: &str);

    /// Called when a terminal of `production` matches `token`
    fn on_token(&mut self, production: &str, token: &Token);

    /// Called when a production is closed
    fn on_exit(&mut self, production: &str);
}

impl<S: ParseSink + ?Sized> ParseSink for &mut S {
    fn on_enter(&mut self, production: &str) {
        (**self).on_enter(production)
    }

    fn on_token(&mut self, production: &str, token: &Token) {
        (**self).on_token(production, token)
    }

    fn on_exit(&mut self, production: &str) {
        (**self).on_exit(production)
    }
}

/// Sink that records every event.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<ParseEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    pub fn finish(self) -> Vec<ParseEvent> {
        self.events
    }
}

impl ParseSink for EventCollector {
    fn on_enter(&mut self, production: &str) {
        self.events.push(ParseEvent::enter(production));
    }

    fn on_token(&mut self, production: &str, token: &Token) {
        self.events.push(ParseEvent::token(
            production,
            token.kind,
            token.value.clone(),
        ));
    }

    fn on_exit(&mut self, production: &str) {
        self.events.push(ParseEvent::exit(production));
    }
}

/// Sink that discards every event, for validation-only parses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ParseSink for NullSink {
    fn on_enter(&mut self, _production: &str) {}

    fn on_token(&mut self, _production: &str, _token: &Token) {}

    fn on_exit(&mut self, _production: &str) {}
}

/// Forwards events to an inner sink, logging each one indented by depth.
#[derive(Debug)]
pub struct TraceSink<S> {
    inner: S,
    depth: usize,
}

impl<S: ParseSink> TraceSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, depth: 0 }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

impl<S: ParseSink> ParseSink for TraceSink<S> {
    fn on_enter(&mut self, production: &str) {
        tracing::debug!(target: TRACE_TARGET, "{}enter {}", self.indent(), production);
        self.depth += 1;
        self.inner.on_enter(production);
    }

    fn on_token(&mut self, production: &str, token: &Token) {
        tracing::debug!(
            target: TRACE_TARGET,
            "{}token {} '{}'",
            self.indent(),
            token.kind,
            token
        );
        self.inner.on_token(production, token);
    }

    fn on_exit(&mut self, production: &str) {
        self.depth = self.depth.saturating_sub(1);
        tracing::debug!(target: TRACE_TARGET, "{}exit {}", self.indent(), production);
        self.inner.on_exit(production);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceSpan;

    fn limit_token() -> Token {
        Token::new(TokenKind::Keyword, Value::text("limit"), SourceSpan::new(0, 5))
    }

    #[test]
    fn test_collector_records_in_order() {
        let mut sink = EventCollector::new();
        sink.on_enter("LimitClause");
        sink.on_token("LimitClause", &limit_token());
        sink.on_exit("LimitClause");

        assert_eq!(
            sink.finish(),
            vec![
                ParseEvent::enter("LimitClause"),
                ParseEvent::token("LimitClause", TokenKind::Keyword, Value::text("limit")),
                ParseEvent::exit("LimitClause"),
            ]
        );
    }

    #[test]
    fn test_trace_sink_forwards_and_tracks_depth() {
        let mut trace = TraceSink::new(EventCollector::new());
        trace.on_enter("Outer");
        trace.on_enter("Inner");
        assert_eq!(trace.depth, 2);
        trace.on_token("Inner", &limit_token());
        trace.on_exit("Inner");
        trace.on_exit("Outer");
        assert_eq!(trace.depth, 0);
        assert_eq!(trace.into_inner().events().len(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(ParseEvent::enter("Var").to_string(), "enter Var");
        assert_eq!(
            ParseEvent::token("Var", TokenKind::Variable, Value::text("x")).to_string(),
            "token Variable x"
        );
        assert_eq!(ParseEvent::exit("Var").production(), "Var");
    }
}
