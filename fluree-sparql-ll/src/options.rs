//! Parse configuration.

use serde::{Deserialize, Serialize};

/// Options for a parse call.
///
/// Options never change the outcome of a parse, only what is logged while it
/// runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Log every driver event at `DEBUG` (target `fluree_sparql_ll::trace`)
    /// and every lexed token at `TRACE`.
    pub trace: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable event tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
