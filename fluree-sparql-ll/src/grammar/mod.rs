//! LL(1) production tables.
//!
//! A [`GrammarTable`] maps each production to its branches, keyed by the
//! representation key of the lookahead token. Tables are plain JSON:
//!
//! ```json
//! { "LimitClause": { "limit": [ {"terminal": "limit"}, {"terminal": "NumericLiteral"} ] } }
//! ```
//!
//! The crate bundles a table for SPARQL queries, available through
//! [`GrammarTable::sparql`].

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Lookahead key used once the token stream is exhausted.
pub const END_OF_INPUT: &str = "$";

/// Start production of the bundled SPARQL table.
pub const START: &str = "Query";

static SPARQL: Lazy<GrammarTable> = Lazy::new(|| {
    GrammarTable::from_json_str(include_str!("../../grammar/sparql.json"))
        .expect("bundled SPARQL grammar table is valid JSON")
});

/// One element of an expansion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Consumes one token whose representation key equals the payload
    Terminal(Arc<str>),
    /// Expands the named production
    Production(Arc<str>),
}

impl Term {
    pub fn terminal(key: &str) -> Self {
        Term::Terminal(Arc::from(key))
    }

    pub fn production(name: &str) -> Self {
        Term::Production(Arc::from(name))
    }
}

/// Branches of a single production, by lookahead key.
pub type Branches = HashMap<Arc<str>, Vec<Term>>;

/// Read-only production table: production → lookahead key → terms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrammarTable {
    productions: HashMap<Arc<str>, Branches>,
}

impl GrammarTable {
    /// The bundled SPARQL query table, parsed on first use.
    pub fn sparql() -> &'static GrammarTable {
        &SPARQL
    }

    /// Parse a table from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let table: GrammarTable = serde_json::from_str(json)?;
        tracing::debug!(productions = table.len(), "loaded grammar table");
        Ok(table)
    }

    /// Parse a table from a JSON reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        let table: GrammarTable = serde_json::from_reader(reader)?;
        tracing::debug!(productions = table.len(), "loaded grammar table");
        Ok(table)
    }

    pub fn builder() -> GrammarTableBuilder {
        GrammarTableBuilder::default()
    }

    /// All branches of a production, or `None` if it is not in the table.
    pub fn branches(&self, production: &str) -> Option<&Branches> {
        self.productions.get(production)
    }

    /// The expansion of `production` for lookahead `key`.
    pub fn expansion(&self, production: &str, key: &str) -> Option<&[Term]> {
        self.branches(production)?.get(key).map(Vec::as_slice)
    }

    /// Sorted lookahead keys accepted by a production.
    pub fn alternatives(&self, production: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .branches(production)
            .map(|b| b.keys().map(|k| k.to_string()).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn contains(&self, production: &str) -> bool {
        self.productions.contains_key(production)
    }

    /// Production names in sorted order.
    pub fn productions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.productions.keys().map(|k| &**k).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Productions referenced by some expansion but never defined.
    pub fn undefined_productions(&self) -> BTreeSet<&str> {
        self.productions
            .values()
            .flat_map(|branches| branches.values())
            .flatten()
            .filter_map(|term| match term {
                Term::Production(name) if !self.contains(name) => Some(&**name),
                _ => None,
            })
            .collect()
    }
}

/// Programmatic construction of a [`GrammarTable`].
#[derive(Debug, Default)]
pub struct GrammarTableBuilder {
    table: GrammarTable,
}

impl GrammarTableBuilder {
    /// Add (or replace) the branch of `production` taken on `key`.
    pub fn rule(
        mut self,
        production: &str,
        key: &str,
        terms: impl IntoIterator<Item = Term>,
    ) -> Self {
        self.table
            .productions
            .entry(Arc::from(production))
            .or_default()
            .insert(Arc::from(key), terms.into_iter().collect());
        self
    }

    pub fn build(self) -> GrammarTable {
        self.table
    }
}
