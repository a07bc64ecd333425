//! Keyword and built-in function names.
//!
//! SPARQL keywords are case-insensitive; the lexer emits them lowercased.
//! The single exception is `a` (the `rdf:type` shorthand), which is only a
//! keyword in lowercase.

/// Lowercased keywords, sorted for binary search.
pub static KEYWORDS: &[&str] = &[
    "abs", "add", "all", "as", "asc", "ask", "avg", "base", "bind", "bnode", "bound", "by",
    "ceil", "clear", "coalesce", "concat", "construct", "contains", "copy", "count", "create",
    "data", "datatype", "day", "default", "delete", "desc", "describe", "distinct", "drop",
    "encode_for_uri", "exists", "filter", "floor", "from", "graph", "group", "group_concat",
    "having", "hours", "if", "in", "insert", "into", "iri", "isblank", "isiri", "isliteral",
    "isnumeric", "isuri", "lang", "langmatches", "lcase", "limit", "load", "max", "md5", "min",
    "minus", "minutes", "month", "move", "named", "not", "now", "offset", "optional", "order",
    "prefix", "rand", "reduced", "regex", "replace", "round", "sameterm", "sample", "seconds",
    "select", "separator", "service", "sha1", "sha256", "sha384", "sha512", "silent", "str",
    "strafter", "strbefore", "strends", "strlen", "strstarts", "struuid", "substr", "sum",
    "timezone", "to", "tz", "ucase", "undef", "union", "uri", "using", "uuid", "values",
    "where", "with", "year",
];

/// Look up a word, returning the canonical lowercased keyword.
pub fn lookup_keyword(word: &str) -> Option<&'static str> {
    if word == "a" {
        return Some("a");
    }
    let lowered = word.to_ascii_lowercase();
    KEYWORDS
        .binary_search(&lowered.as_str())
        .ok()
        .map(|idx| KEYWORDS[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_lowercase() {
        assert!(KEYWORDS.windows(2).all(|w| w[0] < w[1]));
        assert!(KEYWORDS.iter().all(|k| *k == k.to_ascii_lowercase()));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup_keyword("SELECT"), Some("select"));
        assert_eq!(lookup_keyword("sElEcT"), Some("select"));
        assert_eq!(lookup_keyword("group_concat"), Some("group_concat"));
        assert_eq!(lookup_keyword("isIRI"), Some("isiri"));
        assert_eq!(lookup_keyword("selects"), None);
    }

    #[test]
    fn test_a_is_case_sensitive() {
        assert_eq!(lookup_keyword("a"), Some("a"));
        assert_eq!(lookup_keyword("A"), None);
    }

    #[test]
    fn test_booleans_are_not_keywords() {
        assert_eq!(lookup_keyword("true"), None);
        assert_eq!(lookup_keyword("FALSE"), None);
    }
}
