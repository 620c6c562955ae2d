//! Query intent classification.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Confidence reported for any pattern match.
const MATCHED_CONFIDENCE: f64 = 0.9;
/// Confidence reported when nothing matched.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// What the caller is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    FindDefinition,
    FindUsages,
    FindImplementation,
    FindExamples,
    GeneralSearch,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::FindDefinition => "find_definition",
            IntentKind::FindUsages => "find_usages",
            IntentKind::FindImplementation => "find_implementation",
            IntentKind::FindExamples => "find_examples",
            IntentKind::GeneralSearch => "general_search",
        }
    }
}

/// Classification of a single query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// Identifier captured from the query, with its original casing
    pub target_symbol: Option<String>,
    /// In `[0, 1]`
    pub confidence: f64,
}

lazy_static! {
    /// Ordered pattern table; the first match wins.
    static ref PATTERNS: Vec<(IntentKind, Regex)> = {
        let table: &[(IntentKind, &[&str])] = &[
            (
                IntentKind::FindDefinition,
                &[
                    r"where\s+is\s+(\w+)\s+defined",
                    r"find\s+(?:the\s+)?definition\s+(?:of\s+)?(\w+)",
                    r"what\s+is\s+(\w+)",
                    r"define\s+(\w+)",
                ],
            ),
            (
                IntentKind::FindUsages,
                &[
                    r"where\s+is\s+(\w+)\s+used",
                    r"find\s+usages?\s+(?:of\s+)?(\w+)",
                    r"how\s+is\s+(\w+)\s+used",
                    r"usage\s+of\s+(\w+)",
                ],
            ),
            (
                IntentKind::FindImplementation,
                &[
                    r"how\s+does\s+(\w+)\s+work",
                    r"show\s+(?:me\s+)?(?:the\s+)?implementation\s+(?:of\s+)?(\w+)",
                    r"how\s+is\s+(\w+)\s+implemented",
                    r"implementation\s+of\s+(\w+)",
                ],
            ),
            (
                IntentKind::FindExamples,
                &[
                    r"examples?\s+of\s+(?:using\s+)?(\w+)",
                    r"how\s+to\s+use\s+(\w+)",
                    r"usage\s+examples?\s+(?:for\s+)?(\w+)",
                ],
            ),
        ];

        table
            .iter()
            .flat_map(|(kind, patterns)| {
                patterns.iter().map(move |pattern| {
                    let regex = Regex::new(&format!("(?i){}", pattern))
                        .expect("intent pattern must compile");
                    (*kind, regex)
                })
            })
            .collect()
    };
}

/// Stateless, deterministic query classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. The first matching pattern decides the kind and its
    /// capture becomes the target symbol.
    pub fn analyze(&self, query: &str) -> Intent {
        for (kind, pattern) in PATTERNS.iter() {
            if let Some(caps) = pattern.captures(query) {
                return Intent {
                    kind: *kind,
                    target_symbol: caps.get(1).map(|m| m.as_str().to_string()),
                    confidence: MATCHED_CONFIDENCE,
                };
            }
        }

        Intent {
            kind: IntentKind::GeneralSearch,
            target_symbol: None,
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(query: &str) -> Intent {
        IntentClassifier::new().analyze(query)
    }

    #[test]
    fn test_definition_queries() {
        for query in [
            "where is parse_config defined",
            "find definition of parse_config",
            "find the definition parse_config",
            "what is parse_config",
            "define parse_config",
        ] {
            let intent = analyze(query);
            assert_eq!(intent.kind, IntentKind::FindDefinition, "{}", query);
            assert_eq!(intent.target_symbol.as_deref(), Some("parse_config"));
            assert_eq!(intent.confidence, 0.9);
        }
    }

    #[test]
    fn test_usage_queries() {
        for query in [
            "where is Cache used",
            "find usages of Cache",
            "find usage Cache",
            "how is Cache used",
            "usage of Cache",
        ] {
            let intent = analyze(query);
            assert_eq!(intent.kind, IntentKind::FindUsages, "{}", query);
            assert_eq!(intent.target_symbol.as_deref(), Some("Cache"));
        }
    }

    #[test]
    fn test_implementation_queries() {
        for query in [
            "how does tokenize work",
            "show me the implementation of tokenize",
            "how is tokenize implemented",
            "implementation of tokenize",
        ] {
            let intent = analyze(query);
            assert_eq!(intent.kind, IntentKind::FindImplementation, "{}", query);
            assert_eq!(intent.target_symbol.as_deref(), Some("tokenize"));
        }
    }

    #[test]
    fn test_example_queries() {
        let intent = analyze("examples of using Router");
        assert_eq!(intent.kind, IntentKind::FindExamples);
        assert_eq!(intent.target_symbol.as_deref(), Some("Router"));

        assert_eq!(analyze("how to use Router").kind, IntentKind::FindExamples);
    }

    #[test]
    fn test_case_insensitive_match_keeps_target_casing() {
        let intent = analyze("WHERE IS UserService DEFINED");
        assert_eq!(intent.kind, IntentKind::FindDefinition);
        assert_eq!(intent.target_symbol.as_deref(), Some("UserService"));
    }

    #[test]
    fn test_table_order_decides_overlaps() {
        // "where is X used" is tried after "where is X defined" but before "what is X"
        assert_eq!(analyze("where is x used").kind, IntentKind::FindUsages);
        // "usage of" belongs to usages, even though an examples pattern also mentions usage
        assert_eq!(analyze("usage of foo").kind, IntentKind::FindUsages);
    }

    #[test]
    fn test_general_search_fallback() {
        let intent = analyze("database connection pooling");
        assert_eq!(intent.kind, IntentKind::GeneralSearch);
        assert!(intent.target_symbol.is_none());
        assert_eq!(intent.confidence, 0.5);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(analyze("what is foo"), analyze("what is foo"));
    }
}
