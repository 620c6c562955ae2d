//! Query-driven symbol search.
//!
//! This module contains:
//! - `intent` - Classifies a free-text query into an [`Intent`]
//! - `strategies` - Definition, usage, implementation and keyword lookups
//! - `ranking` - Multi-signal relevance scoring
//! - `cache` - Time-limited query result cache
//! - `searcher` - The [`CodeSearcher`] orchestrator tying them together

pub mod cache;
pub mod intent;
pub mod ranking;
mod searcher;
mod strategies;

use serde::{Serialize, Serializer};

use crate::symbol::SymbolKind;

pub use cache::{CacheKey, QueryCache};
pub use intent::{Intent, IntentClassifier, IntentKind};
pub use ranking::{rank_results, score_result};
pub use searcher::{CodeSearcher, SearchError};
pub use strategies::extract_keywords;

/// The strategy that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Definition,
    Usage,
    Implementation,
    Semantic,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Definition => "definition",
            MatchType::Usage => "usage",
            MatchType::Implementation => "implementation",
            MatchType::Semantic => "semantic",
        }
    }

    /// Ranking bonus; definition > implementation > usage > semantic.
    pub fn bonus(&self) -> f64 {
        match self {
            MatchType::Definition => 0.4,
            MatchType::Implementation => 0.35,
            MatchType::Usage => 0.1,
            MatchType::Semantic => 0.0,
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// File containing the hit
    pub file_path: String,
    /// 1-indexed line of the hit
    pub line_number: usize,
    /// The hit line, or a short rendering when the line cannot be read
    pub content: String,
    pub symbol_type: Option<SymbolKind>,
    pub symbol_name: Option<String>,
    pub context_before: String,
    pub context_after: String,
    pub doc: Option<String>,
    pub signature: Option<String>,
    /// Base score before ranking, final score after
    #[serde(serialize_with = "serialize_score")]
    pub relevance_score: f64,
    pub match_type: MatchType,
    /// Names of neighbouring members in the same type
    pub related_symbols: Vec<String>,
}

fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round3(*score))
}

/// Round to three decimal places.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
