//! Per-intent lookups against a built [`SymbolIndex`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use super::{Intent, IntentKind, MatchType, SearchResult};
use crate::config::SearchConfig;
use crate::extractor::ExtractorRegistry;
use crate::symbol::{Symbol, SymbolIndex};

/// Base score of every definition and implementation hit.
const DEFINITION_SCORE: f64 = 1.0;
/// Base score of every usage hit.
const USAGE_SCORE: f64 = 0.8;
/// Scale applied to the accumulated keyword score.
const SEMANTIC_SCALE: f64 = 0.7;

const EXACT_KEYWORD: f64 = 1.0;
const PARTIAL_KEYWORD: f64 = 0.5;
const DOC_KEYWORD: f64 = 0.3;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "into", "are", "was", "were", "has",
    "have", "how", "what", "where", "when", "which", "who", "why", "does", "can", "all", "any",
    "not", "but", "use", "used", "using", "find", "show", "get", "code", "about",
];

lazy_static! {
    static ref KEYWORD: Regex = Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*\b").unwrap();
}

/// Identifier-shaped, lowercased query words longer than two characters,
/// without stop words.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    KEYWORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Lookups over one index snapshot.
pub(crate) struct Strategies<'a> {
    pub index: &'a SymbolIndex,
    pub extractors: &'a ExtractorRegistry,
    pub config: &'a SearchConfig,
}

impl Strategies<'_> {
    /// Unranked candidates for a classified query.
    ///
    /// Intents without a target symbol, and example searches, fall back to
    /// keyword matching over the whole index.
    pub fn run(&self, intent: &Intent, query: &str) -> Vec<SearchResult> {
        match (intent.kind, intent.target_symbol.as_deref()) {
            (IntentKind::FindDefinition, Some(target)) => {
                self.find_definitions(target, MatchType::Definition, self.config.context_lines)
            }
            (IntentKind::FindImplementation, Some(target)) => self.find_definitions(
                target,
                MatchType::Implementation,
                self.config.implementation_context_lines,
            ),
            (IntentKind::FindUsages, Some(target)) => self.find_usages(target),
            _ => self.semantic_search(query),
        }
    }

    /// One result per definition-kind symbol named `target`.
    pub fn find_definitions(
        &self,
        target: &str,
        match_type: MatchType,
        radius: usize,
    ) -> Vec<SearchResult> {
        self.index
            .lookup_where(target, |symbol| symbol.kind.is_definition())
            .into_iter()
            .map(|symbol| {
                let mut result = self.symbol_result(symbol, match_type, radius, DEFINITION_SCORE);
                result.signature = Some(symbol.display_signature());
                result
            })
            .collect()
    }

    /// One result per distinct (file, line) where `target` is referenced.
    ///
    /// Unknown targets yield nothing. Lines where the target itself is
    /// declared are not usages.
    pub fn find_usages(&self, target: &str) -> Vec<SearchResult> {
        let declarations = self.index.lookup(target);
        if declarations.is_empty() {
            return Vec::new();
        }

        let mut names: Vec<&str> = declarations.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        let declared: HashSet<(&Path, usize)> = declarations
            .iter()
            .map(|s| (s.file_path.as_path(), s.line_number))
            .collect();

        let mut seen: HashSet<(PathBuf, usize)> = HashSet::new();
        let mut results = Vec::new();

        for file in self.index.files() {
            let extractor = self.extractors.for_path(file);
            for name in &names {
                for line in extractor.find_usages(name, file) {
                    if declared.contains(&(file, line)) || !seen.insert((file.to_path_buf(), line)) {
                        continue;
                    }

                    let window = extractor.extract_context(file, line, self.config.context_lines);
                    let content = if window.line.is_empty() {
                        format!("Usage of {}", name)
                    } else {
                        window.line
                    };

                    results.push(SearchResult {
                        file_path: file.display().to_string(),
                        line_number: line,
                        content,
                        symbol_type: None,
                        symbol_name: Some(name.to_string()),
                        context_before: window.before,
                        context_after: window.after,
                        doc: None,
                        signature: None,
                        relevance_score: USAGE_SCORE,
                        match_type: MatchType::Usage,
                        related_symbols: Vec::new(),
                    });
                }
            }
        }

        results
    }

    /// Keyword match of the query against symbol names and docs.
    pub fn semantic_search(&self, query: &str) -> Vec<SearchResult> {
        let keywords = extract_keywords(query);
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        for (name, symbols) in self.index.names() {
            let score = match_score(name, symbols, &keywords);
            if score <= 0.0 {
                continue;
            }

            for symbol in symbols {
                let mut result = self.symbol_result(
                    symbol,
                    MatchType::Semantic,
                    self.config.context_lines,
                    score * SEMANTIC_SCALE,
                );
                result.signature = symbol.signature.clone();
                results.push(result);
            }
        }

        results
    }

    fn symbol_result(
        &self,
        symbol: &Symbol,
        match_type: MatchType,
        radius: usize,
        base_score: f64,
    ) -> SearchResult {
        let extractor = self.extractors.for_path(&symbol.file_path);
        let window = extractor.extract_context(&symbol.file_path, symbol.line_number, radius);
        let content = if window.line.is_empty() {
            format!("{} {}", symbol.kind, symbol.name)
        } else {
            window.line
        };

        SearchResult {
            file_path: symbol.file_path.display().to_string(),
            line_number: symbol.line_number,
            content,
            symbol_type: Some(symbol.kind),
            symbol_name: Some(symbol.name.clone()),
            context_before: window.before,
            context_after: window.after,
            doc: symbol.doc.clone(),
            signature: None,
            relevance_score: base_score,
            match_type,
            related_symbols: self.related_symbols(symbol),
        }
    }

    /// Sibling members for a member, or the members of a type.
    fn related_symbols(&self, symbol: &Symbol) -> Vec<String> {
        let owner = if symbol.kind.is_member() {
            symbol.parent_type.as_deref()
        } else if symbol.kind.is_type() {
            Some(symbol.name.as_str())
        } else {
            None
        };
        let Some(owner) = owner else {
            return Vec::new();
        };

        let mut related: Vec<String> = Vec::new();
        for candidate in self.index.get_by_file(&symbol.file_path) {
            if candidate.kind.is_member()
                && candidate.parent_type.as_deref() == Some(owner)
                && candidate.line_number != symbol.line_number
                && !related.contains(&candidate.name)
            {
                related.push(candidate.name.clone());
                if related.len() >= self.config.related_symbols_limit {
                    break;
                }
            }
        }
        related
    }
}

/// Keyword score of one symbol name and the docs of its declarations.
fn match_score(name: &str, symbols: &[Symbol], keywords: &[String]) -> f64 {
    let name_lower = name.to_lowercase();
    let mut score = 0.0;

    for keyword in keywords {
        if *keyword == name_lower {
            score += EXACT_KEYWORD;
        } else if name_lower.contains(keyword.as_str()) || keyword.contains(&name_lower) {
            score += PARTIAL_KEYWORD;
        }
    }

    for doc in symbols.iter().filter_map(|s| s.doc.as_deref()) {
        let doc_lower = doc.to_lowercase();
        score += keywords
            .iter()
            .filter(|keyword| doc_lower.contains(keyword.as_str()))
            .count() as f64
            * DOC_KEYWORD;
    }

    score
}
