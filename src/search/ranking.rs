//! Relevance scoring applied to every candidate result.

use std::path::{Component, Path, PathBuf};

use super::SearchResult;
use crate::symbol::SymbolKind;

const DOC_BONUS: f64 = 0.2;
const DOC_TERM_BONUS: f64 = 0.1;
const CLASS_BONUS: f64 = 0.15;
const CALLABLE_BONUS: f64 = 0.1;
const TEST_PATH_PENALTY: f64 = 0.2;
const CORE_PATH_BONUS: f64 = 0.1;
const DEPTH_PENALTY_PER_COMPONENT: f64 = 0.02;
const MAX_DEPTH_PENALTY: f64 = 0.3;
const NAME_MATCH_BONUS: f64 = 0.25;

const CORE_PATH_TERMS: &[&str] = &["main", "core", "server", "app"];

/// Final score for one result, starting from its base score.
///
/// Path signals look at the path relative to whichever of `roots` contains
/// the file, so the location of the searched tree itself never counts.
pub fn score_result(result: &SearchResult, query: &str, roots: &[PathBuf]) -> f64 {
    let mut score = result.relevance_score + result.match_type.bonus();
    let query_lower = query.to_lowercase();

    if let Some(doc) = &result.doc {
        let doc_lower = doc.to_lowercase();
        let matching_terms = query_lower
            .split_whitespace()
            .filter(|term| doc_lower.contains(term))
            .count();
        score += DOC_BONUS + matching_terms as f64 * DOC_TERM_BONUS;
    }

    score += match result.symbol_type {
        Some(SymbolKind::Class) => CLASS_BONUS,
        Some(SymbolKind::Function | SymbolKind::Method) => CALLABLE_BONUS,
        _ => 0.0,
    };

    let path = relative_path(Path::new(&result.file_path), roots);
    let components: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect();

    if components.iter().any(|part| is_test_segment(part)) {
        score -= TEST_PATH_PENALTY;
    }
    if components
        .iter()
        .any(|part| CORE_PATH_TERMS.iter().any(|term| part.contains(term)))
    {
        score += CORE_PATH_BONUS;
    }
    score -= (components.len() as f64 * DEPTH_PENALTY_PER_COMPONENT).min(MAX_DEPTH_PENALTY);

    if let Some(name) = &result.symbol_name {
        let name_lower = name.to_lowercase();
        if query_lower.contains(&name_lower) || name_lower.contains(&query_lower) {
            score += NAME_MATCH_BONUS;
        }
    }

    score.max(0.0)
}

/// Score every result and sort by descending score.
///
/// The sort is stable: equal scores keep their incoming order.
pub fn rank_results(
    mut results: Vec<SearchResult>,
    query: &str,
    roots: &[PathBuf],
) -> Vec<SearchResult> {
    for result in &mut results {
        result.relevance_score = score_result(result, query, roots);
    }
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    results
}

/// `test`, `tests`, `test_*` or `*_test`, ignoring any extension.
fn is_test_segment(part: &str) -> bool {
    let stem = part.split('.').next().unwrap_or(part);
    matches!(stem, "test" | "tests") || stem.starts_with("test_") || stem.ends_with("_test")
}

fn relative_path<'a>(path: &'a Path, roots: &[PathBuf]) -> &'a Path {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MatchType;

    fn result(path: &str, name: &str, kind: SymbolKind, match_type: MatchType) -> SearchResult {
        SearchResult {
            file_path: path.to_string(),
            line_number: 1,
            content: String::new(),
            symbol_type: Some(kind),
            symbol_name: Some(name.to_string()),
            context_before: String::new(),
            context_after: String::new(),
            doc: None,
            signature: None,
            relevance_score: 1.0,
            match_type,
            related_symbols: Vec::new(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_definition_score_components() {
        // base 1.0 + definition 0.4 + function 0.1 - depth 0.04 + name 0.25
        let r = result("lib/io.py", "load", SymbolKind::Function, MatchType::Definition);
        assert!(approx(score_result(&r, "find definition of load", &[]), 1.71));
    }

    #[test]
    fn test_doc_bonus_counts_query_terms() {
        let mut r = result("io.py", "zzz", SymbolKind::Field, MatchType::Semantic);
        r.doc = Some("Load the user profile".to_string());
        // base 1.0 + doc 0.2 + two terms 0.2 - depth 0.02
        assert!(approx(score_result(&r, "user profile", &[]), 1.38));
    }

    #[test]
    fn test_path_signals_are_relative_to_root() {
        let roots = vec![PathBuf::from("/work/tests_repo")];
        let plain = result("/work/tests_repo/lib.py", "x", SymbolKind::Field, MatchType::Semantic);
        let in_tests = result("/work/tests_repo/tests/lib.py", "x", SymbolKind::Field, MatchType::Semantic);
        let in_core = result("/work/tests_repo/core/lib.py", "x", SymbolKind::Field, MatchType::Semantic);

        let plain_score = score_result(&plain, "q", &roots);
        assert!(approx(plain_score, 0.98));
        assert!(approx(score_result(&in_tests, "q", &roots), plain_score - 0.2 - 0.02));
        assert!(approx(score_result(&in_core, "q", &roots), plain_score + 0.1 - 0.02));
    }

    #[test]
    fn test_only_test_segments_are_penalised() {
        let score = |path: &str| {
            let r = result(path, "x", SymbolKind::Field, MatchType::Semantic);
            score_result(&r, "q", &[])
        };
        let baseline = score("pkg/lib.py");

        assert!(approx(score("pkg/latest.py"), baseline));
        assert!(approx(score("contest/lib.py"), baseline));
        assert!(approx(score("tests/lib.py"), baseline - 0.2));
        assert!(approx(score("pkg/test_lib.py"), baseline - 0.2));
        assert!(approx(score("pkg/lib_test.py"), baseline - 0.2));
        assert!(approx(score("test/lib.py"), baseline - 0.2));
    }

    #[test]
    fn test_depth_penalty_is_capped() {
        let deep = "a/b/c/d/e/f/g/h/i/j/k/l/m/n/o/p/q/r/s/t/u/v/w.py";
        let r = result(deep, "x", SymbolKind::Field, MatchType::Semantic);
        assert!(approx(score_result(&r, "q", &[]), 0.7));
    }

    #[test]
    fn test_score_is_never_negative() {
        let mut r = result("test/a/b/c/d/e/f/g/h/i/j/k/l/m/n/o.py", "x", SymbolKind::Import, MatchType::Semantic);
        r.relevance_score = 0.0;
        assert_eq!(score_result(&r, "q", &[]), 0.0);
    }

    #[test]
    fn test_rank_is_stable_and_deterministic() {
        let candidates = vec![
            result("a.py", "first", SymbolKind::Function, MatchType::Usage),
            result("b.py", "second", SymbolKind::Function, MatchType::Usage),
            result("c.py", "winner", SymbolKind::Class, MatchType::Definition),
        ];

        let once = rank_results(candidates.clone(), "q", &[]);
        let twice = rank_results(candidates, "q", &[]);
        assert_eq!(once, twice);

        let names: Vec<_> = once.iter().map(|r| r.symbol_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["winner", "first", "second"]);
    }
}
