use std::fs;
use std::time::Duration;

use codescope::search::MatchType;
use codescope::symbol::SymbolKind;

use crate::helpers::test_harness::TestHarness;

fn polyglot() -> TestHarness {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("pkg/module.py", "def foo(): pass\n").unwrap();
    harness
        .create_test_file("src/Widget.java", "public void foo() {}\n")
        .unwrap();
    harness
}

#[tokio::test]
async fn test_definition_across_languages() {
    let harness = polyglot();
    let dirs = harness.dirs();

    let results = harness
        .searcher
        .search("find definition of foo", Some(&dirs), 20)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let mut kinds: Vec<(SymbolKind, String, usize)> = results
        .iter()
        .map(|r| {
            let file = r.file_path.rsplit(['/', '\\']).next().unwrap().to_string();
            (r.symbol_type.unwrap(), file, r.line_number)
        })
        .collect();
    kinds.sort();

    assert_eq!(
        kinds,
        vec![
            (SymbolKind::Function, "module.py".to_string(), 1),
            (SymbolKind::Method, "Widget.java".to_string(), 1),
        ]
    );
    assert!(results.iter().all(|r| r.match_type == MatchType::Definition));
    assert!(results.iter().all(|r| r.symbol_name.as_deref() == Some("foo")));
}

#[tokio::test]
async fn test_declaration_only_symbol_has_no_usages() {
    let harness = polyglot();
    let dirs = harness.dirs();

    let results = harness
        .searcher
        .search("where is foo used", Some(&dirs), 20)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_usages_across_files() {
    let harness = TestHarness::new().unwrap();
    harness
        .create_test_file("lib.py", "def tokenize(text):\n    return text.split()\n")
        .unwrap();
    harness
        .create_test_file(
            "main.py",
            "from lib import tokenize\n\nwords = tokenize('a b')\nmore = tokenize('c')\n",
        )
        .unwrap();

    let dirs = harness.dirs();
    let results = harness
        .searcher
        .search("how is tokenize used", Some(&dirs), 20)
        .await
        .unwrap();

    let mut lines: Vec<usize> = results.iter().map(|r| r.line_number).collect();
    lines.sort();
    assert_eq!(lines, vec![3, 4]);
    assert!(results.iter().all(|r| r.match_type == MatchType::Usage));
    assert!(results.iter().all(|r| r.file_path.ends_with("main.py")));
}

#[tokio::test]
async fn test_unknown_symbol_returns_nothing() {
    let harness = polyglot();
    let dirs = harness.dirs();

    let results = harness
        .searcher
        .search("xyz_totally_unknown_symbol", Some(&dirs), 20)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_ranking_prefers_definitions_outside_tests() {
    let harness = TestHarness::new().unwrap();
    harness
        .create_test_file("app/server.py", "class Router:\n    \"\"\"Routes requests.\"\"\"\n")
        .unwrap();
    harness
        .create_test_file("tests/deep/nested/test_router.py", "class Router:\n    pass\n")
        .unwrap();

    let dirs = harness.dirs();
    let results = harness
        .searcher
        .search("where is Router defined", Some(&dirs), 20)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].file_path.ends_with("server.py"));
    assert!(results[0].relevance_score > results[1].relevance_score);
    assert!(results.iter().all(|r| r.relevance_score >= 0.0));
}

#[tokio::test]
async fn test_results_never_exceed_max() {
    let harness = TestHarness::new().unwrap();
    let source: String = (0..30)
        .map(|i| format!("def parse_item_{}(raw):\n    return raw\n\n", i))
        .collect();
    harness.create_test_file("parsers.py", &source).unwrap();

    let dirs = harness.dirs();
    for max in [1, 5, 20, 100] {
        let results = harness
            .searcher
            .search("parse item", Some(&dirs), max)
            .await
            .unwrap();
        assert!(results.len() <= max);
        assert_eq!(results.len(), max.min(30));
    }
}

#[tokio::test]
async fn test_cache_is_idempotent_within_ttl() {
    let harness = TestHarness::new().unwrap();
    let file = harness
        .create_test_file("core.py", "def compute(x):\n    return x\n")
        .unwrap();

    let dirs = harness.dirs();
    let first = harness
        .searcher
        .search("what is compute", Some(&dirs), 20)
        .await
        .unwrap();

    fs::write(&file, "\n\n\ndef compute(x, y):\n    return x + y\n").unwrap();
    harness.clock.advance(Duration::from_secs(120));

    let second = harness
        .searcher
        .search("what is compute", Some(&dirs), 20)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(second[0].line_number, 1);

    // Past the cache TTL but inside the index TTL: recomputed from the same index
    harness.clock.advance(Duration::from_secs(300));
    let third = harness
        .searcher
        .search("what is compute", Some(&dirs), 20)
        .await
        .unwrap();
    assert_eq!(third[0].line_number, 1);
    // Line 1 is now blank, so the content falls back to the symbol description
    assert_eq!(third[0].content, "function compute");
    assert_eq!(first[0].content, "def compute(x):");
}

#[tokio::test]
async fn test_index_rebuilds_after_ttl() {
    let harness = TestHarness::new().unwrap();
    let file = harness
        .create_test_file("core.py", "def compute(x):\n    return x\n")
        .unwrap();

    let dirs = harness.dirs();
    harness
        .searcher
        .search("what is compute", Some(&dirs), 20)
        .await
        .unwrap();

    fs::write(&file, "\n\n\ndef compute(x, y):\n    return x + y\n").unwrap();
    harness.clock.advance(Duration::from_secs(3601));

    let results = harness
        .searcher
        .search("where is compute defined", Some(&dirs), 20)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line_number, 4);
    assert_eq!(results[0].signature.as_deref(), Some("def compute(x, y)"));
}

#[tokio::test]
async fn test_ignored_directories_are_not_indexed() {
    let harness = TestHarness::new().unwrap();
    harness
        .create_test_file("node_modules/dep/lib.py", "def vendored():\n    pass\n")
        .unwrap();
    harness
        .create_test_file("__pycache__/cached.py", "def vendored():\n    pass\n")
        .unwrap();
    harness
        .create_test_file("src/own.py", "def vendored():\n    pass\n")
        .unwrap();

    let dirs = harness.dirs();
    let results = harness
        .searcher
        .search("define vendored", Some(&dirs), 20)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].file_path.ends_with("own.py"));
    assert!(harness.path().join("node_modules").exists());
}
