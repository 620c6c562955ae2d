use serde_json::json;

use codescope::tool::codebase_search_json;
use codescope::{codebase_search, SearchRequest, ToolError};

use crate::helpers::test_harness::TestHarness;

fn polyglot() -> TestHarness {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("module.py", "def foo(): pass\n").unwrap();
    harness
        .create_test_file("Widget.java", "public void foo() {}\n")
        .unwrap();
    harness
}

#[tokio::test]
async fn test_response_summarises_results() {
    let harness = polyglot();
    let request = SearchRequest::new("find definition of foo")
        .with_directories(harness.dir_strings())
        .with_max_results(10);

    let response = codebase_search(&harness.searcher, request).await.unwrap();

    assert!(response.success);
    assert_eq!(response.query, "find definition of foo");
    assert_eq!(response.total_results, 2);
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.match_types.definitions, 2);
    assert_eq!(response.match_types.usages, 0);
    assert_eq!(response.match_types.semantic, 0);
    assert_eq!(response.symbol_types.get("function"), Some(&1));
    assert_eq!(response.symbol_types.get("method"), Some(&1));
    assert_eq!(response.unique_files, 2);
    assert_eq!(response.target_directories, harness.dir_strings());
    assert_eq!(response.max_results, 10);
    assert!(response.search_time_seconds >= 0.0);
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let harness = polyglot();
    let request = SearchRequest::new("   ").with_directories(harness.dir_strings());

    let err = codebase_search(&harness.searcher, request).await.unwrap_err();
    assert_eq!(err, ToolError::EmptyQuery);
    assert_eq!(harness.searcher.indexed_symbols().await, None);
}

#[tokio::test]
async fn test_max_results_bounds_are_enforced() {
    let harness = polyglot();

    for value in [0, 101, -5] {
        let request = SearchRequest::new("foo")
            .with_directories(harness.dir_strings())
            .with_max_results(value);
        let err = codebase_search(&harness.searcher, request).await.unwrap_err();
        assert_eq!(err, ToolError::MaxResultsOutOfRange { value });
        assert_eq!(err.to_json()["error"], "max_results_out_of_range");
    }

    let request = SearchRequest::new("find definition of foo")
        .with_directories(harness.dir_strings())
        .with_max_results(1);
    let response = codebase_search(&harness.searcher, request).await.unwrap();
    assert_eq!(response.total_results, 1);
}

#[tokio::test]
async fn test_json_entry_point() {
    let harness = polyglot();
    let params = json!({
        "query": "find definition of foo",
        "target_directories": harness.dir_strings(),
    });

    let value = codebase_search_json(&harness.searcher, params).await.unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["total_results"], 2);
    assert_eq!(value["max_results"], 20);
    assert_eq!(value["match_types"]["definitions"], 2);

    let first = &value["results"][0];
    assert_eq!(first["match_type"], "definition");
    assert_eq!(first["line_number"], 1);
    assert_eq!(first["symbol_name"], "foo");
    assert!(first["relevance_score"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_json_entry_point_rejects_malformed_params() {
    let harness = polyglot();

    let err = codebase_search_json(&harness.searcher, json!({"query": ["not", "a", "string"]}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid_request");

    let err = codebase_search_json(&harness.searcher, json!({"query": ""}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "empty_query");
}
