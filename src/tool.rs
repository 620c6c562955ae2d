//! The `codebase_search` operation: request validation and response shape.
//!
//! Validation runs before the searcher is touched, so an invalid request never
//! reads the filesystem.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::search::{round3, CodeSearcher, MatchType, SearchResult};

/// Smallest accepted `max_results`.
pub const MIN_RESULTS: i64 = 1;
/// Largest accepted `max_results`.
pub const MAX_RESULTS: i64 = 100;

const DEFAULT_DIRECTORY: &str = ".";

/// Structured failure of a `codebase_search` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("query must be a non-empty string")]
    EmptyQuery,

    #[error("max_results must be an integer between 1 and 100, got {value}")]
    MaxResultsOutOfRange { value: i64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("search failed: {0}")]
    Internal(String),
}

impl ToolError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::EmptyQuery => "empty_query",
            ToolError::MaxResultsOutOfRange { .. } => "max_results_out_of_range",
            ToolError::InvalidRequest(_) => "invalid_request",
            ToolError::Internal(_) => "internal",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        })
    }
}

/// Input of a `codebase_search` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchRequest {
    pub query: String,

    #[serde(default)]
    pub target_directories: Option<Vec<String>>,

    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

fn default_max_results() -> i64 {
    20
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            target_directories: None,
            max_results: default_max_results(),
        }
    }

    pub fn with_directories(mut self, directories: Vec<String>) -> Self {
        self.target_directories = Some(directories);
        self
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Parse a JSON request object. Wrong field types are `InvalidRequest`.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        serde_json::from_value(value).map_err(|e| ToolError::InvalidRequest(e.to_string()))
    }

    /// Check the request, returning the accepted result limit.
    pub fn validate(&self) -> Result<usize, ToolError> {
        if self.query.trim().is_empty() {
            return Err(ToolError::EmptyQuery);
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&self.max_results) {
            return Err(ToolError::MaxResultsOutOfRange {
                value: self.max_results,
            });
        }
        Ok(self.max_results as usize)
    }

    /// Requested directories, or the current directory.
    pub fn directories(&self) -> Vec<String> {
        match &self.target_directories {
            Some(dirs) if !dirs.is_empty() => dirs.clone(),
            _ => vec![DEFAULT_DIRECTORY.to_string()],
        }
    }
}

/// Per-strategy result counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTypeCounts {
    pub definitions: usize,
    pub usages: usize,
    pub semantic: usize,
}

/// Output of a successful `codebase_search` call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub total_results: usize,
    pub search_time_seconds: f64,
    pub match_types: MatchTypeCounts,
    pub symbol_types: BTreeMap<String, usize>,
    pub unique_files: usize,
    pub results: Vec<SearchResult>,
    pub target_directories: Vec<String>,
    pub max_results: usize,
}

impl SearchResponse {
    fn new(
        query: String,
        results: Vec<SearchResult>,
        elapsed_secs: f64,
        target_directories: Vec<String>,
        max_results: usize,
    ) -> Self {
        let mut match_types = MatchTypeCounts::default();
        let mut symbol_types = BTreeMap::new();
        let mut files = HashSet::new();

        for result in &results {
            match result.match_type {
                MatchType::Definition => match_types.definitions += 1,
                MatchType::Usage => match_types.usages += 1,
                MatchType::Semantic => match_types.semantic += 1,
                MatchType::Implementation => {}
            }
            if let Some(kind) = result.symbol_type {
                *symbol_types.entry(kind.to_string()).or_insert(0) += 1;
            }
            files.insert(result.file_path.as_str());
        }

        Self {
            success: true,
            query,
            total_results: results.len(),
            search_time_seconds: round3(elapsed_secs),
            match_types,
            symbol_types,
            unique_files: files.len(),
            results,
            target_directories,
            max_results,
        }
    }
}

/// Validate `request`, run the search and summarise the results.
pub async fn codebase_search(
    searcher: &CodeSearcher,
    request: SearchRequest,
) -> Result<SearchResponse, ToolError> {
    let max_results = request.validate()?;
    let target_directories = request.directories();
    let paths: Vec<PathBuf> = target_directories.iter().map(PathBuf::from).collect();

    let start = Instant::now();
    let results = searcher
        .search(&request.query, Some(&paths), max_results)
        .await
        .map_err(|e| ToolError::Internal(e.to_string()))?;

    Ok(SearchResponse::new(
        request.query,
        results,
        start.elapsed().as_secs_f64(),
        target_directories,
        max_results,
    ))
}

/// JSON-in, JSON-out form of [`codebase_search`].
pub async fn codebase_search_json(searcher: &CodeSearcher, params: Value) -> Result<Value, ToolError> {
    let request = SearchRequest::from_value(params)?;
    let response = codebase_search(searcher, request).await?;
    serde_json::to_value(response).map_err(|e| ToolError::Internal(e.to_string()))
}
