use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::search::{CodeSearcher, SearchResult};
use crate::tool::{codebase_search, SearchRequest, SearchResponse};
use crate::Config;

/// Run the search command
///
/// # Arguments
///
/// * `query` - The search query
/// * `dirs` - Directories to search; the current directory when empty
/// * `max_results` - Result limit, defaults to `search.default_max_results`
/// * `json` - Print the full response object instead of a listing
pub async fn run(query: &str, dirs: Vec<PathBuf>, max_results: Option<i64>, json: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;
    let searcher = CodeSearcher::new(&config);

    let limit = max_results.unwrap_or(config.search.default_max_results as i64);
    let mut request = SearchRequest::new(query).with_max_results(limit);
    if !dirs.is_empty() {
        request = request.with_directories(dirs.iter().map(|d| d.display().to_string()).collect());
    }

    let response = match codebase_search(&searcher, request).await {
        Ok(response) => response,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            }
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_listing(&response);
    }

    Ok(())
}

fn print_listing(response: &SearchResponse) {
    if response.results.is_empty() {
        println!("No results found for: {}", response.query);
        return;
    }

    println!(
        "Found {} results for: \"{}\" in {:.3}s\n",
        response.total_results, response.query, response.search_time_seconds
    );

    for (i, result) in response.results.iter().enumerate() {
        println!("{}. {}", i + 1, headline(result));
        println!("{}", format_preview(&result.content, 5));
        if !result.related_symbols.is_empty() {
            println!("   related: {}", result.related_symbols.join(", "));
        }
        println!();
    }
}

fn headline(result: &SearchResult) -> String {
    let symbol = match (&result.symbol_type, &result.symbol_name) {
        (Some(kind), Some(name)) => format!(" {} {}", kind, name),
        (None, Some(name)) => format!(" {}", name),
        _ => String::new(),
    };

    format!(
        "{}:{} [{}]{} (score: {:.3})",
        result.file_path,
        result.line_number,
        result.match_type.as_str(),
        symbol,
        result.relevance_score
    )
}

/// Format a preview of the content, limiting to max_lines
fn format_preview(content: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let preview_lines = if lines.len() > max_lines {
        let mut preview: Vec<&str> = lines.iter().take(max_lines).copied().collect();
        preview.push("...");
        preview
    } else {
        lines
    };

    preview_lines
        .iter()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
