pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod extractor;
pub mod indexer;
pub mod logging;
pub mod metrics;
pub mod search;
pub mod symbol;
pub mod tool;

pub use config::Config;
pub use search::{CodeSearcher, SearchResult};
pub use tool::{codebase_search, SearchRequest, SearchResponse, ToolError};
