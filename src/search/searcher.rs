//! Search orchestration: cache, intent, index freshness, strategy, ranking.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::strategies::Strategies;
use super::{rank_results, CacheKey, IntentClassifier, QueryCache, SearchResult};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, IndexerConfig, SearchConfig};
use crate::extractor::ExtractorRegistry;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, SEARCH_LATENCY, SEARCH_REQUESTS, SEARCH_RESULTS};
use crate::symbol::SymbolIndex;

/// Errors surfaced by [`CodeSearcher::search`].
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An index together with the scope and time it was built for.
struct IndexSnapshot {
    index: SymbolIndex,
    /// Directories as requested, sorted
    directories: Vec<PathBuf>,
    /// Canonical forms of `directories` that exist
    roots: Vec<PathBuf>,
    built_at: Instant,
}

/// Single entry point for symbol search over a set of directories.
///
/// Shared across concurrent queries. Index rebuilds are serialized and
/// swapped in whole; readers keep using the previous snapshot until then.
pub struct CodeSearcher {
    config: SearchConfig,
    indexer_config: IndexerConfig,
    extractors: Arc<ExtractorRegistry>,
    classifier: IntentClassifier,
    cache: QueryCache,
    index: RwLock<Option<Arc<IndexSnapshot>>>,
    rebuild: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl CodeSearcher {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a searcher whose TTLs are measured with `clock`.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.search.clone(),
            indexer_config: config.indexer.clone(),
            extractors: Arc::new(ExtractorRegistry::new()),
            classifier: IntentClassifier::new(),
            cache: QueryCache::new(config.search.cache_ttl(), Arc::clone(&clock)),
            index: RwLock::new(None),
            rebuild: Mutex::new(()),
            clock,
        }
    }

    /// Search `target_directories` (default: the current directory).
    ///
    /// Returns at most `max_results` results, best first. The full ranked list
    /// is cached, so a repeat of the same query within the cache TTL is served
    /// without touching the filesystem.
    pub async fn search(
        &self,
        query: &str,
        target_directories: Option<&[PathBuf]>,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let start = Instant::now();
        SEARCH_REQUESTS.inc();

        let mut directories = match target_directories {
            Some(dirs) if !dirs.is_empty() => dirs.to_vec(),
            _ => vec![PathBuf::from(".")],
        };
        directories.sort();
        directories.dedup();

        let key = CacheKey::new(query, &directories);
        if let Some(cached) = self.cache.get(&key) {
            CACHE_HITS.inc();
            debug!("Query cache hit for {:?}", query);
            return Ok(self.finish(&cached, max_results, start));
        }
        CACHE_MISSES.inc();

        let intent = self.classifier.analyze(query);
        debug!(
            "Classified {:?} as {} (target: {:?}, confidence: {})",
            query,
            intent.kind.as_str(),
            intent.target_symbol,
            intent.confidence
        );

        let snapshot = self.ensure_index(&directories).await?;

        let extractors = Arc::clone(&self.extractors);
        let config = self.config.clone();
        let query_owned = query.to_string();
        let ranked = tokio::task::spawn_blocking(move || {
            let strategies = Strategies {
                index: &snapshot.index,
                extractors: &extractors,
                config: &config,
            };
            let candidates = strategies.run(&intent, &query_owned);
            rank_results(candidates, &query_owned, &snapshot.roots)
        })
        .await?;

        let ranked = Arc::new(ranked);
        self.cache.insert(key, Arc::clone(&ranked));

        Ok(self.finish(&ranked, max_results, start))
    }

    /// Number of cached queries.
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Symbol count of the current index, if one was built.
    pub async fn indexed_symbols(&self) -> Option<usize> {
        self.index
            .read()
            .await
            .as_ref()
            .map(|snapshot| snapshot.index.symbol_count())
    }

    fn finish(&self, ranked: &[SearchResult], max_results: usize, start: Instant) -> Vec<SearchResult> {
        let results: Vec<SearchResult> = ranked.iter().take(max_results).cloned().collect();
        SEARCH_LATENCY.observe(start.elapsed().as_secs_f64());
        SEARCH_RESULTS.observe(results.len() as f64);
        results
    }

    /// Current snapshot when it is non-empty, covers `directories` and is
    /// within the index TTL.
    async fn fresh_snapshot(&self, directories: &[PathBuf]) -> Option<Arc<IndexSnapshot>> {
        let guard = self.index.read().await;
        let snapshot = guard.as_ref()?;

        let age = self.clock.now().saturating_duration_since(snapshot.built_at);
        let fresh = !snapshot.index.is_empty()
            && snapshot.directories == directories
            && age <= self.config.index_ttl();

        fresh.then(|| Arc::clone(snapshot))
    }

    async fn ensure_index(&self, directories: &[PathBuf]) -> Result<Arc<IndexSnapshot>, SearchError> {
        if let Some(snapshot) = self.fresh_snapshot(directories).await {
            return Ok(snapshot);
        }

        let _rebuilding = self.rebuild.lock().await;
        // Another query may have rebuilt while we waited
        if let Some(snapshot) = self.fresh_snapshot(directories).await {
            return Ok(snapshot);
        }

        info!("Rebuilding symbol index for {:?}", directories);
        self.extractors.clear_cache();

        let extractors = Arc::clone(&self.extractors);
        let indexer_config = self.indexer_config.clone();
        let directories = directories.to_vec();
        let built_at = self.clock.now();

        let snapshot = tokio::task::spawn_blocking(move || {
            let index = SymbolIndex::build(&directories, &extractors, &indexer_config);
            let roots = directories
                .iter()
                .filter_map(|dir| dir.canonicalize().ok())
                .collect();
            IndexSnapshot {
                index,
                directories,
                roots,
                built_at,
            }
        })
        .await?;

        let snapshot = Arc::new(snapshot);
        *self.index.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
