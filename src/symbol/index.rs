//! In-memory symbol index for fast lookups

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use super::Symbol;
use crate::config::IndexerConfig;
use crate::extractor::ExtractorRegistry;
use crate::indexer::Walker;
use crate::metrics::{INDEXED_FILES, INDEXED_SYMBOLS, INDEX_LATENCY, INDEX_REBUILDS};

/// In-memory index mapping symbol names to every declaration with that name.
///
/// The index is never patched: a rebuild produces a whole new value.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    /// Index by symbol name
    by_name: BTreeMap<String, Vec<Symbol>>,
    /// Index by file path
    by_file: BTreeMap<PathBuf, Vec<Symbol>>,
    /// Total number of indexed symbols
    symbol_count: usize,
}

impl SymbolIndex {
    /// Create a new empty symbol index
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk every directory and index the symbols of each supported file.
    ///
    /// Missing directories are skipped. Files whose extraction fails
    /// contribute nothing; the rest of the build carries on.
    pub fn build(
        directories: &[PathBuf],
        extractors: &ExtractorRegistry,
        config: &IndexerConfig,
    ) -> Self {
        let start = Instant::now();
        let mut files = Vec::new();

        for directory in directories {
            let root = match directory.canonicalize() {
                Ok(root) if root.is_dir() => root,
                Ok(root) => {
                    warn!("Skipping {}: not a directory", root.display());
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", directory.display(), e);
                    continue;
                }
            };

            let walker = Walker::new(root, config);
            files.extend(walker.walk().filter(|path| extractors.is_indexable(path)));
        }

        files.sort();
        files.dedup();

        let extracted: Vec<_> = files
            .par_iter()
            .map(|path| extractors.extract(path))
            .collect();

        let mut index = Self::new();
        for symbols in extracted {
            for symbol in symbols.iter() {
                index.add_symbol(symbol.clone());
            }
        }

        let elapsed = start.elapsed();
        INDEX_REBUILDS.inc();
        INDEX_LATENCY.observe(elapsed.as_secs_f64());
        INDEXED_FILES.set(index.file_count() as f64);
        INDEXED_SYMBOLS.set(index.symbol_count() as f64);

        info!(
            "Built symbol index with {} symbols across {} files in {:.2}s",
            index.symbol_count,
            index.by_file.len(),
            elapsed.as_secs_f64()
        );

        index
    }

    /// Add a symbol to the index
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.by_file
            .entry(symbol.file_path.clone())
            .or_default()
            .push(symbol.clone());

        self.by_name
            .entry(symbol.name.clone())
            .or_default()
            .push(symbol);

        self.symbol_count += 1;
    }

    /// Find symbols by exact name
    pub fn find_by_name(&self, name: &str) -> &[Symbol] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Find symbols whose name equals `name` ignoring ASCII case
    pub fn find_by_name_ignore_case(&self, name: &str) -> Vec<&Symbol> {
        self.by_name
            .iter()
            .filter(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .flat_map(|(_, symbols)| symbols.iter())
            .collect()
    }

    /// Exact lookup, falling back to a case-insensitive match.
    pub fn lookup(&self, name: &str) -> Vec<&Symbol> {
        self.lookup_where(name, |_| true)
    }

    /// Like [`lookup`](Self::lookup), but only symbols passing `keep` count:
    /// the case-insensitive fallback runs when no exact match is kept.
    pub fn lookup_where<F>(&self, name: &str, keep: F) -> Vec<&Symbol>
    where
        F: Fn(&Symbol) -> bool,
    {
        let exact: Vec<&Symbol> = self.find_by_name(name).iter().filter(|s| keep(*s)).collect();
        if !exact.is_empty() {
            return exact;
        }
        self.find_by_name_ignore_case(name)
            .into_iter()
            .filter(|s| keep(*s))
            .collect()
    }

    /// Iterate over every (name, declarations) pair in name order
    pub fn names(&self) -> impl Iterator<Item = (&str, &[Symbol])> {
        self.by_name
            .iter()
            .map(|(name, symbols)| (name.as_str(), symbols.as_slice()))
    }

    /// Get all symbols in a file
    pub fn get_by_file(&self, file_path: &Path) -> &[Symbol] {
        self.by_file
            .get(file_path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// List all files with symbols, in path order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.by_file.keys().map(PathBuf::as_path)
    }

    /// Get total symbol count
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Number of files that contributed at least one symbol
    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_count == 0
    }
}
